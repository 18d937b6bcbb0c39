//! Lenient [Wavefront OBJ] importer.
//!
//! Reads an OBJ file and its MTL material library and produces one flat,
//! render-ready [`Mesh`] per object, with one [`Submesh`] per material group.
//!
//! ```no_run
//! let scene = obj_import::Loader::default().load("model/robot.obj")?;
//! for mesh in &scene.meshes {
//!     println!("{}: {} vertices", mesh.name, mesh.positions.len());
//! }
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! [Wavefront OBJ]: https://en.wikipedia.org/wiki/Wavefront_.obj_file

#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    single_use_lifetimes,
    unreachable_pub
)]
#![warn(clippy::exhaustive_enums, clippy::exhaustive_structs)]

#[macro_use]
mod error;

mod utils;

mod common;
pub use common::*;

pub mod obj;

mod loader;
pub use loader::*;
