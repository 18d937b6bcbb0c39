//! [Wavefront OBJ] (.obj) and MTL (.mtl) reader.
//!
//! Reading is lenient: malformed lines are reported as [`Diagnostic`]s and
//! skipped or read as zero, unless the [`Diagnostics`] collector is strict.
//!
//! [Wavefront OBJ]: https://en.wikipedia.org/wiki/Wavefront_.obj_file

mod buffer;
mod error;
mod materialize;
mod mtl;

use std::{io, path::Path, str::SplitWhitespace};

pub use self::{
    buffer::{FaceIndices, GeometryBuffer, Group, Object},
    error::{Diagnostic, DiagnosticKind, Diagnostics},
    materialize::{materialize, populate, RenderTarget, MAX_VERTICES_PER_MESH},
    mtl::read_mtl,
};
use crate::utils::{
    bytes::{rest_of_line, Lines},
    int,
    utf16::decode_text,
};

/// Pool size that relative (negative) normal indices count back from.
///
/// [`VertexCount`](Self::VertexCount) gives wrong normals for files whose
/// normal count differs from their vertex count, but existing content was
/// authored against it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum RelativeNormalBase {
    #[default]
    VertexCount,
    NormalCount,
}

/// Geometry and material library reference read from an OBJ file.
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct ObjData {
    pub geometry: GeometryBuffer,
    /// The `mtllib` value, not yet resolved against the OBJ location.
    pub material_library: Option<String>,
}

/// Reads an OBJ file.
///
/// `path` is only used for diagnostics.
pub fn read_obj(
    bytes: &[u8],
    path: Option<&Path>,
    relative_normal_base: RelativeNormalBase,
    diagnostics: &mut Diagnostics,
) -> io::Result<ObjData> {
    let text = decode_text(bytes)?;
    diagnostics.set_file(path);
    let mut parser = ObjParser {
        data: ObjData::default(),
        first_in_group: true,
        relative: false,
        relative_normal_base,
        corners: Vec::with_capacity(4),
        diagnostics,
    };
    for (line_number, line) in Lines::new(&text) {
        parser.diagnostics.set_line(Some(line_number));
        parser.read_line(line)?;
    }
    parser.diagnostics.set_line(None);
    parser.data.geometry.trace();
    Ok(parser.data)
}

// Corner order of the emitted triangles. Winding is reversed because X is
// mirrored.
const TRIANGLE: [usize; 3] = [2, 1, 0];
const QUAD: [usize; 6] = [2, 1, 3, 3, 1, 0];

struct ObjParser<'a> {
    data: ObjData,
    // Index convention is decided by the first face of each group.
    first_in_group: bool,
    relative: bool,
    relative_normal_base: RelativeNormalBase,
    corners: Vec<FaceIndices>,
    diagnostics: &'a mut Diagnostics,
}

impl ObjParser<'_> {
    fn read_line(&mut self, line: &str) -> io::Result<()> {
        let line = line.trim();
        // A comment anywhere discards the whole line.
        if line.contains('#') {
            return Ok(());
        }
        let mut tokens = line.split_whitespace();
        let Some(tag) = tokens.next() else {
            return Ok(());
        };
        let geometry = &mut self.data.geometry;
        match tag {
            "o" => match tokens.next() {
                Some(name) => {
                    geometry.push_object(name);
                    self.first_in_group = true;
                }
                None => self.diagnostics.report(DiagnosticKind::MissingArgument("o"))?,
            },
            "g" => {
                geometry.push_group(tokens.next());
                self.first_in_group = true;
            }
            "v" => {
                let v = self.read_float3(&mut tokens)?;
                self.data.geometry.push_vertex([-v[0], v[1], v[2]]);
            }
            "vt" => {
                let u = self.diagnostics.float(tokens.next())?;
                let v = self.diagnostics.float(tokens.next())?;
                self.data.geometry.push_texcoord([u, v]);
            }
            "vn" => {
                let vn = self.read_float3(&mut tokens)?;
                self.data.geometry.push_normal(vn);
            }
            "f" => self.read_f(tokens)?,
            "mtllib" => match rest_of_line(line, tag) {
                "" => self
                    .diagnostics
                    .report(DiagnosticKind::MissingArgument("mtllib"))?,
                name => self.data.material_library = Some(name.to_owned()),
            },
            "usemtl" => match tokens.next() {
                Some(name) => geometry.push_material_name(name),
                None => self
                    .diagnostics
                    .report(DiagnosticKind::MissingArgument("usemtl"))?,
            },
            // vp, l, p, s, mg, or other unknown
            _ => {}
        }
        Ok(())
    }

    fn read_float3(&mut self, tokens: &mut SplitWhitespace<'_>) -> io::Result<[f32; 3]> {
        Ok([
            self.diagnostics.float(tokens.next())?,
            self.diagnostics.float(tokens.next())?,
            self.diagnostics.float(tokens.next())?,
        ])
    }

    fn read_f(&mut self, tokens: SplitWhitespace<'_>) -> io::Result<()> {
        // f <v1>/[vt1]/[vn1] <v2>/[vt2]/[vn2] <v3>/[vt3]/[vn3] ...
        let mut tokens = tokens.peekable();
        let Some(&first) = tokens.peek() else {
            return self.diagnostics.report(DiagnosticKind::FaceArity(0));
        };
        if self.first_in_group {
            self.first_in_group = false;
            // Malformed tokens are reported when the corner is read.
            let v = first.split('/').next().and_then(int::parse).unwrap_or(0);
            self.relative = v < 0;
        }

        // Relative indices count back from the pool sizes at the start of
        // the line.
        let geometry = &self.data.geometry;
        let vertex_base = pool_len(geometry.vertices().len());
        let texcoord_base = pool_len(geometry.texcoords().len());
        let normal_base = match self.relative_normal_base {
            RelativeNormalBase::VertexCount => vertex_base,
            RelativeNormalBase::NormalCount => pool_len(geometry.normals().len()),
        };
        let resolve = |i: i32, base: i32, relative: bool| {
            if relative {
                base.saturating_add(i)
            } else {
                i.saturating_sub(1)
            }
        };

        self.corners.clear();
        for token in tokens {
            let mut parts = token.split('/');
            let v = self.diagnostics.int(parts.next())?;
            let vt = match parts.next() {
                Some(s) if !s.is_empty() => Some(self.diagnostics.int(Some(s))?),
                _ => None,
            };
            let vn = match parts.next() {
                Some(s) if !s.is_empty() => Some(self.diagnostics.int(Some(s))?),
                _ => None,
            };
            self.corners.push(FaceIndices {
                vertex: resolve(v, vertex_base, self.relative),
                texcoord: vt.map(|i| resolve(i, texcoord_base, self.relative)),
                normal: vn.map(|i| resolve(i, normal_base, self.relative)),
            });
        }

        let order: &[usize] = match self.corners.len() {
            3 => &TRIANGLE,
            4 => &QUAD,
            n => return self.diagnostics.report(DiagnosticKind::FaceArity(n)),
        };
        for &i in order {
            self.data.geometry.push_face(self.corners[i]);
        }
        Ok(())
    }
}

fn pool_len(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}

#[cfg(test)]
#[path = "tests/obj.rs"]
mod tests;
