use std::io;

use super::{DiagnosticKind, Diagnostics, GeometryBuffer, Object};
use crate::{Materials, Mesh, Submesh, DEFAULT_NAME};

/// Maximum number of corners in one mesh. Corners past it are dropped.
pub const MAX_VERTICES_PER_MESH: usize = 64_999;

/// Renderable unit provided by the caller, one per object.
pub trait RenderTarget {
    fn set_name(&mut self, name: &str);
    fn set_mesh(&mut self, mesh: Mesh);
}

impl RenderTarget for Mesh {
    fn set_name(&mut self, name: &str) {
        name.clone_into(&mut self.name);
    }

    fn set_mesh(&mut self, mesh: Mesh) {
        let name = std::mem::take(&mut self.name);
        *self = mesh;
        self.name = name;
    }
}

/// Builds one flat mesh per object of `buffer`.
pub fn materialize(
    buffer: &GeometryBuffer,
    materials: &Materials,
    diagnostics: &mut Diagnostics,
) -> io::Result<Vec<Mesh>> {
    diagnostics.set_file(None);
    buffer
        .objects()
        .map(|object| materialize_object(buffer, object, materials, diagnostics))
        .collect()
}

/// Fills `targets` with the meshes of `buffer`, in object order.
///
/// Nothing is touched if the number of targets does not match the number of
/// objects. Targets keep their own name when the object has the implicit
/// `"default"` name.
pub fn populate<T: RenderTarget>(
    buffer: &GeometryBuffer,
    materials: &Materials,
    targets: &mut [T],
    diagnostics: &mut Diagnostics,
) -> io::Result<()> {
    diagnostics.set_file(None);
    if targets.len() != buffer.object_count() {
        return diagnostics.report(DiagnosticKind::ObjectCountMismatch {
            objects: buffer.object_count(),
            targets: targets.len(),
        });
    }
    for (object, target) in buffer.objects().zip(targets) {
        let mesh = materialize_object(buffer, object, materials, diagnostics)?;
        if object.name() != DEFAULT_NAME {
            target.set_name(object.name());
        }
        target.set_mesh(mesh);
    }
    Ok(())
}

fn materialize_object(
    buffer: &GeometryBuffer,
    object: &Object,
    materials: &Materials,
    diagnostics: &mut Diagnostics,
) -> io::Result<Mesh> {
    let faces = object.faces();
    if faces.len() > MAX_VERTICES_PER_MESH {
        diagnostics.report(DiagnosticKind::VertexLimit {
            object: object.name().to_owned(),
            corners: faces.len(),
        })?;
    }
    let faces = &faces[..faces.len().min(MAX_VERTICES_PER_MESH)];
    let has_texcoords = buffer.has_texcoords();
    let has_normals = buffer.has_normals() && object.normal_count() > 0;

    let mut mesh = Mesh {
        name: object.name().to_owned(),
        positions: Vec::with_capacity(faces.len()),
        uvs: Vec::with_capacity(if has_texcoords { faces.len() } else { 0 }),
        normals: Vec::with_capacity(if has_normals { faces.len() } else { 0 }),
        submeshes: vec![],
    };
    let mut out_of_bounds = 0;
    for corner in faces {
        mesh.positions
            .push(lookup(buffer.vertices(), corner.vertex, &mut out_of_bounds));
        if has_texcoords {
            // A corner without texture coordinates reads the first one.
            let vt = corner.texcoord.unwrap_or(0);
            mesh.uvs.push(lookup(buffer.texcoords(), vt, &mut out_of_bounds));
        }
        if has_normals {
            mesh.normals.push(match corner.normal {
                Some(vn) if vn >= 0 => lookup(buffer.normals(), vn, &mut out_of_bounds),
                _ => [0.; 3],
            });
        }
    }
    if out_of_bounds != 0 {
        diagnostics.report(DiagnosticKind::IndexOutOfBounds {
            object: object.name().to_owned(),
            count: out_of_bounds,
        })?;
    }

    // Groups own back-to-back slices of the flattened corners.
    let corners = faces.len();
    let mut start = 0;
    for group in object.groups() {
        let end = start + group.faces().len();
        let material = group.material().unwrap_or(DEFAULT_NAME);
        let material_index = materials.index_of(material);
        if material_index.is_none() {
            diagnostics.report(DiagnosticKind::MissingMaterial(material.to_owned()))?;
        }
        mesh.submeshes.push(Submesh {
            material: material.to_owned(),
            material_index,
            indices: triangle_range(start, end, corners),
        });
        start = end;
    }
    Ok(mesh)
}

// Indices of `start..end`, clipped to whole triangles below `corners`.
// Both bounds end up at most MAX_VERTICES_PER_MESH.
#[allow(clippy::cast_possible_truncation)]
fn triangle_range(start: usize, end: usize, corners: usize) -> Vec<u32> {
    let end = end.min(corners);
    if end <= start {
        return vec![];
    }
    let end = end - (end - start) % 3;
    (start as u32..end as u32).collect()
}

fn lookup<T: Copy + Default>(pool: &[T], index: i32, out_of_bounds: &mut usize) -> T {
    match usize::try_from(index).ok().and_then(|i| pool.get(i)) {
        Some(&v) => v,
        None => {
            *out_of_bounds += 1;
            T::default()
        }
    }
}
