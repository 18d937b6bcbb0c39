use std::{collections::HashMap, path::PathBuf, slice};

pub type Vec2 = [f32; 2];
pub type Vec3 = [f32; 3];
pub type Color3 = [f32; 3];

/// Name used for the implicit object, the initial group of every object, and
/// the material of groups that never saw `usemtl`.
pub const DEFAULT_NAME: &str = "default";

/// Result of importing an OBJ file and its material library.
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct Scene {
    /// One mesh per object, in file order.
    pub meshes: Vec<Mesh>,
    pub materials: Materials,
    /// The `mtllib` value as written in the OBJ file.
    pub material_library: Option<String>,
    pub diagnostics: Vec<crate::obj::Diagnostic>,
}

impl Scene {
    /// Number of render units the renderer has to allocate.
    #[must_use]
    pub fn render_units(&self) -> usize {
        self.meshes.len()
    }

    /// Translation that moves the average of the mesh bounding-box centers
    /// to the origin.
    ///
    /// Meshes without positions count as centered at the origin.
    #[must_use]
    pub fn center_offset(&self) -> Vec3 {
        if self.meshes.is_empty() {
            return [0.; 3];
        }
        let mut sum = [0.; 3];
        for mesh in &self.meshes {
            if let Some((min, max)) = mesh.bounds() {
                for i in 0..3 {
                    sum[i] -= (min[i] + max[i]) / 2.;
                }
            }
        }
        #[allow(clippy::cast_precision_loss)]
        let n = self.meshes.len() as f32;
        [sum[0] / n, sum[1] / n, sum[2] / n]
    }
}

/// Flat, render-ready buffers of one object.
///
/// `positions`, `uvs` and `normals` are parallel arrays addressed by the
/// flattened corner index; `uvs` is empty when the file had no texture
/// coordinates and `normals` is empty when the renderer has to compute them.
#[derive(Debug, Default, Clone, PartialEq)]
#[non_exhaustive]
pub struct Mesh {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    pub submeshes: Vec<Submesh>,
}

impl Mesh {
    /// Returns `true` if smooth normals have to be recomputed from the
    /// geometry by the consumer.
    #[must_use]
    pub fn needs_normals(&self) -> bool {
        self.normals.is_empty() && !self.positions.is_empty()
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` without positions.
    #[must_use]
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let (first, rest) = self.positions.split_first()?;
        let mut min = *first;
        let mut max = *first;
        for p in rest {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        Some((min, max))
    }
}

/// Triangle list of a mesh sharing one material.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Submesh {
    /// Material name, `"default"` when the group had none.
    pub material: String,
    /// Index into [`Scene::materials`], `None` if the name is not defined.
    pub material_index: Option<usize>,
    /// Corner indices, three per triangle.
    pub indices: Vec<u32>,
}

/// Shader family chosen for a material.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ShadingModel {
    /// Used for the built-in material of files without `mtllib`.
    VertexLit,
    #[default]
    Diffuse,
    BumpedDiffuse,
    Specular,
    BumpedSpecular,
}

impl ShadingModel {
    pub(crate) fn from_mtl(illumination_model: i32, bumped: bool) -> Self {
        match (illumination_model, bumped) {
            (2, false) => Self::Specular,
            (2, true) => Self::BumpedSpecular,
            (_, false) => Self::Diffuse,
            (_, true) => Self::BumpedDiffuse,
        }
    }

    #[must_use]
    pub fn is_specular(self) -> bool {
        matches!(self, Self::Specular | Self::BumpedSpecular)
    }
}

/// A `newmtl` block of an MTL file.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Material {
    pub name: String,
    pub ambient: Color3,
    pub diffuse: Color3,
    pub specular: Color3,
    /// `Ns` divided by 1000.
    pub shininess: f32,
    pub alpha: f32,
    pub illumination_model: i32,
    pub shading_model: ShadingModel,
    pub diffuse_texture: Option<Texture>,
    pub bump_texture: Option<Texture>,
    // Recorded but never loaded.
    pub ambient_texture: Option<String>,
    pub specular_texture: Option<String>,
    pub emissive_texture: Option<String>,
}

impl Material {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient: [0.; 3],
            diffuse: [0.; 3],
            specular: [0.; 3],
            shininess: 0.,
            alpha: 1.,
            illumination_model: 0,
            shading_model: ShadingModel::default(),
            diffuse_texture: None,
            bump_texture: None,
            ambient_texture: None,
            specular_texture: None,
            emissive_texture: None,
        }
    }
}

/// Image referenced by a material.
///
/// The bytes are kept encoded; decoding is left to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Texture {
    pub path: PathBuf,
    /// Encoded image bytes, `None` until the loader has read the file.
    pub data: Option<Vec<u8>>,
}

impl Texture {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: None,
        }
    }

    /// Returns `true` if the bytes were read and are waiting to be decoded.
    #[must_use]
    pub fn is_pending_decode(&self) -> bool {
        self.data.is_some()
    }
}

/// Material table keyed by name, in definition order.
#[derive(Debug, Default, Clone)]
pub struct Materials {
    list: Vec<Material>,
    map: HashMap<String, usize>,
}

impl Materials {
    /// The table used when the OBJ file names no material library: a single
    /// vertex-lit `"default"` material.
    #[must_use]
    pub fn fallback() -> Self {
        let mut material = Material::new(DEFAULT_NAME);
        material.shading_model = ShadingModel::VertexLit;
        let mut materials = Self::default();
        materials.insert(material);
        materials
    }

    /// Adds `material` unless one with the same name exists. Returns `false`
    /// if it was ignored.
    pub(crate) fn insert(&mut self, material: Material) -> bool {
        if self.map.contains_key(&material.name) {
            return false;
        }
        self.map.insert(material.name.clone(), self.list.len());
        self.list.push(material);
        true
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Material> {
        self.index_of(name).map(|i| &self.list[i])
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.map.get(name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Material> {
        self.list.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> slice::IterMut<'_, Material> {
        self.list.iter_mut()
    }
}

impl<'a> IntoIterator for &'a Materials {
    type Item = &'a Material;
    type IntoIter = slice::Iter<'a, Material>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh(positions: Vec<Vec3>) -> Mesh {
        Mesh {
            positions,
            ..Mesh::default()
        }
    }

    #[test]
    fn bounds() {
        assert_eq!(mesh(vec![]).bounds(), None);
        let m = mesh(vec![[1., -2., 3.], [-1., 2., 0.], [0., 0., 5.]]);
        assert_eq!(m.bounds(), Some(([-1., -2., 0.], [1., 2., 5.])));
    }

    #[test]
    fn center_offset() {
        assert_eq!(Scene::default().center_offset(), [0.; 3]);
        let scene = Scene {
            meshes: vec![
                mesh(vec![[0., 0., 0.], [2., 2., 2.]]),
                mesh(vec![[-4., 0., 0.], [-2., 0., 0.]]),
                mesh(vec![]),
            ],
            ..Scene::default()
        };
        // (1, 1, 1) and (-3, 0, 0) plus an empty mesh centered at the origin.
        assert_eq!(scene.center_offset(), [2. / 3., -1. / 3., -1. / 3.]);
    }

    #[test]
    fn shading_model() {
        assert_eq!(ShadingModel::from_mtl(2, false), ShadingModel::Specular);
        assert_eq!(ShadingModel::from_mtl(2, true), ShadingModel::BumpedSpecular);
        assert_eq!(ShadingModel::from_mtl(0, true), ShadingModel::BumpedDiffuse);
        assert_eq!(ShadingModel::from_mtl(3, false), ShadingModel::Diffuse);
        assert!(ShadingModel::BumpedSpecular.is_specular());
        assert!(!ShadingModel::VertexLit.is_specular());
    }

    #[test]
    fn materials() {
        let mut materials = Materials::fallback();
        assert_eq!(materials.len(), 1);
        assert_eq!(materials.get("default").unwrap().shading_model, ShadingModel::VertexLit);

        let mut red = Material::new("red");
        red.diffuse = [1., 0., 0.];
        assert!(materials.insert(red));
        assert!(!materials.insert(Material::new("red")));
        assert_eq!(materials.index_of("red"), Some(1));
        assert_eq!(materials.get("red").unwrap().diffuse, [1., 0., 0.]);
        let names: Vec<_> = materials.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["default", "red"]);
    }
}
