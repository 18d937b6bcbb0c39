//! Object → group → face accumulation for the OBJ reader.

use std::slice;

use crate::{Vec2, Vec3, DEFAULT_NAME};

/// Pool indices of one face corner, already resolved to zero-based form.
///
/// Indices are stored as resolved from the file; an index outside its pool is
/// only detected when the geometry is materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct FaceIndices {
    pub vertex: i32,
    pub texcoord: Option<i32>,
    pub normal: Option<i32>,
}

impl FaceIndices {
    #[must_use]
    pub fn new(vertex: i32) -> Self {
        Self {
            vertex,
            texcoord: None,
            normal: None,
        }
    }
}

/// A `g` section of an object.
#[derive(Debug, Clone)]
pub struct Group {
    name: String,
    material: Option<String>,
    faces: Vec<FaceIndices>,
}

impl Group {
    fn new(name: String) -> Self {
        Self {
            name,
            material: None,
            faces: vec![],
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `usemtl` name of this group.
    #[must_use]
    pub fn material(&self) -> Option<&str> {
        self.material.as_deref()
    }

    /// Face corners, three per triangle.
    #[must_use]
    pub fn faces(&self) -> &[FaceIndices] {
        &self.faces
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// An `o` section of the file.
#[derive(Debug, Clone)]
pub struct Object {
    name: String,
    groups: Vec<Group>,
    faces: Vec<FaceIndices>,
    normal_count: usize,
}

impl Object {
    fn new(name: String) -> Self {
        Self {
            name,
            groups: vec![Group::new(DEFAULT_NAME.to_owned())],
            faces: vec![],
            normal_count: 0,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Face corners of all groups, in the order they were read.
    #[must_use]
    pub fn faces(&self) -> &[FaceIndices] {
        &self.faces
    }

    /// Number of corners that carry a normal index.
    #[must_use]
    pub fn normal_count(&self) -> usize {
        self.normal_count
    }
}

/// Geometry read from an OBJ file: attribute pools shared by the whole file
/// plus the objects referring into them.
///
/// The current object and group are indices into `objects` and its groups.
/// A group or object superseded while still empty is removed, so neither
/// index can refer to an element that is no longer in the buffer.
#[derive(Debug, Clone)]
pub struct GeometryBuffer {
    vertices: Vec<Vec3>,
    texcoords: Vec<Vec2>,
    normals: Vec<Vec3>,
    objects: Vec<Object>,
    current_object: usize,
    current_group: usize,
    // Naming index for unnamed groups, like "Unnamed-1".
    unnamed_group_index: u32,
}

impl Default for GeometryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryBuffer {
    /// Creates a buffer holding the implicit `"default"` object.
    #[must_use]
    pub fn new() -> Self {
        Self {
            vertices: vec![],
            texcoords: vec![],
            normals: vec![],
            objects: vec![Object::new(DEFAULT_NAME.to_owned())],
            current_object: 0,
            current_group: 0,
            unnamed_group_index: 1,
        }
    }

    /// Starts a new object.
    ///
    /// The current object is dropped first if no vertex has been read yet,
    /// whatever faces it holds.
    pub fn push_object(&mut self, name: &str) {
        if self.is_empty() {
            self.objects.remove(self.current_object);
        }
        self.objects.push(Object::new(name.to_owned()));
        self.current_object = self.objects.len() - 1;
        self.current_group = 0;
        self.check_handles();
    }

    /// Starts a new group in the current object, replacing the current group
    /// if it has no faces. `None` names it `Unnamed-N`.
    pub fn push_group(&mut self, name: Option<&str>) {
        let name = match name {
            Some(name) => name.to_owned(),
            None => {
                let name = format!("Unnamed-{}", self.unnamed_group_index);
                self.unnamed_group_index += 1;
                name
            }
        };
        let object = &mut self.objects[self.current_object];
        if object.groups[self.current_group].is_empty() {
            object.groups.remove(self.current_group);
        }
        object.groups.push(Group::new(name));
        self.current_group = object.groups.len() - 1;
        self.check_handles();
    }

    /// Applies `usemtl`: a group that already has faces is closed by a new
    /// group named after the material.
    pub fn push_material_name(&mut self, name: &str) {
        if !self.current_group().is_empty() {
            self.push_group(Some(name));
        }
        let group = &mut self.objects[self.current_object].groups[self.current_group];
        if group.name == DEFAULT_NAME {
            group.name = name.to_owned();
        }
        group.material = Some(name.to_owned());
    }

    pub fn push_vertex(&mut self, v: Vec3) {
        self.vertices.push(v);
    }

    pub fn push_texcoord(&mut self, vt: Vec2) {
        self.texcoords.push(vt);
    }

    pub fn push_normal(&mut self, vn: Vec3) {
        self.normals.push(vn);
    }

    pub fn push_face(&mut self, corner: FaceIndices) {
        let object = &mut self.objects[self.current_object];
        object.groups[self.current_group].faces.push(corner);
        object.faces.push(corner);
        // A normal resolved below zero is no normal.
        if corner.normal.is_some_and(|vn| vn >= 0) {
            object.normal_count += 1;
        }
    }

    /// Returns `true` if no vertex has been read.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[must_use]
    pub fn has_texcoords(&self) -> bool {
        !self.texcoords.is_empty()
    }

    #[must_use]
    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn objects(&self) -> slice::Iter<'_, Object> {
        self.objects.iter()
    }

    #[must_use]
    pub fn current_object(&self) -> &Object {
        &self.objects[self.current_object]
    }

    #[must_use]
    pub fn current_group(&self) -> &Group {
        &self.current_object().groups[self.current_group]
    }

    /// Vertex positions, X already mirrored.
    #[must_use]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    #[must_use]
    pub fn texcoords(&self) -> &[Vec2] {
        &self.texcoords
    }

    #[must_use]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Logs the object/group structure at debug level.
    pub fn trace(&self) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }
        log::debug!("OBJ has {} object(s)", self.objects.len());
        log::debug!("OBJ has {} vertice(s)", self.vertices.len());
        log::debug!("OBJ has {} uv(s)", self.texcoords.len());
        log::debug!("OBJ has {} normal(s)", self.normals.len());
        for object in &self.objects {
            log::debug!("{} has {} group(s)", object.name, object.groups.len());
            for group in &object.groups {
                log::debug!(
                    "{}/{} has {} face corner(s)",
                    object.name,
                    group.name,
                    group.faces.len()
                );
            }
        }
    }

    #[inline]
    fn check_handles(&self) {
        debug_assert!(self.current_object < self.objects.len());
        debug_assert!(self.current_group < self.objects[self.current_object].groups.len());
    }
}
