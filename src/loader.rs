use std::{fmt, fs, io, path::Path};

use crate::{
    obj::{self, Diagnostics, RelativeNormalBase},
    Materials, Scene, Texture,
};

type Reader<B> = fn(&Path) -> io::Result<B>;

/// OBJ importer: reads the OBJ file, its material library and textures, and
/// builds one flat mesh per object.
pub struct Loader<B = Vec<u8>> {
    reader: Reader<B>,
    strict: bool,
    relative_normal_base: RelativeNormalBase,
    load_textures: bool,
}

fn default_reader(path: &Path) -> io::Result<Vec<u8>> {
    fs::read(path)
}

impl Default for Loader<Vec<u8>> {
    fn default() -> Self {
        Self::with_custom_reader(default_reader)
    }
}

impl<B: AsRef<[u8]>> Loader<B> {
    /// Sets whether malformed input is an error.
    ///
    /// If set to `false`, malformed numbers, directives missing their
    /// argument, unsupported faces and bad bump options are recorded in
    /// [`Scene::diagnostics`] and the import goes on. If set to `true`, the
    /// first of them is returned as an [`io::ErrorKind::InvalidData`] error.
    ///
    /// Default: `false`
    #[must_use]
    pub fn strict(mut self, enable: bool) -> Self {
        self.strict = enable;
        self
    }

    /// Sets the pool that relative (negative) normal indices count back from.
    ///
    /// Default: [`RelativeNormalBase::VertexCount`]
    #[must_use]
    pub fn relative_normal_base(mut self, base: RelativeNormalBase) -> Self {
        self.relative_normal_base = base;
        self
    }

    /// Sets whether or not to read the diffuse and bump textures of
    /// materials.
    ///
    /// Texture paths are resolved either way.
    ///
    /// Default: `true`
    #[must_use]
    pub fn load_textures(mut self, enable: bool) -> Self {
        self.load_textures = enable;
        self
    }

    /// Use the given function as a file reader of this loader.
    ///
    /// It reads the OBJ file, the material library and textures.
    ///
    /// Default: [`std::fs::read`]
    ///
    /// # Example
    ///
    /// ```
    /// use obj_import::Loader;
    /// use std::fs;
    ///
    /// let loader = Loader::default().custom_reader(|path| {
    ///     match path.extension().and_then(|e| e.to_str()) {
    ///         Some("png" | "jpg") => Ok(vec![]), // Skip decoding-heavy assets.
    ///         _ => fs::read(path),
    ///     }
    /// });
    /// ```
    #[must_use]
    pub fn custom_reader(mut self, reader: Reader<B>) -> Self {
        self.reader = reader;
        self
    }

    /// Creates a new loader with the given file reader.
    ///
    /// This is similar to [`Loader::default().custom_reader()`](Self::custom_reader),
    /// but the reader can return a non-`Vec<u8>` type.
    ///
    /// # Example
    ///
    /// ```
    /// use obj_import::Loader;
    /// use std::fs;
    ///
    /// let loader = Loader::with_custom_reader(|path| fs::read_to_string(path));
    /// ```
    #[must_use]
    pub fn with_custom_reader(reader: Reader<B>) -> Self {
        Self {
            reader,
            strict: false,
            relative_normal_base: RelativeNormalBase::default(),
            load_textures: true,
        }
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> io::Result<Scene> {
        self.load_(path.as_ref())
    }
    fn load_(&self, path: &Path) -> io::Result<Scene> {
        self.load_from_slice_((self.reader)(path)?.as_ref(), path)
    }
    /// Imports OBJ bytes already in memory.
    ///
    /// `path` is where the bytes came from; the material library and
    /// textures are looked up relative to its directory.
    pub fn load_from_slice<P: AsRef<Path>>(&self, bytes: &[u8], path: P) -> io::Result<Scene> {
        self.load_from_slice_(bytes, path.as_ref())
    }
    fn load_from_slice_(&self, bytes: &[u8], path: &Path) -> io::Result<Scene> {
        let mut diagnostics = Diagnostics::new(self.strict);
        let data = obj::read_obj(bytes, Some(path), self.relative_normal_base, &mut diagnostics)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

        let mut materials = match &data.material_library {
            Some(name) => {
                let mtl_path = base_dir.join(name);
                let bytes = (self.reader)(&mtl_path)?;
                obj::read_mtl(bytes.as_ref(), Some(mtl_path.as_path()), &mut diagnostics)?
            }
            None => Materials::fallback(),
        };
        for material in materials.iter_mut() {
            let textures = [
                material.diffuse_texture.as_mut(),
                material.bump_texture.as_mut(),
            ];
            for texture in textures.into_iter().flatten() {
                self.load_texture(base_dir, texture)?;
            }
        }

        let meshes = obj::materialize(&data.geometry, &materials, &mut diagnostics)?;
        log::debug!(
            "loaded {}: {} mesh(es), {} material(s), {} diagnostic(s)",
            path.display(),
            meshes.len(),
            materials.len(),
            diagnostics.as_slice().len()
        );
        Ok(Scene {
            meshes,
            materials,
            material_library: data.material_library,
            diagnostics: diagnostics.into_vec(),
        })
    }

    fn load_texture(&self, base_dir: &Path, texture: &mut Texture) -> io::Result<()> {
        texture.path = base_dir.join(&texture.path);
        if self.load_textures {
            let bytes = (self.reader)(&texture.path)?;
            texture.data = Some(bytes.as_ref().to_vec());
        }
        Ok(())
    }
}

impl<B> fmt::Debug for Loader<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("strict", &self.strict)
            .field("relative_normal_base", &self.relative_normal_base)
            .field("load_textures", &self.load_textures)
            .finish_non_exhaustive()
    }
}
