use std::{
    fmt, io,
    path::{Path, PathBuf},
};

use log::Level;

use crate::{
    error::{invalid_data, with_location, Location},
    utils::{float, int},
};

/// Non-fatal condition found while importing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DiagnosticKind {
    /// Malformed floating-point token, read as `0`.
    Float(String),
    /// Malformed integer token, read as `0`.
    Int(String),
    /// A directive without its mandatory argument; the line was ignored.
    MissingArgument(&'static str),
    /// A face with a number of corners other than 3 or 4; it was dropped.
    FaceArity(usize),
    /// A bump-map option with too few or mistyped values; it was skipped.
    BumpOption { option: String, material: String },
    /// An MTL directive this importer does not handle.
    UnknownDirective(String),
    /// A second material with an already defined name; it was ignored.
    DuplicateMaterial(String),
    /// An object with more corners than a mesh can hold; the rest were dropped.
    VertexLimit { object: String, corners: usize },
    /// Face corners referring past the end of a pool; they were read as zero.
    IndexOutOfBounds { object: String, count: usize },
    /// A submesh material missing from the material table.
    MissingMaterial(String),
    /// The number of render targets does not match the number of objects.
    ObjectCountMismatch { objects: usize, targets: usize },
}

impl DiagnosticKind {
    #[must_use]
    pub fn level(&self) -> Level {
        match self {
            Self::BumpOption { .. } | Self::UnknownDirective(..) => Level::Debug,
            _ => Level::Warn,
        }
    }

    /// Conditions that a strict import turns into errors.
    fn is_error_in_strict_mode(&self) -> bool {
        matches!(
            self,
            Self::Float(..)
                | Self::Int(..)
                | Self::MissingArgument(..)
                | Self::FaceArity(..)
                | Self::BumpOption { .. }
        )
    }
}

impl fmt::Display for DiagnosticKind {
    #[cold]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(token) => write!(f, "error while parsing a float ({token:?})"),
            Self::Int(token) => write!(f, "error while parsing an integer ({token:?})"),
            Self::MissingArgument(tag) => write!(f, "expected name after {tag}"),
            Self::FaceArity(n) => write!(f, "face with {n} corners is not supported"),
            Self::BumpOption { option, material } => write!(
                f,
                "not enough values for bump option -{option} of material {material:?}"
            ),
            Self::UnknownDirective(tag) => write!(f, "ignored directive {tag:?}"),
            Self::DuplicateMaterial(name) => {
                write!(f, "duplicate material {name:?}, ignored repeated occurrence")
            }
            Self::VertexLimit { object, corners } => write!(
                f,
                "maximum vertex number for a mesh exceeded for object {object:?} \
                 ({corners} corners)"
            ),
            Self::IndexOutOfBounds { object, count } => write!(
                f,
                "{count} face index(es) out of bounds in object {object:?}"
            ),
            Self::MissingMaterial(name) => write!(f, "material {name:?} not found"),
            Self::ObjectCountMismatch { objects, targets } => write!(
                f,
                "{targets} render targets for {objects} objects, the OBJ might be corrupted"
            ),
        }
    }
}

/// A [`DiagnosticKind`] with the place it was found at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    file: Option<PathBuf>,
    line: Option<usize>,
}

impl Diagnostic {
    #[must_use]
    pub fn kind(&self) -> &DiagnosticKind {
        &self.kind
    }

    #[must_use]
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// 1-based line in [`file`](Self::file), if it came from a parser.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        self.line
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)?;
        if let Some(line) = self.line {
            write!(f, " ({})", Location::new(self.file.as_deref(), line))?;
        }
        Ok(())
    }
}

/// Collects diagnostics of one import and logs them as they are reported.
///
/// In strict mode, malformed input becomes an [`io::ErrorKind::InvalidData`]
/// error instead.
#[derive(Debug, Default)]
pub struct Diagnostics {
    strict: bool,
    file: Option<PathBuf>,
    line: Option<usize>,
    list: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            ..Self::default()
        }
    }

    pub(crate) fn set_file(&mut self, file: Option<&Path>) {
        self.file = file.map(Path::to_path_buf);
        self.line = None;
    }

    pub(crate) fn set_line(&mut self, line: Option<usize>) {
        self.line = line;
    }

    pub(crate) fn report(&mut self, kind: DiagnosticKind) -> io::Result<()> {
        let diagnostic = Diagnostic {
            kind,
            file: self.file.clone(),
            line: self.line,
        };
        log::log!(target: "obj_import", diagnostic.kind.level(), "{diagnostic}");
        if self.strict && diagnostic.kind.is_error_in_strict_mode() {
            return Err(diagnostic.into_io_error());
        }
        self.list.push(diagnostic);
        Ok(())
    }

    /// Parses a float token, reporting and substituting `0` if it is missing
    /// or malformed.
    pub(crate) fn float(&mut self, token: Option<&str>) -> io::Result<f32> {
        let token = token.unwrap_or_default();
        match float::parse(token) {
            Some(f) => Ok(f),
            None => {
                self.report(DiagnosticKind::Float(token.to_owned()))?;
                Ok(0.)
            }
        }
    }

    /// Parses an integer token, reporting and substituting `0` if it is
    /// missing or malformed.
    pub(crate) fn int(&mut self, token: Option<&str>) -> io::Result<i32> {
        let token = token.unwrap_or_default();
        match int::parse(token) {
            Some(i) => Ok(i),
            None => {
                self.report(DiagnosticKind::Int(token.to_owned()))?;
                Ok(0)
            }
        }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.list
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.list
    }
}

impl Diagnostic {
    #[cold]
    #[inline(never)]
    fn into_io_error(self) -> io::Error {
        let e = invalid_data(self.kind.to_string());
        match self.line {
            Some(line) => with_location(&e, &Location::new(self.file.as_deref(), line)),
            None => e,
        }
    }
}
