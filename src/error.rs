use std::{fmt, io, path::Path};

macro_rules! format_err {
    ($msg:expr $(,)?) => {
        crate::error::invalid_data($msg)
    };
    ($($tt:tt)*) => {
        crate::error::invalid_data(format!($($tt)*))
    };
}

macro_rules! bail {
    ($($tt:tt)*) => {
        return Err(format_err!($($tt)*))
    };
}

#[cold]
pub(crate) fn invalid_data(e: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> io::Error {
    let e = e.into();
    let kind = e
        .downcast_ref::<io::Error>()
        .map_or(io::ErrorKind::InvalidData, io::Error::kind);
    io::Error::new(kind, e)
}

#[cold]
pub(crate) fn with_location(e: &io::Error, location: &Location<'_>) -> io::Error {
    io::Error::new(e.kind(), format!("{e} ({location})"))
}

/// Position of a line in an OBJ or MTL source.
pub(crate) struct Location<'a> {
    file: Option<&'a Path>,
    line: usize,
}

impl<'a> Location<'a> {
    pub(crate) fn new(file: Option<&'a Path>, line: usize) -> Self {
        Self {
            file: file.filter(|&p| p != Path::new("")),
            line,
        }
    }
}

impl fmt::Display for Location<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = self.file {
            write!(f, "{}:{}", file.display(), self.line)
        } else {
            write!(f, "line {}", self.line)
        }
    }
}
