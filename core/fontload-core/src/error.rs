//! Error taxonomy for resolution and loading (made by FontLab https://www.fontlab.com/)

use std::fmt;
use std::io;
use std::process::ExitStatus;

/// Boxed failure reported by a [`crate::font::FontParser`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A font name could not be translated into a file path.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    #[error("failed to invoke {program}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read output of {program}")]
    ReadOutput {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("no font matched {name} via {program}")]
    NoMatch { program: String, name: String },

    #[error("{program} exited with non-zero status ({status})")]
    ExitStatus { program: String, status: ExitStatus },

    #[error("{program} printed a path for {name} that is not valid UTF-8")]
    NonUtf8Output {
        program: String,
        name: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("failed waiting for {program}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// The file at a resolved path could not be read or parsed.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to open font file: {path}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse font file: {path}")]
    Parse {
        path: String,
        #[source]
        source: BoxError,
    },
}

impl LoadError {
    pub fn path(&self) -> &str {
        match self {
            LoadError::Read { path, .. } | LoadError::Parse { path, .. } => path,
        }
    }
}

/// Which loading strategy produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// A [`crate::cache::FontCache`] missed and had to do the work.
    Memoized,
    /// An unmemoized load; every call does the work.
    OneShot,
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Memoized => f.write_str("non-cached font"),
            Lookup::OneShot => f.write_str("font"),
        }
    }
}

/// Failure of a top-level load, wrapped with the name and path involved.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not find {lookup}: {name}")]
    Resolution {
        name: String,
        lookup: Lookup,
        #[source]
        source: ResolutionError,
    },

    #[error("could not load {lookup} {name} from {path}")]
    Load {
        name: String,
        path: String,
        lookup: Lookup,
        #[source]
        source: LoadError,
    },
}

impl Error {
    pub fn is_resolution(&self) -> bool {
        matches!(self, Error::Resolution { .. })
    }

    pub fn is_load(&self) -> bool {
        matches!(self, Error::Load { .. })
    }

    /// The font name the caller asked for.
    pub fn name(&self) -> &str {
        match self {
            Error::Resolution { name, .. } | Error::Load { name, .. } => name,
        }
    }

    pub fn lookup(&self) -> Lookup {
        match self {
            Error::Resolution { lookup, .. } | Error::Load { lookup, .. } => *lookup,
        }
    }
}
