//! Font name resolution via fontconfig (made by FontLab https://www.fontlab.com/)

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::{debug, trace, warn};

use crate::error::ResolutionError;

/// Executable used by [`FcMatch`] unless overridden.
pub const FONTCONFIG_MATCH_PROGRAM: &str = "fc-match";

/// Output format asking fc-match for the matched file path and nothing else.
const FILE_FORMAT_ARG: &str = "--format=%{file}";

/// Trait for translating a logical font name into a concrete file path.
pub trait FontMatcher {
    fn match_font(&self, name: &str) -> Result<String, ResolutionError>;
}

impl<M: FontMatcher + ?Sized> FontMatcher for &M {
    fn match_font(&self, name: &str) -> Result<String, ResolutionError> {
        (**self).match_font(name)
    }
}

impl<M: FontMatcher + ?Sized> FontMatcher for Box<M> {
    fn match_font(&self, name: &str) -> Result<String, ResolutionError> {
        (**self).match_font(name)
    }
}

/// Matcher backed by fontconfig's `fc-match` command.
///
/// The path is returned exactly as the command printed it. fc-match does not
/// append a newline for `%{file}`, but a replacement program might, and any
/// trailing whitespace becomes part of the cache key.
#[derive(Debug, Clone)]
pub struct FcMatch {
    program: PathBuf,
}

impl Default for FcMatch {
    fn default() -> Self {
        Self {
            program: PathBuf::from(FONTCONFIG_MATCH_PROGRAM),
        }
    }
}

impl FcMatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable that accepts fc-match's arguments.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl FontMatcher for FcMatch {
    fn match_font(&self, name: &str) -> Result<String, ResolutionError> {
        let program = self.program.display().to_string();
        trace!("running {program} {FILE_FORMAT_ARG} {name:?}");

        let mut child = Command::new(&self.program)
            .arg(FILE_FORMAT_ARG)
            .arg(name)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| ResolutionError::Spawn {
                program: program.clone(),
                source,
            })?;

        let mut raw = Vec::new();
        if let Some(mut stdout) = child.stdout.take() {
            if let Err(source) = stdout.read_to_end(&mut raw) {
                let _ = child.wait();
                return Err(ResolutionError::ReadOutput { program, source });
            }
        }

        // Empty output wins over the exit status.
        if raw.is_empty() {
            let _ = child.wait();
            return Err(ResolutionError::NoMatch {
                program,
                name: name.to_string(),
            });
        }

        let status = child.wait().map_err(|source| ResolutionError::Wait {
            program: program.clone(),
            source,
        })?;
        if !status.success() {
            warn!(
                "{program} printed {:?} for {name:?} but exited with {status}",
                String::from_utf8_lossy(&raw)
            );
            return Err(ResolutionError::ExitStatus { program, status });
        }

        String::from_utf8(raw).map_err(|source| ResolutionError::NonUtf8Output {
            program,
            name: name.to_string(),
            source,
        })
    }
}

/// Whether `name` is taken literally as a file path instead of being matched.
pub fn is_absolute_font_path(name: &str) -> bool {
    name.starts_with('/')
}

/// Resolve `name` to a font file path.
///
/// Absolute paths are returned unchanged without consulting `matcher`, so
/// callers that only ever pass paths work on hosts without fontconfig.
pub fn resolve<M: FontMatcher + ?Sized>(
    name: &str,
    matcher: &M,
) -> Result<String, ResolutionError> {
    if is_absolute_font_path(name) {
        debug!("{name} is already a path; not matching");
        return Ok(name.to_string());
    }

    matcher.match_font(name)
}
