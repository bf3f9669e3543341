//! Memoized and one-shot font loading (made by FontLab https://www.fontlab.com/)

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::error::{Error, Lookup};
use crate::font::{parse_file, FontParser, ReadFontsParser};
use crate::resolve::{resolve, FcMatch, FontMatcher};

/// Anything that can turn a font name into a shared parsed font.
pub trait FontLoader {
    type Font;

    /// Load `name`, also returning the path it resolved to.
    fn load_entry(&mut self, name: &str) -> Result<(String, Arc<Self::Font>), Error>;

    fn load(&mut self, name: &str) -> Result<Arc<Self::Font>, Error> {
        self.load_entry(name).map(|(_, font)| font)
    }
}

/// Counters describing what a [`FontCache`] has accumulated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Distinct names with a cached path.
    pub names: usize,
    /// Distinct paths with a cached font.
    pub fonts: usize,
    /// Loads that found the name already resolved.
    pub path_hits: u64,
    /// Loads that found the path already parsed.
    pub font_hits: u64,
}

/// Two-level cache: name to path, then path to parsed font.
///
/// Entries are never evicted. Two names that resolve to the same path share
/// one parsed font. A failed parse keeps the resolved path, so the next call
/// for that name skips the matcher and only retries the parse.
pub struct FontCache<M = FcMatch, P = ReadFontsParser>
where
    P: FontParser,
{
    matcher: M,
    parser: P,
    paths: HashMap<String, String>,
    fonts: HashMap<String, Arc<P::Font>>,
    path_hits: u64,
    font_hits: u64,
}

impl FontCache {
    /// Empty cache using fc-match and the `read-fonts` parser.
    pub fn new() -> Self {
        Self::with_backends(FcMatch::new(), ReadFontsParser)
    }
}

impl Default for FontCache {
    fn default() -> Self {
        Self::new()
    }
}

impl<M, P> FontCache<M, P>
where
    M: FontMatcher,
    P: FontParser,
{
    pub fn with_backends(matcher: M, parser: P) -> Self {
        Self {
            matcher,
            parser,
            paths: HashMap::new(),
            fonts: HashMap::new(),
            path_hits: 0,
            font_hits: 0,
        }
    }

    /// Load `name`, resolving and parsing only what is not cached yet.
    pub fn load(&mut self, name: &str) -> Result<Arc<P::Font>, Error> {
        self.load_as(name, Lookup::Memoized).map(|(_, font)| font)
    }

    fn load_as(&mut self, name: &str, lookup: Lookup) -> Result<(String, Arc<P::Font>), Error> {
        let path = match self.paths.get(name) {
            Some(path) => {
                debug!("path cache hit for {name}: {path}");
                self.path_hits += 1;
                path.clone()
            }
            None => {
                let path = resolve(name, &self.matcher).map_err(|source| Error::Resolution {
                    name: name.to_string(),
                    lookup,
                    source,
                })?;
                debug!("resolved {name} to {path}");
                self.paths.insert(name.to_string(), path.clone());
                path
            }
        };

        if let Some(font) = self.fonts.get(&path) {
            debug!("font cache hit for {path}");
            self.font_hits += 1;
            return Ok((path, Arc::clone(font)));
        }

        let font = parse_file(&path, &self.parser).map_err(|source| Error::Load {
            name: name.to_string(),
            path: path.clone(),
            lookup,
            source,
        })?;
        let font = Arc::new(font);
        debug!("parsed and cached {path}");
        self.fonts.insert(path.clone(), Arc::clone(&font));

        Ok((path, font))
    }

    /// The path `name` resolved to, if it has been resolved.
    pub fn cached_path(&self, name: &str) -> Option<&str> {
        self.paths.get(name).map(String::as_str)
    }

    /// Whether a parsed font is cached for `path`.
    pub fn is_loaded(&self, path: &str) -> bool {
        self.fonts.contains_key(path)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            names: self.paths.len(),
            fonts: self.fonts.len(),
            path_hits: self.path_hits,
            font_hits: self.font_hits,
        }
    }

    pub fn matcher(&self) -> &M {
        &self.matcher
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }
}

impl<M, P> FontLoader for FontCache<M, P>
where
    M: FontMatcher,
    P: FontParser,
{
    type Font = P::Font;

    fn load_entry(&mut self, name: &str) -> Result<(String, Arc<P::Font>), Error> {
        self.load_as(name, Lookup::Memoized)
    }
}

/// Loader that resolves and parses on every call.
///
/// Each call behaves like a fresh [`FontCache`] that is dropped afterwards.
#[derive(Debug, Clone, Default)]
pub struct OneShot<M = FcMatch, P = ReadFontsParser> {
    matcher: M,
    parser: P,
}

impl<M, P> OneShot<M, P>
where
    M: FontMatcher,
    P: FontParser,
{
    pub fn new(matcher: M, parser: P) -> Self {
        Self { matcher, parser }
    }

    pub fn load(&self, name: &str) -> Result<Arc<P::Font>, Error> {
        self.load_entry_once(name).map(|(_, font)| font)
    }

    fn load_entry_once(&self, name: &str) -> Result<(String, Arc<P::Font>), Error> {
        FontCache::with_backends(&self.matcher, &self.parser).load_as(name, Lookup::OneShot)
    }
}

impl<M, P> FontLoader for OneShot<M, P>
where
    M: FontMatcher,
    P: FontParser,
{
    type Font = P::Font;

    fn load_entry(&mut self, name: &str) -> Result<(String, Arc<P::Font>), Error> {
        self.load_entry_once(name)
    }
}
