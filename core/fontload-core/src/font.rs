//! Parsed font model and the file parser adapter (made by FontLab https://www.fontlab.com/)

use std::fs;

use log::debug;
use read_fonts::tables::name::NameId;
use read_fonts::types::Tag;
use read_fonts::{FileRef, FontRef, ReadError, TableProvider};
use serde::{Deserialize, Serialize};
use skrifa::{FontRef as SkrifaFontRef, MetadataProvider};

use crate::error::{BoxError, LoadError};

/// Metadata for one face of a font file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceInfo {
    pub ttc_index: Option<u32>,
    pub names: Vec<String>,
    pub units_per_em: Option<u16>,
    pub glyph_count: Option<u16>,
    #[serde(with = "crate::tags")]
    pub axis_tags: Vec<Tag>,
    #[serde(with = "crate::tags")]
    pub table_tags: Vec<Tag>,
    pub is_variable: bool,
    pub codepoint_count: usize,
}

/// A fully parsed font file: the raw bytes plus metadata for every face.
///
/// Always holds at least one face. Values handed out by a cache are shared
/// between callers, so nothing here is mutable after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    data: Vec<u8>,
    faces: Vec<FaceInfo>,
}

impl Font {
    /// Parse a single font or a TTC/OTC collection.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, BoxError> {
        let faces = {
            let file = FileRef::new(&data)?;
            let mut faces = Vec::new();
            for font in file.fonts() {
                faces.push(describe_face(&data, &font?)?);
            }
            faces
        };

        if faces.is_empty() {
            return Err("font collection contains no faces".into());
        }

        Ok(Self { data, faces })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn faces(&self) -> &[FaceInfo] {
        &self.faces
    }

    /// The first face; for a plain font file, the only one.
    pub fn primary(&self) -> &FaceInfo {
        &self.faces[0]
    }

    /// Borrow a `read-fonts` view of the face at position `face` in [`Font::faces`].
    pub fn face_ref(&self, face: usize) -> Option<FontRef<'_>> {
        let info = self.faces.get(face)?;
        face_at(&self.data, info.ttc_index).ok()
    }

    /// Whether the primary face maps `ch` to a glyph.
    pub fn covers(&self, ch: char) -> bool {
        self.face_ref(0)
            .map(|font| font.charmap().map(ch).is_some())
            .unwrap_or(false)
    }

    /// Whether the primary face maps every character of `text` to a glyph.
    pub fn covers_text(&self, text: &str) -> bool {
        let Some(font) = self.face_ref(0) else {
            return false;
        };
        let charmap = font.charmap();
        text.chars().all(|ch| charmap.map(ch).is_some())
    }
}

/// Turns raw file contents into a parsed font.
pub trait FontParser {
    type Font;

    fn parse(&self, data: Vec<u8>) -> Result<Self::Font, BoxError>;
}

impl<P: FontParser + ?Sized> FontParser for &P {
    type Font = P::Font;

    fn parse(&self, data: Vec<u8>) -> Result<Self::Font, BoxError> {
        (**self).parse(data)
    }
}

/// Parser for TrueType/OpenType fonts and collections, built on `read-fonts`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadFontsParser;

impl FontParser for ReadFontsParser {
    type Font = Font;

    fn parse(&self, data: Vec<u8>) -> Result<Font, BoxError> {
        Font::from_bytes(data)
    }
}

/// Read the whole file at `path` and hand it to `parser`.
pub fn parse_file<P: FontParser + ?Sized>(path: &str, parser: &P) -> Result<P::Font, LoadError> {
    let data = fs::read(path).map_err(|source| LoadError::Read {
        path: path.to_string(),
        source,
    })?;
    debug!("read {} bytes from {path}", data.len());

    parser.parse(data).map_err(|source| LoadError::Parse {
        path: path.to_string(),
        source,
    })
}

fn face_at(data: &[u8], ttc_index: Option<u32>) -> Result<SkrifaFontRef<'_>, ReadError> {
    match ttc_index {
        Some(idx) => SkrifaFontRef::from_index(data, idx),
        None => SkrifaFontRef::new(data),
    }
}

fn describe_face(data: &[u8], font: &FontRef) -> Result<FaceInfo, ReadError> {
    let ttc_index = font.ttc_index();
    let sfont = face_at(data, ttc_index)?;

    let mut axis_tags = collect_axes(font);
    let mut table_tags = collect_tables(font);
    dedup_tags(&mut axis_tags);
    dedup_tags(&mut table_tags);
    let is_variable = table_tags.contains(&Tag::new(b"fvar"));

    Ok(FaceInfo {
        ttc_index,
        names: dedup_names(collect_names(font)),
        units_per_em: font.head().ok().map(|head| head.units_per_em()),
        glyph_count: font.maxp().ok().map(|maxp| maxp.num_glyphs()),
        axis_tags,
        table_tags,
        is_variable,
        codepoint_count: sfont.charmap().mappings().count(),
    })
}

fn collect_tables(font: &FontRef) -> Vec<Tag> {
    font.table_directory
        .table_records()
        .iter()
        .map(|rec| rec.tag())
        .collect()
}

fn collect_axes(font: &FontRef) -> Vec<Tag> {
    if let Ok(fvar) = font.fvar() {
        if let Ok(axes) = fvar.axes() {
            return axes.iter().map(|axis| axis.axis_tag()).collect();
        }
    }
    Vec::new()
}

fn collect_names(font: &FontRef) -> Vec<String> {
    let mut names = Vec::new();

    if let Ok(name_table) = font.name() {
        let data = name_table.string_data();
        let wanted = [
            NameId::FAMILY_NAME,
            NameId::TYPOGRAPHIC_FAMILY_NAME,
            NameId::SUBFAMILY_NAME,
            NameId::FULL_NAME,
            NameId::POSTSCRIPT_NAME,
        ];

        for record in name_table.name_record() {
            if !record.is_unicode() || !wanted.contains(&record.name_id()) {
                continue;
            }
            if let Ok(entry) = record.string(data) {
                names.push(entry.to_string());
            }
        }
    }

    names
}

fn dedup_tags(tags: &mut Vec<Tag>) {
    tags.sort_unstable();
    tags.dedup();
}

fn dedup_names(mut names: Vec<String>) -> Vec<String> {
    for name in names.iter_mut() {
        *name = name.trim().to_string();
    }

    names.retain(|n| !n.is_empty());
    names.sort_unstable();
    names.dedup();
    names
}
