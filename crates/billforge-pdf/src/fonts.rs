//! # Fonts
//!
//! Font resolution happens once, at startup, through a capability check.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         FontSet::resolve                                │
//! │                                                                         │
//! │   regular.ttf ──┐                                                       │
//! │                 ├── both parse with ttf-parser? ──► Embedded (Type0)    │
//! │   bold.ttf ─────┘            │                                          │
//! │                              └── otherwise ───────► Helvetica pair      │
//! │                                                     (warning logged)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pair always falls back together so a document never mixes a TrueType
//! regular face with a built-in bold face.
//!
//! Embedded faces are written as Type0/CIDFontType2 fonts with Identity-H
//! encoding. CIDs equal glyph ids, so shown strings are big-endian glyph ids.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use pdf_writer::types::{CidFontType, FontFlags, SystemInfo};
use pdf_writer::{Name, Pdf, Rect, Ref, Str};
use tracing::{debug, info, warn};
use ttf_parser::Face;

use crate::error::AssetError;
use crate::metrics;

// =============================================================================
// Measuring
// =============================================================================

/// Anything that can report the printed width of a string.
pub trait TextMeasure {
    /// Width of `text` in points when set at `size` points.
    fn text_width(&self, text: &str, size: f32) -> f32;
}

/// Which face of the set to draw with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Regular,
    Bold,
}

// =============================================================================
// Built-in Fonts
// =============================================================================

/// One of the standard PDF fonts every viewer ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinFont {
    Helvetica,
    HelveticaBold,
}

impl BuiltinFont {
    pub fn base_name(self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    fn widths(self) -> &'static metrics::WidthTable {
        match self {
            BuiltinFont::Helvetica => &metrics::HELVETICA,
            BuiltinFont::HelveticaBold => &metrics::HELVETICA_BOLD,
        }
    }
}

// =============================================================================
// Embedded Fonts
// =============================================================================

/// A TrueType face parsed once and kept with its glyph table.
pub struct EmbeddedFont {
    family: String,
    data: Vec<u8>,
    units_per_em: u16,
    ascender: i16,
    descender: i16,
    bbox: [i16; 4],
    /// char -> (glyph id, advance in font units)
    glyphs: HashMap<char, (u16, u16)>,
    fallback_glyph: (u16, u16),
}

impl std::fmt::Debug for EmbeddedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddedFont")
            .field("family", &self.family)
            .field("bytes", &self.data.len())
            .field("glyphs", &self.glyphs.len())
            .finish()
    }
}

impl EmbeddedFont {
    /// Reads and validates a TrueType file.
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let data = std::fs::read(path).map_err(|e| AssetError::io(path, e))?;
        Self::from_bytes(data)
    }

    /// Parses font bytes and builds the character table for the BMP.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, AssetError> {
        let face = Face::parse(&data, 0).map_err(|e| AssetError::InvalidFont(e.to_string()))?;

        let units_per_em = face.units_per_em();
        if units_per_em == 0 {
            return Err(AssetError::InvalidFont("units per em is zero".to_string()));
        }

        let mut glyphs = HashMap::new();
        for code_point in 0x20u32..=0xFFFF {
            let Some(ch) = char::from_u32(code_point) else {
                continue;
            };
            if let Some(gid) = face.glyph_index(ch) {
                let advance = face.glyph_hor_advance(gid).unwrap_or(0);
                glyphs.insert(ch, (gid.0, advance));
            }
        }

        if glyphs.is_empty() {
            return Err(AssetError::InvalidFont(
                "font maps no Unicode characters".to_string(),
            ));
        }

        let fallback_glyph = glyphs
            .get(&'?')
            .copied()
            .unwrap_or((0, face.glyph_hor_advance(ttf_parser::GlyphId(0)).unwrap_or(0)));

        let family = face
            .names()
            .into_iter()
            .find(|name| name.name_id == ttf_parser::name_id::FAMILY)
            .and_then(|name| name.to_string())
            .unwrap_or_else(|| "EmbeddedFont".to_string());

        let bb = face.global_bounding_box();
        let bbox = [bb.x_min, bb.y_min, bb.x_max, bb.y_max];
        let ascender = face.ascender();
        let descender = face.descender();

        debug!(family = %family, glyphs = glyphs.len(), "Parsed TrueType font");

        Ok(EmbeddedFont {
            family,
            data,
            units_per_em,
            ascender,
            descender,
            bbox,
            glyphs,
            fallback_glyph,
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    fn glyph(&self, ch: char) -> (u16, u16) {
        self.glyphs.get(&ch).copied().unwrap_or(self.fallback_glyph)
    }

    fn scale(&self) -> f32 {
        1000.0 / f32::from(self.units_per_em)
    }
}

// =============================================================================
// FontFace
// =============================================================================

/// A single resolved face: built-in or embedded.
#[derive(Debug, Clone)]
pub enum FontFace {
    Builtin(BuiltinFont),
    Embedded(Arc<EmbeddedFont>),
}

impl FontFace {
    /// Encodes text into the byte string a `Tj` operator expects for this face.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            FontFace::Builtin(_) => text.chars().map(metrics::winansi_byte).collect(),
            FontFace::Embedded(font) => text
                .chars()
                .flat_map(|ch| font.glyph(ch).0.to_be_bytes())
                .collect(),
        }
    }

    /// Ascent in 1/1000 em.
    pub fn ascent(&self) -> f32 {
        match self {
            FontFace::Builtin(_) => metrics::HELVETICA_ASCENT,
            FontFace::Embedded(font) => f32::from(font.ascender) * font.scale(),
        }
    }

    /// Descent in 1/1000 em (negative).
    pub fn descent(&self) -> f32 {
        match self {
            FontFace::Builtin(_) => metrics::HELVETICA_DESCENT,
            FontFace::Embedded(font) => f32::from(font.descender) * font.scale(),
        }
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, FontFace::Embedded(_))
    }

    /// Writes the font objects into `pdf` under `font_ref`.
    ///
    /// `alloc` hands out the extra object ids an embedded face needs.
    pub fn write(&self, pdf: &mut Pdf, font_ref: Ref, alloc: &mut impl FnMut() -> Ref) {
        match self {
            FontFace::Builtin(builtin) => {
                pdf.type1_font(font_ref)
                    .base_font(Name(builtin.base_name().as_bytes()))
                    .encoding_predefined(Name(b"WinAnsiEncoding"));
            }
            FontFace::Embedded(font) => write_type0(pdf, font, font_ref, alloc),
        }
    }
}

impl TextMeasure for FontFace {
    fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: f32 = match self {
            FontFace::Builtin(builtin) => text
                .chars()
                .map(|ch| f32::from(metrics::advance(builtin.widths(), metrics::winansi_byte(ch))))
                .sum(),
            FontFace::Embedded(font) => {
                let scale = font.scale();
                text.chars()
                    .map(|ch| f32::from(font.glyph(ch).1) * scale)
                    .sum()
            }
        };
        units * size / 1000.0
    }
}

fn write_type0(pdf: &mut Pdf, font: &EmbeddedFont, font_ref: Ref, alloc: &mut impl FnMut() -> Ref) {
    let descriptor_ref = alloc();
    let cid_font_ref = alloc();
    let cid_to_gid_ref = alloc();
    let font_file_ref = alloc();
    let to_unicode_ref = alloc();

    let scale = font.scale();
    let base_font = font.family.replace(' ', "");

    // CID == GID, so the map is the identity over every glyph we use.
    let mut widths: BTreeMap<u16, f32> = BTreeMap::new();
    let mut unicode: BTreeMap<u16, char> = BTreeMap::new();
    for (&ch, &(gid, advance)) in &font.glyphs {
        widths.insert(gid, (f32::from(advance) * scale).round());
        unicode
            .entry(gid)
            .and_modify(|existing| {
                if ch < *existing {
                    *existing = ch;
                }
            })
            .or_insert(ch);
    }
    let max_gid = widths.keys().next_back().copied().unwrap_or(0);
    let cid_to_gid: Vec<u8> = (0..=max_gid).flat_map(u16::to_be_bytes).collect();
    pdf.stream(cid_to_gid_ref, &cid_to_gid);

    pdf.stream(font_file_ref, &font.data)
        .pair(Name(b"Length1"), font.data.len() as i32);

    pdf.stream(to_unicode_ref, to_unicode_cmap(&unicode).as_bytes());

    pdf.font_descriptor(descriptor_ref)
        .name(Name(base_font.as_bytes()))
        .flags(FontFlags::SYMBOLIC)
        .bbox(Rect::new(
            f32::from(font.bbox[0]) * scale,
            f32::from(font.bbox[1]) * scale,
            f32::from(font.bbox[2]) * scale,
            f32::from(font.bbox[3]) * scale,
        ))
        .italic_angle(0.0)
        .ascent(f32::from(font.ascender) * scale)
        .descent(f32::from(font.descender) * scale)
        .cap_height(f32::from(font.ascender) * scale)
        .stem_v(80.0)
        .font_file2(font_file_ref);

    {
        let mut cid_font = pdf.cid_font(cid_font_ref);
        cid_font
            .subtype(CidFontType::Type2)
            .base_font(Name(base_font.as_bytes()))
            .system_info(SystemInfo {
                registry: Str(b"Adobe"),
                ordering: Str(b"Identity"),
                supplement: 0,
            })
            .font_descriptor(descriptor_ref)
            .default_width(f32::from(font.fallback_glyph.1) * scale)
            .cid_to_gid_map_stream(cid_to_gid_ref);

        let mut writer = cid_font.widths();
        let mut runs = widths.into_iter().peekable();
        while let Some((start, first)) = runs.next() {
            let mut run = vec![first];
            let mut last = start;
            while let Some(&(next, width)) = runs.peek() {
                if next != last + 1 {
                    break;
                }
                run.push(width);
                last = next;
                runs.next();
            }
            writer.consecutive(start, run);
        }
    }

    pdf.type0_font(font_ref)
        .base_font(Name(base_font.as_bytes()))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_font_ref)
        .to_unicode(to_unicode_ref);
}

fn to_unicode_cmap(unicode: &BTreeMap<u16, char>) -> String {
    let pairs: Vec<(u16, char)> = unicode.iter().map(|(&gid, &ch)| (gid, ch)).collect();
    let mut sections = String::new();
    for chunk in pairs.chunks(100) {
        sections.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for (gid, ch) in chunk {
            let mut units = [0u16; 2];
            let hex: String = ch
                .encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{u:04X}"))
                .collect();
            sections.push_str(&format!("<{gid:04X}> <{hex}>\n"));
        }
        sections.push_str("endbfchar\n");
    }

    format!(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n\
         {sections}\
         endcmap\n\
         CMapName currentdict /CMap defineresource pop\n\
         end\n\
         end\n"
    )
}

// =============================================================================
// FontSet
// =============================================================================

/// The regular and bold faces every document is set in.
#[derive(Debug, Clone)]
pub struct FontSet {
    regular: FontFace,
    bold: FontFace,
}

impl FontSet {
    /// Helvetica and Helvetica-Bold.
    pub fn builtin() -> Self {
        FontSet {
            regular: FontFace::Builtin(BuiltinFont::Helvetica),
            bold: FontFace::Builtin(BuiltinFont::HelveticaBold),
        }
    }

    /// Uses already-parsed TrueType faces.
    pub fn embedded(regular: EmbeddedFont, bold: EmbeddedFont) -> Self {
        FontSet {
            regular: FontFace::Embedded(Arc::new(regular)),
            bold: FontFace::Embedded(Arc::new(bold)),
        }
    }

    /// Loads the TrueType pair if both paths are given and both files parse,
    /// otherwise returns the built-in pair.
    ///
    /// Never fails: a broken font file is logged and ignored.
    pub fn resolve(regular: Option<&Path>, bold: Option<&Path>) -> Self {
        let (Some(regular_path), Some(bold_path)) = (regular, bold) else {
            info!("No TrueType fonts configured, using built-in Helvetica");
            return Self::builtin();
        };

        match (
            EmbeddedFont::load(regular_path),
            EmbeddedFont::load(bold_path),
        ) {
            (Ok(regular), Ok(bold)) => {
                info!(
                    regular = %regular.family(),
                    bold = %bold.family(),
                    "Using embedded TrueType fonts"
                );
                Self::embedded(regular, bold)
            }
            (regular, bold) => {
                if let Err(e) = regular {
                    warn!(path = %regular_path.display(), error = %e, "Regular font unusable");
                }
                if let Err(e) = bold {
                    warn!(path = %bold_path.display(), error = %e, "Bold font unusable");
                }
                warn!("Falling back to built-in Helvetica");
                Self::builtin()
            }
        }
    }

    pub fn face(&self, weight: FontWeight) -> &FontFace {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }

    pub fn regular(&self) -> &FontFace {
        &self.regular
    }

    pub fn bold(&self) -> &FontFace {
        &self.bold
    }

    pub fn is_embedded(&self) -> bool {
        self.regular.is_embedded()
    }
}

impl Default for FontSet {
    fn default() -> Self {
        Self::builtin()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_width() {
        let face = FontFace::Builtin(BuiltinFont::Helvetica);
        // "Hi" = 722 + 222
        let w = face.text_width("Hi", 10.0);
        assert!((w - 9.44).abs() < 1e-4);
        assert_eq!(face.text_width("", 10.0), 0.0);
    }

    #[test]
    fn test_bold_is_wider() {
        let set = FontSet::builtin();
        let text = "Sub Total";
        assert!(set.bold().text_width(text, 10.0) > set.regular().text_width(text, 10.0));
    }

    #[test]
    fn test_builtin_encoding_replaces_unknown() {
        let face = FontFace::Builtin(BuiltinFont::Helvetica);
        assert_eq!(face.encode("Rs \u{20B9}5"), b"Rs ?5".to_vec());
    }

    #[test]
    fn test_builtin_encodes_latin1_and_punctuation() {
        let face = FontFace::Builtin(BuiltinFont::Helvetica);
        assert_eq!(face.encode("Café Müller"), b"Caf\xE9 M\xFCller".to_vec());
        assert_eq!(face.encode("Sanstha’s – “A”"), b"Sanstha\x92s \x96 \x93A\x94".to_vec());

        // "é" measures like "e", not like "?".
        let accented = face.text_width("Café", 10.0);
        let plain = face.text_width("Cafe", 10.0);
        assert!((accented - plain).abs() < 1e-4);
    }

    #[test]
    fn test_resolve_without_paths_is_builtin() {
        let set = FontSet::resolve(None, None);
        assert!(!set.is_embedded());
    }

    #[test]
    fn test_resolve_missing_files_falls_back() {
        let set = FontSet::resolve(
            Some(Path::new("/nonexistent/Inter-Regular.ttf")),
            Some(Path::new("/nonexistent/Inter-Bold.ttf")),
        );
        assert!(!set.is_embedded());
        assert!(matches!(
            set.face(FontWeight::Bold),
            FontFace::Builtin(BuiltinFont::HelveticaBold)
        ));
    }

    #[test]
    fn test_garbage_font_rejected() {
        let err = EmbeddedFont::from_bytes(b"not a font".to_vec()).unwrap_err();
        assert!(matches!(err, AssetError::InvalidFont(_)));
    }

    #[test]
    fn test_to_unicode_cmap_chunks() {
        let map: BTreeMap<u16, char> = (1u16..=150).map(|g| (g, 'A')).collect();
        let cmap = to_unicode_cmap(&map);
        assert!(cmap.contains("100 beginbfchar"));
        assert!(cmap.contains("50 beginbfchar"));
        assert!(cmap.contains("<0001> <0041>"));
    }
}
