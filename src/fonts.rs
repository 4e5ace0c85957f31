use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use pdf_writer::{Name, Pdf, Rect, Ref};
use ttf_parser::Face;

use crate::error::Error;
use crate::measure::TextMeasurer;

/// Environment variables the CLI reads to pick embedded fonts.
pub const FONT_ENV: &str = "AIDREPORT_FONT";
pub const BOLD_FONT_ENV: &str = "AIDREPORT_FONT_BOLD";

/// Where measuring and drawing take their glyphs from. Both always use the
/// same source, so wrapped lines are drawn exactly as they were measured.
#[derive(Clone, Debug, Default)]
pub enum FontSource {
    /// Base-14 Helvetica and Helvetica-Bold with their AFM advances.
    #[default]
    Standard,
    /// TrueType/OpenType faces, subset and embedded. Without a bold face the
    /// header is drawn with the regular one.
    TrueType {
        regular: Arc<[u8]>,
        bold: Option<Arc<[u8]>>,
    },
}

impl FontSource {
    pub fn from_files(regular: PathBuf, bold: Option<PathBuf>) -> Result<Self, Error> {
        let read = |path: &PathBuf| -> Result<Arc<[u8]>, Error> {
            let data = std::fs::read(path).map_err(|e| {
                Error::Font(format!("cannot read {}: {e}", path.display()))
            })?;
            // Fail on a bad file here, not halfway through a render.
            Face::parse(&data, 0)
                .map_err(|e| Error::Font(format!("{}: {e}", path.display())))?;
            Ok(data.into())
        };
        Ok(FontSource::TrueType {
            regular: read(&regular)?,
            bold: bold.as_ref().map(read).transpose()?,
        })
    }

    /// `AIDREPORT_FONT` (and optionally `AIDREPORT_FONT_BOLD`) select embedded
    /// fonts; otherwise the standard Helvetica pair is used.
    pub fn from_env() -> Result<Self, Error> {
        match std::env::var_os(FONT_ENV) {
            Some(regular) if !regular.is_empty() => {
                let bold = std::env::var_os(BOLD_FONT_ENV)
                    .filter(|b| !b.is_empty())
                    .map(PathBuf::from);
                Self::from_files(PathBuf::from(regular), bold)
            }
            _ => Ok(FontSource::Standard),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    fn base_font(self) -> &'static [u8] {
        match self {
            StandardFont::Helvetica => b"Helvetica",
            StandardFont::HelveticaBold => b"Helvetica-Bold",
        }
    }

    fn ascii_widths(self) -> &'static [u16; 95] {
        match self {
            StandardFont::Helvetica => &HELVETICA_WIDTHS,
            StandardFont::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    fn latin1_widths(self) -> &'static [u16; 96] {
        match self {
            StandardFont::Helvetica => &HELVETICA_LATIN1_WIDTHS,
            StandardFont::HelveticaBold => &HELVETICA_BOLD_LATIN1_WIDTHS,
        }
    }
}

/// Helvetica AFM advances for ASCII 32..=126.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

/// Helvetica-Bold AFM advances for ASCII 32..=126.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

/// Helvetica AFM advances for WinAnsi 0xA0..=0xFF (Latin-1).
#[rustfmt::skip]
const HELVETICA_LATIN1_WIDTHS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

/// Helvetica-Bold AFM advances for WinAnsi 0xA0..=0xFF (Latin-1).
#[rustfmt::skip]
const HELVETICA_BOLD_LATIN1_WIDTHS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

/// Advances for the WinAnsi 0x80..=0x9F block, indexed by byte.
fn winansi_high_width(byte: u8, bold: bool) -> u16 {
    match byte {
        0x80 | 0x83 | 0x86 | 0x87 | 0x96 => 556,
        0x85 | 0x89 | 0x97 | 0x99 | 0x8C => 1000,
        0x88 | 0x98 | 0x8B | 0x9B => 333,
        0x8A | 0x9F => 667,
        0x8E => 611,
        0x95 => 350,
        0x9C => 944,
        0x82 | 0x91 | 0x92 => if bold { 278 } else { 222 },
        0x84 | 0x93 | 0x94 => if bold { 500 } else { 333 },
        0x9A => if bold { 556 } else { 500 },
        0x9E => 500,
        _ => 0,
    }
}

impl TextMeasurer for StandardFont {
    fn advance_1000(&self, ch: char) -> f32 {
        let bold = *self == StandardFont::HelveticaBold;
        // Unmappable characters are dropped when the text is encoded.
        let w: u16 = match char_to_winansi(ch) {
            0 => 0,
            b @ 0x20..=0x7E => self.ascii_widths()[usize::from(b - 0x20)],
            b @ 0xA0..=0xFF => self.latin1_widths()[usize::from(b - 0xA0)],
            b => winansi_high_width(b, bold),
        };
        w as f32
    }
}

/// Advances read from a TrueType/OpenType face's cmap and hmtx tables.
pub struct FaceMetrics {
    data: Arc<[u8]>,
    family: String,
    advances: HashMap<char, f32>,
    notdef_advance: f32,
}

impl FaceMetrics {
    pub fn parse(data: Arc<[u8]>) -> Result<Self, Error> {
        let face = Face::parse(&data, 0).map_err(|e| Error::Font(e.to_string()))?;
        let units = face.units_per_em() as f32;
        let to_1000 = |adv: u16| adv as f32 / units * 1000.0;

        let mut advances = HashMap::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables {
                if !subtable.is_unicode() {
                    continue;
                }
                subtable.codepoints(|cp| {
                    let Some(ch) = char::from_u32(cp) else {
                        return;
                    };
                    if let Some(adv) = subtable
                        .glyph_index(cp)
                        .and_then(|gid| face.glyph_hor_advance(gid))
                    {
                        advances.entry(ch).or_insert(to_1000(adv));
                    }
                });
            }
        }
        let notdef_advance = face
            .glyph_hor_advance(ttf_parser::GlyphId(0))
            .map(to_1000)
            .unwrap_or(0.0);
        let family = font_family_name(&face).unwrap_or_else(|| "EmbeddedFont".to_string());

        Ok(Self {
            family,
            advances,
            notdef_advance,
            data: data.clone(),
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }
}

impl TextMeasurer for FaceMetrics {
    fn advance_1000(&self, ch: char) -> f32 {
        // Characters without a glyph are drawn as .notdef.
        self.advances.get(&ch).copied().unwrap_or(self.notdef_advance)
    }
}

fn font_family_name(face: &Face) -> Option<String> {
    for name in face.names() {
        if name.name_id == ttf_parser::name_id::FAMILY
            && name.is_unicode()
            && let Some(s) = name.to_string()
        {
            return Some(s);
        }
    }
    None
}

pub(crate) enum LoadedFace {
    Standard(StandardFont),
    TrueType(FaceMetrics),
}

impl TextMeasurer for LoadedFace {
    fn advance_1000(&self, ch: char) -> f32 {
        match self {
            LoadedFace::Standard(f) => f.advance_1000(ch),
            LoadedFace::TrueType(f) => f.advance_1000(ch),
        }
    }
}

/// Faces for one render: body text and header text.
pub(crate) struct LoadedFonts {
    pub(crate) regular: LoadedFace,
    pub(crate) bold: LoadedFace,
    /// True when the header reuses the regular face.
    shared: bool,
}

impl LoadedFonts {
    pub(crate) fn load(source: &FontSource) -> Result<Self, Error> {
        Ok(match source {
            FontSource::Standard => LoadedFonts {
                regular: LoadedFace::Standard(StandardFont::Helvetica),
                bold: LoadedFace::Standard(StandardFont::HelveticaBold),
                shared: false,
            },
            FontSource::TrueType { regular, bold } => {
                let regular_face = FaceMetrics::parse(regular.clone())?;
                let (bold_face, shared) = match bold {
                    Some(data) => (FaceMetrics::parse(data.clone())?, false),
                    None => (FaceMetrics::parse(regular.clone())?, true),
                };
                LoadedFonts {
                    regular: LoadedFace::TrueType(regular_face),
                    bold: LoadedFace::TrueType(bold_face),
                    shared,
                }
            }
        })
    }
}

#[derive(Clone)]
pub(crate) struct FontEntry {
    pub(crate) pdf_name: String,
    pub(crate) font_ref: Ref,
    pub(crate) char_to_gid: Option<HashMap<char, u16>>,
}

impl FontEntry {
    /// Bytes for a `Tj` string in this font's encoding.
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match &self.char_to_gid {
            Some(map) => encode_as_gids(text, map),
            None => to_winansi_bytes(text),
        }
    }
}

/// Write the font objects for one render. `used_regular` and `used_bold` are
/// every character drawn with each face, used to subset embedded fonts.
pub(crate) fn register_fonts(
    pdf: &mut Pdf,
    fonts: &LoadedFonts,
    used_regular: &HashSet<char>,
    used_bold: &HashSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Result<(FontEntry, FontEntry), Error> {
    if fonts.shared {
        // One subset serves body and header text.
        let used: HashSet<char> = used_regular.union(used_bold).copied().collect();
        let regular = register_face(pdf, &fonts.regular, "F1", &used, alloc)?;
        return Ok((regular.clone(), regular));
    }
    let regular = register_face(pdf, &fonts.regular, "F1", used_regular, alloc)?;
    let bold = register_face(pdf, &fonts.bold, "F2", used_bold, alloc)?;
    Ok((regular, bold))
}

fn register_face(
    pdf: &mut Pdf,
    face: &LoadedFace,
    pdf_name: &str,
    used_chars: &HashSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Result<FontEntry, Error> {
    let t0 = std::time::Instant::now();
    let font_ref = alloc();
    let char_to_gid = match face {
        LoadedFace::Standard(std_font) => {
            pdf.type1_font(font_ref)
                .base_font(Name(std_font.base_font()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
            None
        }
        LoadedFace::TrueType(metrics) => {
            let descriptor_ref = alloc();
            let data_ref = alloc();
            let mut used = used_chars.clone();
            used.insert(' ');
            Some(embed_truetype(
                pdf,
                font_ref,
                descriptor_ref,
                data_ref,
                metrics,
                &used,
                alloc,
            )?)
        }
    };

    log::debug!(
        "register_face: {pdf_name} ({} chars) → {:.1}ms",
        used_chars.len(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );

    Ok(FontEntry {
        pdf_name: pdf_name.to_string(),
        font_ref,
        char_to_gid,
    })
}

/// Embed a TrueType/OpenType font as a CIDFont (Type0 composite) with Identity-H encoding.
/// The font data is subsetted to only include glyphs used in the document.
fn embed_truetype(
    pdf: &mut Pdf,
    font_ref: Ref,
    descriptor_ref: Ref,
    data_ref: Ref,
    metrics: &FaceMetrics,
    used_chars: &HashSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Result<HashMap<char, u16>, Error> {
    let font_data: &[u8] = &metrics.data;
    let face = Face::parse(font_data, 0).map_err(|e| Error::Font(e.to_string()))?;

    let units = face.units_per_em() as f32;
    let ascent = face.ascender() as f32 / units * 1000.0;
    let descent = face.descender() as f32 / units * 1000.0;
    let cap_height = face
        .capital_height()
        .map(|h| h as f32 / units * 1000.0)
        .unwrap_or(700.0);

    let bb = face.global_bounding_box();
    let bbox = Rect::new(
        bb.x_min as f32 / units * 1000.0,
        bb.y_min as f32 / units * 1000.0,
        bb.x_max as f32 / units * 1000.0,
        bb.y_max as f32 / units * 1000.0,
    );

    // Keep glyph order stable across runs so identical input gives identical bytes.
    let mut chars: Vec<char> = used_chars.iter().copied().collect();
    chars.sort_unstable();

    let mut remapper = subsetter::GlyphRemapper::new();
    let mut char_to_gid = HashMap::new();
    for ch in chars {
        if let Some(gid) = face.glyph_index(ch) {
            let new_gid = remapper.remap(gid.0);
            char_to_gid.insert(ch, new_gid);
        }
    }

    let subset_data = subsetter::subset(font_data, 0, &remapper).unwrap_or_else(|e| {
        log::warn!(
            "Font subsetting failed for {}: {e}; embedding full font",
            metrics.family
        );
        font_data.to_vec()
    });

    let data_len = i32::try_from(subset_data.len())
        .map_err(|_| Error::Font(format!("{} is too large to embed", metrics.family)))?;
    pdf.stream(data_ref, &subset_data)
        .pair(Name(b"Length1"), data_len);

    let ps_name: String = metrics.family.chars().filter(|c| !c.is_whitespace()).collect();

    pdf.font_descriptor(descriptor_ref)
        .name(Name(ps_name.as_bytes()))
        .flags(pdf_writer::types::FontFlags::NON_SYMBOLIC)
        .bbox(bbox)
        .italic_angle(0.0)
        .ascent(ascent)
        .descent(descent)
        .cap_height(cap_height)
        .stem_v(80.0)
        .font_file2(data_ref);

    let cid_font_ref = alloc();
    let system_info = pdf_writer::types::SystemInfo {
        registry: pdf_writer::Str(b"Adobe"),
        ordering: pdf_writer::Str(b"Identity"),
        supplement: 0,
    };
    {
        let mut cid = pdf.cid_font(cid_font_ref);
        cid.subtype(pdf_writer::types::CidFontType::Type2);
        cid.base_font(Name(ps_name.as_bytes()));
        cid.system_info(system_info);
        cid.font_descriptor(descriptor_ref);
        cid.default_width(0.0);
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
        let mut gid_widths: Vec<(u16, f32)> = char_to_gid
            .iter()
            .map(|(&ch, &new_gid)| (new_gid, metrics.advance_1000(ch)))
            .collect();
        gid_widths.sort_by_key(|&(gid, _)| gid);
        gid_widths.dedup_by_key(|&mut (gid, _)| gid);
        if !gid_widths.is_empty() {
            let mut w = cid.widths();
            for &(gid, width) in &gid_widths {
                w.consecutive(gid, [width]);
            }
        }
    }

    let tounicode_ref = alloc();
    let cmap_name = format!("{}-UTF16", ps_name);
    let mut cmap = pdf_writer::types::UnicodeCmap::new(
        Name(cmap_name.as_bytes()),
        pdf_writer::types::SystemInfo {
            registry: pdf_writer::Str(b"Adobe"),
            ordering: pdf_writer::Str(b"Identity"),
            supplement: 0,
        },
    );
    let mut pairs: Vec<(u16, char)> = char_to_gid.iter().map(|(&ch, &gid)| (gid, ch)).collect();
    pairs.sort_unstable();
    for (new_gid, ch) in pairs {
        cmap.pair(new_gid, ch);
    }
    let cmap_data = cmap.finish();
    pdf.stream(tounicode_ref, cmap_data.as_slice());

    pdf.type0_font(font_ref)
        .base_font(Name(ps_name.as_bytes()))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_font_ref)
        .to_unicode(tounicode_ref);

    Ok(char_to_gid)
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007E => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes, dropping anything
/// the encoding cannot represent.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(char_to_winansi)
        .filter(|&b| b != 0)
        .collect()
}

/// Encode UTF-8 text as big-endian 2-byte glyph IDs for CIDFont content streams.
pub(crate) fn encode_as_gids(text: &str, char_to_gid: &HashMap<char, u16>) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for ch in text.chars() {
        let gid = char_to_gid.get(&ch).copied().unwrap_or(0);
        out.push((gid >> 8) as u8);
        out.push((gid & 0xFF) as u8);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helvetica_ascii_advances() {
        let h = StandardFont::Helvetica;
        assert_eq!(h.advance_1000(' '), 278.0);
        assert_eq!(h.advance_1000('W'), 944.0);
        assert_eq!(h.advance_1000('i'), 222.0);
        assert_eq!(h.advance_1000('~'), 584.0);
        assert_eq!(StandardFont::HelveticaBold.advance_1000('i'), 278.0);
        assert_eq!(StandardFont::HelveticaBold.advance_1000('@'), 975.0);
    }

    #[test]
    fn accented_letters_use_base_advance() {
        let h = StandardFont::Helvetica;
        assert_eq!(h.advance_1000('ã'), h.advance_1000('a'));
        assert_eq!(h.advance_1000('Ç'), h.advance_1000('C'));
        assert_eq!(h.advance_1000('í'), 278.0);
    }

    #[test]
    fn latin1_symbols_use_their_afm_advances() {
        let h = StandardFont::Helvetica;
        assert_eq!(h.advance_1000('Ø'), 778.0);
        assert_eq!(h.advance_1000('©'), 737.0);
        assert_eq!(h.advance_1000('¿'), 611.0);
        assert_eq!(h.advance_1000('¡'), 333.0);
        assert_eq!(h.advance_1000('µ'), 556.0);
        assert_eq!(h.advance_1000('ÿ'), 500.0);

        let b = StandardFont::HelveticaBold;
        assert_eq!(b.advance_1000('µ'), 611.0);
        assert_eq!(b.advance_1000('ø'), 611.0);
        assert_eq!(b.advance_1000('€'), 556.0);
        assert_eq!(b.advance_1000('’'), 278.0);
        assert_eq!(h.advance_1000('’'), 222.0);
    }

    #[test]
    fn unencodable_characters_take_no_space() {
        let h = StandardFont::Helvetica;
        assert_eq!(h.advance_1000('中'), 0.0);
        assert_eq!(to_winansi_bytes("a中b"), b"ab".to_vec());
    }

    #[test]
    fn winansi_encoding() {
        assert_eq!(to_winansi_bytes("São €"), vec![b'S', 0xE3, b'o', b' ', 0x80]);
    }

    #[test]
    fn helvetica_word_width() {
        // "Rice" = 722 + 222 + 500 + 556 = 2000 → 20pt at 10pt size.
        let w = StandardFont::Helvetica.word_width("Rice", 10.0);
        assert!((w - 20.0).abs() < 1e-4, "{w}");
    }

    #[test]
    fn gid_encoding_is_big_endian() {
        let map = HashMap::from([('a', 0x0102u16)]);
        assert_eq!(encode_as_gids("ab", &map), vec![0x01, 0x02, 0x00, 0x00]);
    }

    #[test]
    fn rejects_non_font_data() {
        assert!(FaceMetrics::parse(Arc::from(&b"not a font"[..])).is_err());
    }

    #[test]
    fn shared_face_subset_covers_header_text() {
        let path = PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf");
        if !path.is_file() {
            println!("  [SKIP] {} not installed", path.display());
            return;
        }
        let fonts = LoadedFonts::load(&FontSource::from_files(path, None).unwrap()).unwrap();
        let used_regular: HashSet<char> = "10 un".chars().collect();
        let used_bold: HashSet<char> = "Stock Report - 03/2026ProductExpired".chars().collect();

        let mut pdf = Pdf::new();
        let mut next = 1;
        let mut alloc = || {
            next += 1;
            Ref::new(next)
        };
        let (regular, bold) =
            register_fonts(&mut pdf, &fonts, &used_regular, &used_bold, &mut alloc).unwrap();

        assert_eq!(regular.pdf_name, bold.pdf_name);
        let map = bold.char_to_gid.as_ref().unwrap();
        let missing: String = used_bold
            .union(&used_regular)
            .filter(|ch| !map.contains_key(ch))
            .collect();
        assert!(missing.is_empty(), "no glyphs for {missing:?}");
        assert!(!encode_as_gids("Stock", map).chunks(2).any(|gid| gid == [0, 0]));
    }
}
