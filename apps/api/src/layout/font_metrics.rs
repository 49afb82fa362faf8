//! Text Metrics Provider: width of a string for one of the two faces at a point size.
//!
//! Widths live in per-face em tables indexed by page-encoding code (0..=255).
//! The built-in pairing is Helvetica / Helvetica-Bold (PDF base-14 faces, AFM
//! widths). A TrueType/OpenType pairing can be loaded from disk instead; its
//! tables are precomputed from the font's `hmtx` advances so measuring stays a
//! table lookup.
//!
//! Text is measured and drawn through the same WinAnsi page encoding; characters
//! it cannot represent become `?` in both paths, so measurement and output agree.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::layout::LayoutError;

// ────────────────────────────────────────────────────────────────────────────
// Font variant
// ────────────────────────────────────────────────────────────────────────────

/// The two faces of the single supported font family pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontVariant {
    Regular,
    Bold,
}

// ────────────────────────────────────────────────────────────────────────────
// Provider trait
// ────────────────────────────────────────────────────────────────────────────

/// Measures rendered text width in points.
///
/// Must be pure and deterministic: the oracle and the renderer call it with the
/// same arguments and rely on identical answers.
pub trait TextMetrics: Send + Sync {
    fn width(&self, text: &str, variant: FontVariant, size_pt: f32) -> f32;
}

// ────────────────────────────────────────────────────────────────────────────
// Page encoding (WinAnsi)
// ────────────────────────────────────────────────────────────────────────────

/// WinAnsi codes 0x80..=0x9F that differ from Latin-1, with Helvetica and
/// Helvetica-Bold widths in 1/1000 em.
#[rustfmt::skip]
static WIN_ANSI_SPECIALS: [(char, u8, u16, u16); 27] = [
    ('€', 0x80, 556, 556), ('‚', 0x82, 222, 278), ('ƒ', 0x83, 556, 556),
    ('„', 0x84, 333, 500), ('…', 0x85, 1000, 1000), ('†', 0x86, 556, 556),
    ('‡', 0x87, 556, 556), ('ˆ', 0x88, 333, 333), ('‰', 0x89, 1000, 1000),
    ('Š', 0x8A, 667, 667), ('‹', 0x8B, 333, 333), ('Œ', 0x8C, 1000, 1000),
    ('Ž', 0x8E, 611, 611), ('\u{2018}', 0x91, 222, 278), ('\u{2019}', 0x92, 222, 278),
    ('\u{201C}', 0x93, 333, 500), ('\u{201D}', 0x94, 333, 500), ('•', 0x95, 350, 350),
    ('–', 0x96, 556, 556), ('—', 0x97, 1000, 1000), ('˜', 0x98, 333, 333),
    ('™', 0x99, 1000, 1000), ('š', 0x9A, 500, 556), ('›', 0x9B, 333, 333),
    ('œ', 0x9C, 944, 944), ('ž', 0x9E, 500, 500), ('Ÿ', 0x9F, 667, 667),
];

/// Page-encoding code for a character; `?` when it has none.
pub fn page_code(c: char) -> u8 {
    match c as u32 {
        code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
        _ => WIN_ANSI_SPECIALS
            .iter()
            .find(|(special, ..)| *special == c)
            .map(|(_, code, ..)| *code)
            .unwrap_or(b'?'),
    }
}

/// Character drawn for a page-encoding code, if the code is assigned.
pub fn code_char(code: u8) -> Option<char> {
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(char::from(code)),
        _ => WIN_ANSI_SPECIALS
            .iter()
            .find(|(_, special, ..)| *special == code)
            .map(|(c, ..)| *c),
    }
}

/// Encodes text into page-encoding bytes, as written into content streams.
pub fn encode_text(text: &str) -> Vec<u8> {
    text.chars().map(page_code).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Face metrics
// ────────────────────────────────────────────────────────────────────────────

/// Outline flavour of an embedded font program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramKind {
    TrueType,
    OpenTypeCff,
}

/// Font program bytes for a file-backed face, embedded at export time.
#[derive(Debug, Clone)]
pub struct FontProgram {
    pub data: Arc<Vec<u8>>,
    pub kind: ProgramKind,
    /// Ascent / descent / cap height in 1/1000 em.
    pub ascent: i32,
    pub descent: i32,
    pub cap_height: i32,
    /// `[x_min, y_min, x_max, y_max]` in 1/1000 em.
    pub bbox: [i32; 4],
}

/// Width table for one face.
#[derive(Debug, Clone)]
pub struct FaceMetrics {
    /// PostScript name used in the exported document.
    pub base_font: String,
    /// Em widths indexed by page-encoding code. `None` = no glyph for the code.
    widths: Vec<Option<f32>>,
    /// Width used when a code has no glyph.
    pub fallback_width: f32,
    /// `Some` for file-backed faces, `None` for the base-14 faces.
    pub program: Option<FontProgram>,
}

impl FaceMetrics {
    /// Width of `s` in em units.
    pub fn measure_em(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_em(c)).sum()
    }

    fn char_em(&self, c: char) -> f32 {
        self.widths[page_code(c) as usize].unwrap_or(self.fallback_width)
    }

    /// Width in 1/1000 em for an encoding code, as written into a `Widths` array.
    pub fn code_width_milli(&self, code: u8) -> i64 {
        let em = self.widths[code as usize].unwrap_or(self.fallback_width);
        (em * 1000.0).round() as i64
    }

    fn from_standard_table(
        base_font: &str,
        ascii: &[u16; 95],
        latin1: &[u16; 96],
        variant: FontVariant,
        fallback_milli: u16,
    ) -> Self {
        let mut widths = vec![None; 256];
        for (i, w) in ascii.iter().enumerate() {
            widths[i + 0x20] = Some(f32::from(*w) / 1000.0);
        }
        for (i, w) in latin1.iter().enumerate() {
            widths[i + 0xA0] = Some(f32::from(*w) / 1000.0);
        }
        for (_, code, regular, bold) in WIN_ANSI_SPECIALS.iter() {
            let w = match variant {
                FontVariant::Regular => *regular,
                FontVariant::Bold => *bold,
            };
            widths[*code as usize] = Some(f32::from(w) / 1000.0);
        }
        FaceMetrics {
            base_font: base_font.to_string(),
            widths,
            fallback_width: f32::from(fallback_milli) / 1000.0,
            program: None,
        }
    }

    /// Parses a TrueType/OpenType face and precomputes its width table.
    pub fn from_font_bytes(data: Vec<u8>, source: &str) -> Result<Self, LayoutError> {
        let face = ttf_parser::Face::parse(&data, 0).map_err(|e| LayoutError::FontUnavailable {
            path: source.to_string(),
            reason: e.to_string(),
        })?;

        let units = f32::from(face.units_per_em());
        if units <= 0.0 {
            return Err(LayoutError::FontUnavailable {
                path: source.to_string(),
                reason: "units_per_em is zero".to_string(),
            });
        }
        let advance_em = |c: char| -> Option<f32> {
            let gid = face.glyph_index(c)?;
            face.glyph_hor_advance(gid).map(|adv| f32::from(adv) / units)
        };

        let mut widths = vec![None; 256];
        for code in 0u8..=255 {
            if let Some(c) = code_char(code) {
                widths[code as usize] = advance_em(c);
            }
        }
        let fallback_width = advance_em('?')
            .or_else(|| {
                face.glyph_hor_advance(ttf_parser::GlyphId(0))
                    .map(|adv| f32::from(adv) / units)
            })
            .unwrap_or(0.5);

        let to_milli = |v: i16| (f32::from(v) * 1000.0 / units).round() as i32;
        let bbox = face.global_bounding_box();
        let ascent = to_milli(face.ascender());
        let descent = to_milli(face.descender());
        let cap_height = face.capital_height().map(to_milli).unwrap_or(ascent);
        let bbox = [
            to_milli(bbox.x_min),
            to_milli(bbox.y_min),
            to_milli(bbox.x_max),
            to_milli(bbox.y_max),
        ];
        let kind = if face.tables().cff.is_some() {
            ProgramKind::OpenTypeCff
        } else {
            ProgramKind::TrueType
        };
        let base_font = postscript_name(&face).unwrap_or_else(|| fallback_font_name(source));

        Ok(FaceMetrics {
            base_font,
            widths,
            fallback_width,
            program: Some(FontProgram {
                data: Arc::new(data),
                kind,
                ascent,
                descent,
                cap_height,
                bbox,
            }),
        })
    }
}

fn postscript_name(face: &ttf_parser::Face<'_>) -> Option<String> {
    use ttf_parser::name::name_id;

    let name = face
        .names()
        .into_iter()
        .filter(|entry| entry.name_id == name_id::POST_SCRIPT_NAME)
        .find_map(|entry| entry.to_string())?;
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    (!cleaned.is_empty()).then_some(cleaned)
}

fn fallback_font_name(source: &str) -> String {
    let stem = Path::new(source)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("EmbeddedFont");
    let cleaned: String = stem
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    if cleaned.is_empty() {
        "EmbeddedFont".to_string()
    } else {
        cleaned
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font pair
// ────────────────────────────────────────────────────────────────────────────

/// The plain + bold pairing the engine lays out with.
#[derive(Debug, Clone)]
pub struct FontPair {
    pub regular: FaceMetrics,
    pub bold: FaceMetrics,
}

impl FontPair {
    /// Helvetica / Helvetica-Bold. Always available.
    pub fn standard() -> Self {
        FontPair {
            regular: FaceMetrics::from_standard_table(
                "Helvetica",
                &HELVETICA_WIDTHS,
                &HELVETICA_LATIN1_WIDTHS,
                FontVariant::Regular,
                556,
            ),
            bold: FaceMetrics::from_standard_table(
                "Helvetica-Bold",
                &HELVETICA_BOLD_WIDTHS,
                &HELVETICA_BOLD_LATIN1_WIDTHS,
                FontVariant::Bold,
                611,
            ),
        }
    }

    pub fn from_bytes(regular: Vec<u8>, bold: Vec<u8>) -> Result<Self, LayoutError> {
        Ok(FontPair {
            regular: FaceMetrics::from_font_bytes(regular, "regular")?,
            bold: FaceMetrics::from_font_bytes(bold, "bold")?,
        })
    }

    /// Loads both faces from disk. Any read or parse failure is fatal.
    pub fn from_files(regular: &Path, bold: &Path) -> Result<Self, LayoutError> {
        Ok(FontPair {
            regular: load_face(regular)?,
            bold: load_face(bold)?,
        })
    }

    pub fn face(&self, variant: FontVariant) -> &FaceMetrics {
        match variant {
            FontVariant::Regular => &self.regular,
            FontVariant::Bold => &self.bold,
        }
    }
}

impl TextMetrics for FontPair {
    fn width(&self, text: &str, variant: FontVariant, size_pt: f32) -> f32 {
        self.face(variant).measure_em(text) * size_pt
    }
}

fn load_face(path: &Path) -> Result<FaceMetrics, LayoutError> {
    let source = path.display().to_string();
    let data = std::fs::read(path).map_err(|e| LayoutError::FontUnavailable {
        path: source.clone(),
        reason: e.to_string(),
    })?;
    FaceMetrics::from_font_bytes(data, &source)
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (1/1000 em; ASCII 0x20..=0x7E, Latin-1 0xA0..=0xFF)
// ────────────────────────────────────────────────────────────────────────────

/// Helvetica (WinAnsi: `'` is quotesingle, `` ` `` is grave).
#[rustfmt::skip]
static HELVETICA_WIDTHS: [u16; 95] = [
    // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0    1    2    3    4    5    6    7    8    9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // :    ;    <    =    >    ?    @
    278, 278, 584, 584, 584, 556, 1015,
    // A    B    C    D    E    F    G    H    I    J    K    L    M
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [    \    ]    ^    _    `
    278, 278, 278, 469, 556, 333,
    // a    b    c    d    e    f    g    h    i    j    k    l    m
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    // n    o    p    q    r    s    t    u    v    w    x    y    z
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // {    |    }    ~
    334, 260, 334, 584,
];

/// Helvetica-Bold.
#[rustfmt::skip]
static HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0    1    2    3    4    5    6    7    8    9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // :    ;    <    =    >    ?    @
    333, 333, 584, 584, 584, 611, 975,
    // A    B    C    D    E    F    G    H    I    J    K    L    M
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [    \    ]    ^    _    `
    333, 278, 333, 584, 556, 333,
    // a    b    c    d    e    f    g    h    i    j    k    l    m
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    // n    o    p    q    r    s    t    u    v    w    x    y    z
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    // {    |    }    ~
    389, 280, 389, 584,
];

/// Helvetica, WinAnsi 0xA0..=0xFF.
#[rustfmt::skip]
static HELVETICA_LATIN1_WIDTHS: [u16; 96] = [
    // nbsp ¡    ¢    £    ¤    ¥    ¦    §    ¨    ©    ª    «    ¬    shy  ®    ¯
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    // °    ±    ²    ³    ´    µ    ¶    ·    ¸    ¹    º    »    ¼    ½    ¾    ¿
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    // À    Á    Â    Ã    Ä    Å    Æ    Ç    È    É    Ê    Ë    Ì    Í    Î    Ï
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    // Ð    Ñ    Ò    Ó    Ô    Õ    Ö    ×    Ø    Ù    Ú    Û    Ü    Ý    Þ    ß
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    // à    á    â    ã    ä    å    æ    ç    è    é    ê    ë    ì    í    î    ï
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    // ð    ñ    ò    ó    ô    õ    ö    ÷    ø    ù    ú    û    ü    ý    þ    ÿ
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

/// Helvetica-Bold, WinAnsi 0xA0..=0xFF.
#[rustfmt::skip]
static HELVETICA_BOLD_LATIN1_WIDTHS: [u16; 96] = [
    // nbsp ¡    ¢    £    ¤    ¥    ¦    §    ¨    ©    ª    «    ¬    shy  ®    ¯
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    // °    ±    ²    ³    ´    µ    ¶    ·    ¸    ¹    º    »    ¼    ½    ¾    ¿
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    // À    Á    Â    Ã    Ä    Å    Æ    Ç    È    É    Ê    Ë    Ì    Í    Î    Ï
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    // Ð    Ñ    Ò    Ó    Ô    Õ    Ö    ×    Ø    Ù    Ú    Û    Ü    Ý    Þ    ß
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    // à    á    â    ã    ä    å    æ    ç    è    é    ê    ë    ì    í    î    ï
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    // ð    ñ    ò    ó    ô    õ    ö    ÷    ø    ù    ú    û    ü    ý    þ    ÿ
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
