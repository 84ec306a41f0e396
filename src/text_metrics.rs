use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

use crate::layout::Point;

/// Anything that can report the advance width of a run of text.
pub trait TextMeasure {
    fn measure_width(&self, text: &str, font_family: &str, font_size: f64) -> f64;
}

/// Draw origin that makes `text` appear centered on `target`.
///
/// The vertical offset of a third of the font size approximates centering a
/// single line on its visual middle; it is not derived from font metrics.
pub fn centered_origin<M: TextMeasure + ?Sized>(
    surface: &M,
    text: &str,
    font_family: &str,
    font_size: f64,
    target: Point,
) -> Point {
    let width = surface.measure_width(text, font_family, font_size);
    Point::new(target.x - width / 2.0, target.y - font_size / 3.0)
}

/// Advance widths of Helvetica for ASCII 32..=126, in 1/1000 em.
const HELVETICA_ADVANCES: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

const HELVETICA_FALLBACK: u16 = 556;

/// Width of `text` set in the PDF base font Helvetica.
pub fn helvetica_width(text: &str, font_size: f64) -> f64 {
    let units: u32 = text
        .chars()
        .filter(|ch| *ch != '\n')
        .map(|ch| {
            let code = ch as u32;
            if (32..=126).contains(&code) {
                u32::from(HELVETICA_ADVANCES[(code - 32) as usize])
            } else {
                u32::from(HELVETICA_FALLBACK)
            }
        })
        .sum();
    f64::from(units) * font_size / 1000.0
}

/// Measures with the system font best matching `font_family`, or with the
/// Helvetica table when nothing resolves.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFontMeasure;

impl TextMeasure for SystemFontMeasure {
    fn measure_width(&self, text: &str, font_family: &str, font_size: f64) -> f64 {
        measure_text_width(text, font_size as f32, font_family)
            .map(f64::from)
            .unwrap_or_else(|| helvetica_width(text, font_size))
    }
}

/// Helvetica-only measurement, matching what a PDF viewer will lay out.
#[derive(Debug, Default, Clone, Copy)]
pub struct HelveticaMeasure;

impl TextMeasure for HelveticaMeasure {
    fn measure_width(&self, text: &str, _font_family: &str, font_size: f64) -> f64 {
        helvetica_width(text, font_size)
    }
}

static TEXT_MEASURER: Lazy<Mutex<TextMeasurer>> = Lazy::new(|| Mutex::new(TextMeasurer::new()));

pub fn measure_text_width(text: &str, font_size: f32, font_family: &str) -> Option<f32> {
    if text.is_empty() || font_size <= 0.0 {
        return Some(0.0);
    }
    let mut guard = TEXT_MEASURER.lock().ok()?;
    guard.measure(text, font_size, font_family)
}

struct TextMeasurer {
    db: Database,
    loaded_system_fonts: bool,
    faces: HashMap<String, Option<FontFace>>,
}

impl TextMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            faces: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        let key = font_family.trim().to_ascii_lowercase();
        if !self.faces.contains_key(&key) {
            let face = self.load_face(font_family);
            if face.is_none() {
                crate::log::debug!(family = font_family, "no system font, using Helvetica metrics");
            }
            self.faces.insert(key.clone(), face);
        }
        self.faces.get(&key)?.as_ref()?.measure_width(text, font_size)
    }

    fn load_face(&mut self, font_family: &str) -> Option<FontFace> {
        let names: Vec<&str> = font_family
            .split(',')
            .map(|part| part.trim().trim_matches('"').trim_matches('\''))
            .filter(|part| !part.is_empty())
            .collect();
        let mut families: Vec<Family<'_>> = names
            .iter()
            .map(|name| match name.to_ascii_lowercase().as_str() {
                "serif" => Family::Serif,
                "sans-serif" | "system-ui" => Family::SansSerif,
                "monospace" => Family::Monospace,
                _ => Family::Name(*name),
            })
            .collect();
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        self.db
            .with_face_data(id, |data, index| FontFace::parse(data, index))
            .flatten()
    }
}

/// Advance widths pulled out of a face once, so later measurements need no
/// parsing.
struct FontFace {
    units_per_em: f32,
    ascii_advances: [u16; 128],
    other_advances: HashMap<char, u16>,
}

impl FontFace {
    fn parse(data: &[u8], index: u32) -> Option<Self> {
        let face = Face::parse(data, index).ok()?;
        let mut ascii_advances = [0u16; 128];
        for byte in 0u8..=127 {
            if let Some(glyph) = face.glyph_index(byte as char) {
                ascii_advances[byte as usize] = face.glyph_hor_advance(glyph).unwrap_or(0);
            }
        }
        // Labels and captions stick to ASCII apart from the occasional
        // typographic symbol.
        let other_advances = ['°', '′', '″', '×', '–', '—']
            .into_iter()
            .filter_map(|ch| {
                let glyph = face.glyph_index(ch)?;
                Some((ch, face.glyph_hor_advance(glyph)?))
            })
            .collect();
        Some(Self {
            units_per_em: f32::from(face.units_per_em().max(1)),
            ascii_advances,
            other_advances,
        })
    }

    fn measure_width(&self, text: &str, font_size: f32) -> Option<f32> {
        let scale = font_size / self.units_per_em;
        let fallback = font_size * 0.556;
        let mut width = 0.0f32;
        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            let advance = if ch.is_ascii() {
                self.ascii_advances[ch as usize]
            } else {
                self.other_advances.get(&ch).copied().unwrap_or(0)
            };
            if advance == 0 {
                width += fallback;
            } else {
                width += f32::from(advance) * scale;
            }
        }
        Some(width.max(0.0))
    }
}
