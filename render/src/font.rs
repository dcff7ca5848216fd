//! Standard-14 Helvetica faces: WinAnsi encoding and advance widths.
//!
//! Widths are the Adobe AFM advance widths in 1/1000 em. Nothing is
//! embedded in the document; viewers supply the faces.

/// Fonts used on the badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Font {
    /// Body text.
    Helvetica,
    /// Header and name.
    HelveticaBold,
    /// Signature.
    HelveticaOblique,
}

impl Font {
    /// Every font, in resource order.
    pub const ALL: [Self; 3] = [Self::Helvetica, Self::HelveticaBold, Self::HelveticaOblique];

    /// `/BaseFont` name.
    #[must_use]
    pub const fn base_font(self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
        }
    }

    /// Name of the font in the page's `/Font` resource dictionary.
    #[must_use]
    pub const fn resource_name(self) -> &'static str {
        match self {
            Self::Helvetica => "F1",
            Self::HelveticaBold => "F2",
            Self::HelveticaOblique => "F3",
        }
    }

    /// Width of `text` in points at `size`.
    #[must_use]
    pub fn text_width(self, text: &str, size: f32) -> f32 {
        let units: u64 = encode_win_ansi(text)
            .into_iter()
            .map(|byte| u64::from(self.advance(byte)))
            .sum();
        // Only comparisons against the usable width need this to be exact.
        #[allow(clippy::cast_precision_loss)]
        let units = units as f32;
        units * size / 1000.0
    }

    /// Advance width of one WinAnsi byte.
    fn advance(self, byte: u8) -> u16 {
        let bold = matches!(self, Self::HelveticaBold);
        match byte {
            0x20..=0x7E => {
                let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
                table[usize::from(byte - 0x20)]
            }
            0x80 | 0x96 => 556,               // Euro, endash
            0x85 | 0x97 => 1000,              // ellipsis, emdash
            0x95 => 350,                      // bullet
            0x91 | 0x92 => if bold { 278 } else { 222 },
            0x93 | 0x94 => if bold { 500 } else { 333 },
            0xA0..=0xBF => {
                let table = if bold { &HELVETICA_BOLD_SYMBOLS } else { &HELVETICA_SYMBOLS };
                table[usize::from(byte - 0xA0)]
            }
            0xD7 | 0xF7 => 584,               // multiply, divide
            0xC6 => 1000,                     // AE
            0xE6 => 889,                      // ae
            0xDF => 611,                      // germandbls
            0xEC..=0xEF => 278,               // dotless-i accented forms
            0xC0..=0xFF => fold_latin1(byte).map_or(556, |base| self.advance(base)),
            _ => 556,
        }
    }
}

/// Map a Latin-1 accented letter to its unaccented base.
///
/// Accented Helvetica glyphs share the advance of their base letter.
const fn fold_latin1(byte: u8) -> Option<u8> {
    let base = match byte {
        0xC0..=0xC5 => b'A',
        0xC7 => b'C',
        0xC8..=0xCB => b'E',
        0xCC..=0xCF => b'I',
        0xD0 => b'D',
        0xD1 => b'N',
        0xD2..=0xD6 | 0xD8 => b'O',
        0xD9..=0xDC => b'U',
        0xDD => b'Y',
        0xDE => b'P',
        0xE0..=0xE5 => b'a',
        0xE7 => b'c',
        0xE8..=0xEB => b'e',
        0xF1 => b'n',
        0xF2..=0xF6 | 0xF8 => b'o',
        0xF9..=0xFC => b'u',
        0xFD | 0xFF => b'y',
        0xFE => b'p',
        _ => return None,
    };
    Some(base)
}

/// Encode `text` as WinAnsi (PDF `WinAnsiEncoding`).
///
/// Latin-1 maps directly, a handful of typographic characters map into the
/// 0x80-0x9F block, other whitespace becomes a space and everything else
/// becomes `?`.
#[must_use]
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            ' '..='~' | '\u{A0}'..='\u{FF}' => u8::try_from(u32::from(ch)).unwrap_or(b'?'),
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            ch if ch.is_whitespace() => b' ',
            _ => b'?',
        })
        .collect()
}

/// Helvetica advance widths for 0x20..=0x7E.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // space - /
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0 - ?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @ - O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P - _
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // ` - o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p - ~
];

/// Helvetica-Bold advance widths for 0x20..=0x7E.
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // space - /
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0 - ?
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // @ - O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // P - _
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // ` - o
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // p - ~
];

/// Helvetica advance widths for 0xA0..=0xBF.
const HELVETICA_SYMBOLS: [u16; 32] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333, // nbsp - macron
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611, // degree - questiondown
];

/// Helvetica-Bold advance widths for 0xA0..=0xBF.
const HELVETICA_BOLD_SYMBOLS: [u16; 32] = [
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333, // nbsp - macron
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611, // degree - questiondown
];
