//! Badge geometry and the fit-by-shrink text algorithm.
//!
//! Coordinates are PDF user space: origin bottom-left, 72 units per inch.

use crate::font::Font;

/// Units per inch.
pub const INCH: f32 = 72.0;
/// Page width (4in).
pub const PAGE_WIDTH: f32 = 4.0 * INCH;
/// Page height (2in).
pub const PAGE_HEIGHT: f32 = 2.0 * INCH;
/// Inset of the frame from every edge.
pub const MARGIN: f32 = 0.18 * INCH;
/// Horizontal padding of left/right aligned text inside the frame.
const TEXT_INSET: f32 = 0.08 * INCH;
/// Widest a centered field may be before it shrinks.
pub const USABLE_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN - 0.2 * INCH;

/// Constant header text.
pub const TITLE: &str = "AWS Community Student Day";
/// Constant signature, bottom right.
pub const SIGNATURE: &str = "AWSQR";
/// Shown when the name is absent or blank.
pub const DEFAULT_NAME: &str = "UNKNOWN";
/// Shown when the profession is absent or blank.
pub const DEFAULT_PROFESSION: &str = "N/A";

/// Font size range for a shrinkable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitRange {
    /// Size used when the text fits.
    pub start: u16,
    /// Smallest size the field may shrink to.
    pub floor: u16,
}

/// Name field sizing.
pub const NAME_FIT: FitRange = FitRange { start: 18, floor: 12 };
/// Profession field sizing.
pub const PROFESSION_FIT: FitRange = FitRange { start: 11, floor: 8 };

/// The four variable inputs of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeFields<'a> {
    /// Printed as `Ticket: {ticket_id}`.
    pub ticket_id: &'a str,
    /// Centered, large.
    pub name: &'a str,
    /// Centered, below the name.
    pub profession: &'a str,
    /// Printed as `CheckedInAt: {checked_in_at}`.
    pub checked_in_at: &'a str,
}

/// A string placed on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Text as it should read (before WinAnsi encoding).
    pub text: String,
    /// Face.
    pub font: Font,
    /// Size in points.
    pub size: f32,
    /// Left edge of the baseline.
    pub x: f32,
    /// Baseline.
    pub y: f32,
}

/// One drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Stroked rectangle.
    Rect {
        /// Lower-left x.
        x: f32,
        /// Lower-left y.
        y: f32,
        /// Width.
        width: f32,
        /// Height.
        height: f32,
        /// Stroke width.
        line_width: f32,
    },
    /// Stroked line segment.
    Line {
        /// Start point.
        from: (f32, f32),
        /// End point.
        to: (f32, f32),
        /// Stroke width.
        line_width: f32,
    },
    /// Text.
    Text(TextRun),
}

/// The complete, positioned content of one badge.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeLayout {
    /// Drawing instructions in paint order.
    pub elements: Vec<Element>,
}

impl BadgeLayout {
    /// Every text run, in paint order.
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.elements.iter().filter_map(|element| match element {
            Element::Text(run) => Some(run),
            _ => None,
        })
    }

    /// The first run whose text equals `text`.
    #[must_use]
    pub fn find_text(&self, text: &str) -> Option<&TextRun> {
        self.text_runs().find(|run| run.text == text)
    }
}

/// Trim `value` and fall back to `placeholder` when nothing is left.
#[must_use]
pub fn or_placeholder<'a>(value: Option<&'a str>, placeholder: &'a str) -> &'a str {
    match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => placeholder,
    }
}

/// Largest size in `range` at which `text` fits in `max_width`.
///
/// Steps down one point at a time from `range.start`. Stops at `range.floor`
/// even if the text still overflows; the text is never truncated.
#[must_use]
pub fn fit_font_size(text: &str, font: Font, range: FitRange, max_width: f32) -> u16 {
    let mut size = range.start;
    while size > range.floor && font.text_width(text, f32::from(size)) > max_width {
        size -= 1;
    }
    size
}

/// Position `text` centered on the page at the largest size that fits.
fn centered_fit(text: &str, font: Font, range: FitRange, y: f32) -> TextRun {
    let size = f32::from(fit_font_size(text, font, range, USABLE_WIDTH));
    let width = font.text_width(text, size);
    TextRun {
        text: text.to_string(),
        font,
        size,
        x: (PAGE_WIDTH - width) / 2.0,
        y,
    }
}

/// Compute the badge layout. Pure and deterministic.
#[must_use]
pub fn layout_badge(fields: &BadgeFields<'_>) -> BadgeLayout {
    let name = or_placeholder(Some(fields.name), DEFAULT_NAME);
    let profession = or_placeholder(Some(fields.profession), DEFAULT_PROFESSION);

    let top = PAGE_HEIGHT - MARGIN;
    let left = MARGIN + TEXT_INSET;
    let footer_y = MARGIN + 0.22 * INCH;

    let signature_size = 7.0;
    let signature_width = Font::HelveticaOblique.text_width(SIGNATURE, signature_size);

    let elements = vec![
        Element::Rect {
            x: MARGIN,
            y: MARGIN,
            width: PAGE_WIDTH - 2.0 * MARGIN,
            height: PAGE_HEIGHT - 2.0 * MARGIN,
            line_width: 1.0,
        },
        Element::Text(TextRun {
            text: TITLE.to_string(),
            font: Font::HelveticaBold,
            size: 10.0,
            x: left,
            y: top - 0.22 * INCH,
        }),
        Element::Line {
            from: (MARGIN, top - 0.30 * INCH),
            to: (PAGE_WIDTH - MARGIN, top - 0.30 * INCH),
            line_width: 0.5,
        },
        Element::Text(centered_fit(name, Font::HelveticaBold, NAME_FIT, top - 0.85 * INCH)),
        Element::Text(centered_fit(
            profession,
            Font::Helvetica,
            PROFESSION_FIT,
            top - 1.15 * INCH,
        )),
        Element::Text(TextRun {
            text: format!("Ticket: {}", fields.ticket_id),
            font: Font::Helvetica,
            size: 8.0,
            x: left,
            y: footer_y + 0.18 * INCH,
        }),
        Element::Text(TextRun {
            text: format!("CheckedInAt: {}", fields.checked_in_at),
            font: Font::Helvetica,
            size: 8.0,
            x: left,
            y: footer_y,
        }),
        Element::Text(TextRun {
            text: SIGNATURE.to_string(),
            font: Font::HelveticaOblique,
            size: signature_size,
            x: PAGE_WIDTH - MARGIN - TEXT_INSET - signature_width,
            y: footer_y,
        }),
    ];

    BadgeLayout { elements }
}
