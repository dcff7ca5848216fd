//! Encode a [`BadgeLayout`] as a single-page PDF.
//!
//! The document carries no creation date, no `/ID` and no compression, so
//! identical layouts encode to identical bytes.

use crate::font::{Font, encode_win_ansi};
use crate::layout::{BadgeLayout, Element, PAGE_HEIGHT, PAGE_WIDTH};
use crate::BadgeError;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat, dictionary};

/// Serialize `layout` to PDF bytes.
///
/// # Errors
///
/// Returns [`BadgeError::Encode`] if the PDF writer fails.
pub fn encode(layout: &BadgeLayout) -> Result<Vec<u8>, BadgeError> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for font in Font::ALL {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource_name(), font_id);
    }
    let resources_id = doc.add_object(dictionary! { "Font" => fonts });

    let content: Content<Vec<Operation>> = Content {
        operations: layout.elements.iter().flat_map(operations).collect(),
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content
            .encode()
            .map_err(|e| BadgeError::Encode(e.to_string()))?,
    ));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => Object::Integer(1),
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(PAGE_WIDTH),
            Object::Real(PAGE_HEIGHT),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| BadgeError::Encode(e.to_string()))?;
    Ok(bytes)
}

/// Content-stream operators for one element.
fn operations(element: &Element) -> Vec<Operation> {
    match element {
        Element::Rect {
            x,
            y,
            width,
            height,
            line_width,
        } => vec![
            Operation::new("w", vec![Object::Real(*line_width)]),
            Operation::new(
                "re",
                vec![
                    Object::Real(*x),
                    Object::Real(*y),
                    Object::Real(*width),
                    Object::Real(*height),
                ],
            ),
            Operation::new("S", vec![]),
        ],
        Element::Line {
            from,
            to,
            line_width,
        } => vec![
            Operation::new("w", vec![Object::Real(*line_width)]),
            Operation::new("m", vec![Object::Real(from.0), Object::Real(from.1)]),
            Operation::new("l", vec![Object::Real(to.0), Object::Real(to.1)]),
            Operation::new("S", vec![]),
        ],
        Element::Text(run) => vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(run.font.resource_name().as_bytes().to_vec()),
                    Object::Real(run.size),
                ],
            ),
            Operation::new("Td", vec![Object::Real(run.x), Object::Real(run.y)]),
            Operation::new(
                "Tj",
                vec![Object::String(
                    encode_win_ansi(&run.text),
                    StringFormat::Literal,
                )],
            ),
            Operation::new("ET", vec![]),
        ],
    }
}
