//! End-to-end rendering tests: layout → PDF bytes → parsed back with lopdf.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use badge_desk_render::layout::{NAME_FIT, PROFESSION_FIT, USABLE_WIDTH};
use badge_desk_render::{BadgeFields, CONTENT_TYPE, Font, fit_font_size, render_badge};
use lopdf::content::Content;
use lopdf::{Document, Object};
use proptest::prelude::*;

fn ada() -> BadgeFields<'static> {
    BadgeFields {
        ticket_id: "T-001",
        name: "Ada Lovelace",
        profession: "Engineer",
        checked_in_at: "2024-01-01T10:00:00Z",
    }
}

/// Every string shown with `Tj`, in paint order.
fn shown_strings(pdf: &[u8]) -> Vec<Vec<u8>> {
    let doc = Document::load_mem(pdf).expect("rendered badge should parse");
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1, "badge is a single page");
    let page_id = *pages.values().next().unwrap();
    let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();

    content
        .operations
        .iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| match op.operands.first() {
            Some(Object::String(bytes, _)) => Some(bytes.clone()),
            _ => None,
        })
        .collect()
}

fn shows(pdf: &[u8], text: &str) -> bool {
    shown_strings(pdf).iter().any(|s| s.as_slice() == text.as_bytes())
}

#[test]
fn scenario_badge_contains_all_fields() {
    let pdf = render_badge(&ada()).unwrap();

    assert!(pdf.starts_with(b"%PDF-1.4"));
    assert!(shows(&pdf, "AWS Community Student Day"));
    assert!(shows(&pdf, "Ada Lovelace"));
    assert!(shows(&pdf, "Engineer"));
    assert!(shows(&pdf, "Ticket: T-001"));
    assert!(shows(&pdf, "CheckedInAt: 2024-01-01T10:00:00Z"));
    assert!(shows(&pdf, "AWSQR"));
}

#[test]
fn rendering_is_byte_identical() {
    let first = render_badge(&ada()).unwrap();
    let second = render_badge(&ada()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn different_inputs_render_differently() {
    let other = BadgeFields {
        name: "Grace Hopper",
        ..ada()
    };
    assert_ne!(render_badge(&ada()).unwrap(), render_badge(&other).unwrap());
}

#[test]
fn empty_name_and_profession_render_placeholders() {
    let pdf = render_badge(&BadgeFields {
        ticket_id: "T-002",
        name: "",
        profession: "",
        checked_in_at: "N/A",
    })
    .unwrap();

    assert!(shows(&pdf, "UNKNOWN"));
    assert!(shows(&pdf, "N/A"));
    assert!(shows(&pdf, "CheckedInAt: N/A"));
}

#[test]
fn page_is_four_by_two_inches() {
    let pdf = render_badge(&ada()).unwrap();
    let doc = Document::load_mem(&pdf).unwrap();
    let catalog = doc.catalog().unwrap();
    let pages_id = catalog.get(b"Pages").unwrap().as_reference().unwrap();
    let pages = doc.get_dictionary(pages_id).unwrap();
    let media_box = pages.get(b"MediaBox").unwrap().as_array().unwrap();
    let numbers: Vec<f32> = media_box
        .iter()
        .map(|n| match n {
            Object::Integer(i) => *i as f32,
            Object::Real(r) => *r,
            other => panic!("unexpected MediaBox entry {other:?}"),
        })
        .collect();
    assert_eq!(numbers, vec![0.0, 0.0, 288.0, 144.0]);
}

#[test]
fn parentheses_and_backslashes_survive_encoding() {
    let pdf = render_badge(&BadgeFields {
        name: r"Ada (Countess) \ Lovelace",
        ..ada()
    })
    .unwrap();
    assert!(shows(&pdf, r"Ada (Countess) \ Lovelace"));
}

#[test]
fn latin1_names_are_win_ansi_encoded() {
    let pdf = render_badge(&BadgeFields {
        name: "José Núñez",
        ..ada()
    })
    .unwrap();
    let shown = shown_strings(&pdf);
    assert!(shown.contains(&vec![b'J', b'o', b's', 0xE9, b' ', b'N', 0xFA, 0xF1, b'e', b'z']));
}

#[test]
fn content_type_is_pdf() {
    assert_eq!(CONTENT_TYPE, "application/pdf");
}

proptest! {
    #[test]
    fn any_unicode_input_renders(name in "\\PC{0,300}", profession in "\\PC{0,300}") {
        let pdf = render_badge(&BadgeFields {
            ticket_id: "T-001",
            name: &name,
            profession: &profession,
            checked_in_at: "N/A",
        });
        prop_assert!(pdf.is_ok());
    }

    #[test]
    fn fitted_size_is_the_largest_that_fits(name in "[A-Za-z ]{0,80}") {
        let size = fit_font_size(&name, Font::HelveticaBold, NAME_FIT, USABLE_WIDTH);
        prop_assert!(size >= NAME_FIT.floor && size <= NAME_FIT.start);

        let fits = |s: u16| Font::HelveticaBold.text_width(&name, f32::from(s)) <= USABLE_WIDTH;
        if size > NAME_FIT.floor {
            prop_assert!(fits(size));
        }
        if size < NAME_FIT.start {
            prop_assert!(!fits(size + 1));
        }
    }

    #[test]
    fn fitted_profession_size_is_the_largest_that_fits(profession in "[A-Za-z ]{0,100}") {
        let size = fit_font_size(&profession, Font::Helvetica, PROFESSION_FIT, USABLE_WIDTH);
        prop_assert!(size >= PROFESSION_FIT.floor && size <= PROFESSION_FIT.start);

        let fits = |s: u16| Font::Helvetica.text_width(&profession, f32::from(s)) <= USABLE_WIDTH;
        if size > PROFESSION_FIT.floor {
            prop_assert!(fits(size));
        }
        if size < PROFESSION_FIT.start {
            prop_assert!(!fits(size + 1));
        }
    }

    #[test]
    fn short_professions_keep_starting_size(profession in "[a-z]{1,10}") {
        let size = fit_font_size(&profession, Font::Helvetica, PROFESSION_FIT, USABLE_WIDTH);
        prop_assert_eq!(size, PROFESSION_FIT.start);
    }
}
