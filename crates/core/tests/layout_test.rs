//! Layout reconstruction tests: token building through page assembly.

mod common;

use common::{XorShift64, random_page};
use ocrlayout_core::layout::{
    LayoutParams, Line, RawPage, build_tokens, group_lines, median_height, reconstruct_page,
    split_columns,
};
use serde_json::json;

fn reconstruct(page: &RawPage) -> (String, f64) {
    let out = reconstruct_page(page, &LayoutParams::default());
    (out.text, out.confidence)
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_two_words_on_one_line() {
    let mut page = RawPage::new();
    page.push_box("Hello", Some(0.9), [0.0, 0.0, 50.0, 20.0]);
    page.push_box("World", Some(0.8), [60.0, 2.0, 110.0, 22.0]);

    let (text, confidence) = reconstruct(&page);
    assert_eq!(text, "Hello World");
    assert!((confidence - 0.85).abs() < 1e-9);
}

#[test]
fn test_large_vertical_gap_makes_two_lines() {
    let mut page = RawPage::new();
    page.push_box("upper", None, [0.0, 0.0, 50.0, 20.0]);
    page.push_box("lower", None, [0.0, 200.0, 50.0, 220.0]);

    let built = build_tokens(&page);
    let params = LayoutParams::default();
    let median = median_height(&built.heights, &params);
    assert_eq!(median, 20.0);
    assert_eq!(params.line_threshold(median), 12.0);

    let lines = group_lines(built.tokens, params.line_threshold(median));
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l.len() == 1));
}

#[test]
fn test_wide_horizontal_gap_splits_columns() {
    let mut page = RawPage::new();
    page.push_box("left", Some(1.0), [0.0, 0.0, 50.0, 20.0]);
    page.push_box("right", Some(1.0), [400.0, 0.0, 450.0, 20.0]);

    let (text, _) = reconstruct(&page);
    assert_eq!(text, "left\nright");
}

#[test]
fn test_engine_order_does_not_matter() {
    let mut page = RawPage::new();
    page.push_box("c", None, [0.0, 100.0, 20.0, 120.0]);
    page.push_box("b", None, [30.0, 1.0, 50.0, 21.0]);
    page.push_box("a", None, [0.0, 0.0, 20.0, 20.0]);

    assert_eq!(reconstruct(&page).0, "a b\nc");
}

#[test]
fn test_two_column_document() {
    let mut page = RawPage::new();
    for (row, (left, right)) in [("Name", "Qty"), ("Apples", "3"), ("Pears", "12")]
        .iter()
        .enumerate()
    {
        let y = row as f64 * 30.0;
        page.push_box(left, Some(0.9), [10.0, y, 80.0, y + 20.0]);
        page.push_box(right, Some(0.9), [500.0, y + 1.0, 540.0, y + 21.0]);
    }

    assert_eq!(
        reconstruct(&page).0,
        "Name\nQty\nApples\n3\nPears\n12"
    );
}

#[test]
fn test_polygon_geometry() {
    let mut page = RawPage::new();
    page.push_polygon(
        "skewed",
        Some(0.5),
        &[(10.0, 12.0), (90.0, 8.0), (92.0, 28.0), (11.0, 32.0)],
    );
    page.push_box("next", Some(0.7), [100.0, 10.0, 140.0, 30.0]);

    let (text, confidence) = reconstruct(&page);
    assert_eq!(text, "skewed next");
    assert!((confidence - 0.6).abs() < 1e-9);
}

#[test]
fn test_paddlex_json_page() {
    let page: RawPage = serde_json::from_value(json!({
        "rec_texts": ["Total:", "", "42,00 zł", "Thank you"],
        "rec_scores": [0.99, 0.1, 0.95],
        "rec_boxes": [[12, 400, 80, 420], [0, 0, 0, 0], [300, 401, 380, 421], [5]],
        "rec_polys": [null, null, null, [[10, 460], [120, 460], [120, 482], [10, 482]]]
    }))
    .unwrap();

    let (text, confidence) = reconstruct(&page);
    assert_eq!(text, "Total:\n42,00 zł\nThank you");
    assert!((confidence - 0.97).abs() < 1e-9);
}

// ============================================================================
// Geometry-less fragments
// ============================================================================

#[test]
fn test_all_unlocated_fragments_form_one_line() {
    let mut page = RawPage::new();
    for word in ["the", "quick", "brown", "fox"] {
        page.push_unlocated(word, Some(0.5));
    }

    let (text, confidence) = reconstruct(&page);
    assert_eq!(text, "the quick brown fox");
    assert_eq!(confidence, 0.5);
}

#[test]
fn test_unlocated_fragments_precede_located_lines() {
    let mut page = RawPage::new();
    page.push_box("body", None, [0.0, 500.0, 60.0, 520.0]);
    page.push_unlocated("header", None);

    assert_eq!(reconstruct(&page).0, "header\nbody");
}

#[test]
fn test_page_without_texts_is_blank() {
    assert_eq!(reconstruct(&RawPage::new()), (String::new(), 0.0));

    let mut blank = RawPage::new();
    blank.push_box("   ", Some(0.9), [0.0, 0.0, 10.0, 10.0]);
    assert_eq!(reconstruct(&blank), (String::new(), 0.0));
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_lines_are_ordered_top_to_bottom_and_left_to_right() {
    let params = LayoutParams::default();
    let mut rng = XorShift64::new(0xC0FFEE);

    for _ in 0..50 {
        let page = random_page(&mut rng, 60);
        let built = build_tokens(&page);
        let median = median_height(&built.heights, &params);
        let lines = group_lines(built.tokens, params.line_threshold(median));
        let segments = split_columns(lines.clone(), params.gap_threshold(median));

        let anchors: Vec<f64> = lines.iter().filter_map(Line::anchor_y).collect();
        assert!(anchors.windows(2).all(|w| w[0] <= w[1]));

        for line in lines.iter().chain(segments.iter()) {
            assert!(line.tokens.windows(2).all(|w| w[0].x_start <= w[1].x_start));
        }

        let total: usize = segments.iter().map(Line::len).sum();
        assert_eq!(total, 60);
    }
}

#[test]
fn test_reconstruction_is_idempotent() {
    let mut rng = XorShift64::new(42);
    for _ in 0..20 {
        let page = random_page(&mut rng, 40);
        let first = reconstruct_page(&page, &LayoutParams::default());
        let second = reconstruct_page(&page, &LayoutParams::default());
        assert_eq!(first.text, second.text);
        assert_eq!(first.confidence.to_bits(), second.confidence.to_bits());
    }
}

#[test]
fn test_custom_params_change_grouping() {
    let mut page = RawPage::new();
    page.push_box("a", None, [0.0, 0.0, 20.0, 20.0]);
    page.push_box("b", None, [0.0, 30.0, 20.0, 50.0]);

    assert_eq!(reconstruct(&page).0, "a\nb");

    let loose = LayoutParams::new(2.0, 10.0, 3.0, 80.0, 20.0);
    assert_eq!(reconstruct_page(&page, &loose).text, "a b");
}
