use super::*;
use crate::composition::trailer::build_trailer;
use crate::eval::evaluator::Evaluator;
use crate::layout::column::column_layout;
use rand::{SeedableRng, rngs::StdRng};

fn svg_at(t: f64, flash: f64) -> String {
    let scene = build_trailer(Canvas::default(), &mut StdRng::seed_from_u64(5)).unwrap();
    let layout = column_layout(&scene).unwrap();
    let frame = Evaluator::eval(&scene, t, flash).unwrap();
    frame_to_svg(&scene, &layout, &frame, &SvgOptions::default()).unwrap()
}

#[test]
fn document_is_sized_to_the_canvas() {
    let svg = svg_at(0.0, 0.0);
    assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="1920" height="1080""#));
    assert!(svg.ends_with("</svg>"));
    assert_eq!(svg.matches("<g ").count(), svg.matches("</g>").count());
}

#[test]
fn invisible_elements_are_skipped() {
    let svg = svg_at(0.0, 0.0);
    // Cue-driven elements start transparent.
    assert!(!svg.contains(r#"id="backdrop""#));
    assert!(!svg.contains(r#"id="title""#));
    assert!(!svg.contains(r#"id="flash""#));
    assert!(!svg.contains(r#"id="tagline""#));
}

#[test]
fn flash_overlay_appears_while_lit() {
    let svg = svg_at(1.7, 1.0);
    assert!(svg.contains(r#"id="flash""#));
    assert!(svg.contains(r##"fill="#ffffff""##));
}

#[test]
fn settled_frame_draws_all_text() {
    let svg = svg_at(12.0, 0.0);
    for name in ["letter-0", "letter-6", "title", "divider", "subtitle", "statement"] {
        assert!(svg.contains(&format!(r#"id="{name}""#)), "{name} missing");
    }
    assert!(svg.contains(">U</text>"));
    assert!(svg.contains(">INTERNET</text>"));
    // Tagline glyphs nest inside the run group.
    let run = svg.find(r#"id="tagline""#).unwrap();
    let first_char = svg.find(r#"id="tagline-0""#).unwrap();
    assert!(first_char > run);
    // The glow filter is attached to the run.
    assert!(svg.contains(r#"result="near""#));
}

#[test]
fn fringe_copies_are_drawn_mid_entrance() {
    let svg = svg_at(0.7 * 1.8, 0.0);
    assert!(svg.contains(r##"fill="#ff0000""##));
    assert!(svg.contains(r##"fill="#00ffff""##));
    let settled = svg_at(12.0, 0.0);
    assert!(!settled.contains(r##"fill="#ff0000""##));
}

#[test]
fn numbers_are_compact() {
    assert_eq!(num(-0.0), "0");
    assert_eq!(num(0.1 + 0.2), "0.3");
    assert_eq!(num(f64::NAN), "0");
    assert_eq!(num(1920.0), "1920");
}

#[test]
fn text_is_escaped() {
    assert_eq!(escape_xml(r#"a<b & "c""#), "a&lt;b &amp; &quot;c&quot;");
}

#[test]
fn mismatched_layout_is_rejected() {
    let scene = build_trailer(Canvas::default(), &mut StdRng::seed_from_u64(5)).unwrap();
    let frame = Evaluator::eval(&scene, 1.0, 0.0).unwrap();
    let err = frame_to_svg(&scene, &Layout::default(), &frame, &SvgOptions::default());
    assert!(matches!(err, Err(TrailerError::Render(_))));
}
