use super::*;
use crate::composition::trailer::{build_trailer, headline_style, tagline_style};
use rand::{SeedableRng, rngs::StdRng};

fn trailer(canvas: Canvas) -> Scene {
    build_trailer(canvas, &mut StdRng::seed_from_u64(9)).unwrap()
}

fn rect(scene: &Scene, layout: &Layout, name: &str) -> Rect {
    layout.rect(scene.element_by_name(name).unwrap()).unwrap()
}

#[test]
fn every_element_gets_a_box() {
    let s = trailer(Canvas::default());
    let l = column_layout(&s).unwrap();
    assert_eq!(l.len(), s.elements.len());
    assert_eq!(rect(&s, &l, "backdrop"), Rect::new(0.0, 0.0, 1920.0, 1080.0));
    assert_eq!(rect(&s, &l, "flash"), Rect::new(0.0, 0.0, 1920.0, 1080.0));
    assert_eq!(rect(&s, &l, "scan-line"), Rect::new(0.0, 0.0, 1920.0, 128.0));
    let halo = rect(&s, &l, "halo");
    assert_eq!(halo.center(), kurbo::Point::new(960.0, 540.0));
    assert_eq!(halo.width(), 600.0);
}

#[test]
fn headline_letters_share_a_centred_row() {
    let s = trailer(Canvas::default());
    let l = column_layout(&s).unwrap();
    let letters: Vec<Rect> = (0..7).map(|i| rect(&s, &l, &format!("letter-{i}"))).collect();
    for pair in letters.windows(2) {
        assert_eq!(pair[0].y0, pair[1].y0);
        assert!((pair[0].x1 - pair[1].x0).abs() < 1e-9);
    }
    let mid = (letters[0].x0 + letters[6].x1) * 0.5;
    assert!((mid - 960.0).abs() < 1e-9);

    let id = s.element_by_name("letter-0").unwrap();
    assert_eq!(l.get(id).unwrap().font_size, 192.0);
}

#[test]
fn blocks_stack_top_to_bottom_in_scene_order() {
    let s = trailer(Canvas::default());
    let l = column_layout(&s).unwrap();
    let order = ["letter-0", "title", "divider", "subtitle", "statement", "tagline"];
    let rects: Vec<Rect> = order.iter().map(|n| rect(&s, &l, n)).collect();
    for pair in rects.windows(2) {
        assert!((pair[0].y1 + FLOW_GAP - pair[1].y0).abs() < 1e-9);
    }
    for r in &rects[1..] {
        assert!((r.center().x - 960.0).abs() < 1e-9);
    }
    let top = rects[0].y0;
    let bottom = rects[rects.len() - 1].y1;
    assert!(((top + bottom) * 0.5 - 540.0).abs() < 1e-9);
}

#[test]
fn tagline_glyphs_tile_their_run() {
    let s = trailer(Canvas::default());
    let l = column_layout(&s).unwrap();
    let run = rect(&s, &l, "tagline");
    let first = rect(&s, &l, "tagline-0");
    let last = rect(&s, &l, "tagline-12");
    assert_eq!(first.x0, run.x0);
    assert!((last.x1 - run.x1).abs() < 1e-9);
    assert_eq!(first.y0, run.y0);
    assert_eq!(first.height(), run.height());
}

#[test]
fn long_paragraphs_wrap_on_narrow_canvases() {
    let narrow = Canvas {
        width: 480,
        height: 854,
    };
    let s = trailer(narrow);
    let l = column_layout(&s).unwrap();
    let sub = l.get(s.element_by_name("subtitle").unwrap()).unwrap();
    assert!(sub.lines.len() > 1);
    assert!(sub.rect.width() <= 480.0 * MAX_TEXT_WIDTH_FRAC);
    assert_eq!(sub.font_size, 17.6);
}

#[test]
fn wrap_keeps_words_whole() {
    let style = tagline_style();
    let lines = wrap_words("alpha beta gamma", &style, 20.0, 70.0);
    assert_eq!(lines, vec!["alpha", "beta", "gamma"]);
    assert_eq!(wrap_words("", &style, 20.0, 70.0), vec![String::new()]);
}

#[test]
fn heavier_weights_advance_further() {
    let heavy = headline_style();
    let mut light = headline_style();
    light.weight = 400;
    assert!(glyph_advance('U', &heavy, 100.0) > glyph_advance('U', &light, 100.0));
    assert!(text_width("UN", &heavy, 100.0) > text_width("U", &heavy, 100.0));
}
