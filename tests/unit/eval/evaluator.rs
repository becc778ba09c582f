use super::*;
use crate::composition::model::{CueRole, Fringe};
use crate::composition::trailer::{build_trailer, glow_high, glow_low};
use crate::foundation::core::{Canvas, Vec2};
use rand::{SeedableRng, rngs::StdRng};

fn scene() -> Scene {
    build_trailer(Canvas::default(), &mut StdRng::seed_from_u64(7)).unwrap()
}

fn props(scene: &Scene, frame: &EvaluatedFrame, name: &str) -> VisualProps {
    frame.node(scene.element_by_name(name).unwrap()).unwrap().props
}

#[test]
fn letters_start_scattered_and_land_on_identity() {
    let s = scene();
    let start = Evaluator::eval(&s, 0.0, 0.0).unwrap();
    let p = props(&s, &start, "letter-0");
    assert_eq!(p.opacity, 0.0);
    assert_eq!(p.scale, Vec2::new(0.1, 0.1));
    assert_eq!(p.blur, 20.0);
    assert_ne!(p.offset, Vec2::ZERO);

    // Later letters have not started yet at t=0.5 and still show their initial state.
    let early = Evaluator::eval(&s, 0.5, 0.0).unwrap();
    assert_eq!(props(&s, &early, "letter-6").opacity, 0.0);
    assert!(props(&s, &early, "letter-0").opacity > 0.0);

    let end = Evaluator::eval(&s, 10.0, 0.0).unwrap();
    for i in 0..7 {
        let p = props(&s, &end, &format!("letter-{i}"));
        assert_eq!(p.offset, Vec2::ZERO);
        assert_eq!(p.rotation_deg, 0.0);
        assert_eq!(p.opacity, 1.0);
        assert_eq!(p.scale, Vec2::new(1.0, 1.0));
        assert_eq!(p.blur, 0.0);
        assert_eq!(p.fringe, Fringe::NONE);
    }
}

#[test]
fn fringe_flashes_mid_entrance() {
    let s = scene();
    // letter-0 is at 70% of its filter curve at t = 0.7 * 1.8.
    let f = Evaluator::eval(&s, 0.7 * 1.8, 0.0).unwrap();
    let p = props(&s, &f, "letter-0");
    assert!(p.fringe.is_visible());
    assert!((p.fringe.red.x - 15.0).abs() < 1e-6);
    assert!((p.fringe.cyan.x + 15.0).abs() < 1e-6);
}

#[test]
fn title_enters_from_below() {
    let s = scene();
    let before = Evaluator::eval(&s, 1.0, 0.0).unwrap();
    let p = props(&s, &before, "title");
    assert_eq!(p.offset, Vec2::new(0.0, 100.0));
    assert_eq!(p.opacity, 0.0);
    assert_eq!(p.blur, 10.0);

    let after = Evaluator::eval(&s, 3.5, 0.0).unwrap();
    let p = props(&s, &after, "title");
    assert_eq!(p.offset, Vec2::ZERO);
    assert_eq!(p.scale, Vec2::new(1.0, 1.0));
}

#[test]
fn tagline_chars_compose_with_parent_opacity() {
    let s = scene();
    let f = Evaluator::eval(&s, 7.85, 0.0).unwrap();
    let tagline = props(&s, &f, "tagline");
    let id = s.element_by_name("tagline-0").unwrap();
    let node = f.node(id).unwrap();
    assert_eq!(node.props.opacity, 1.0);
    assert!((node.world_opacity - tagline.opacity).abs() < 1e-12);

    let last = f.node(s.element_by_name("tagline-12").unwrap()).unwrap();
    assert_eq!(last.props.opacity, 0.0);
}

#[test]
fn glow_pulses_between_low_and_high() {
    let s = scene();
    let blur_at = |t: f64| {
        let f = Evaluator::eval(&s, t, 0.0).unwrap();
        props(&s, &f, "tagline").glow.unwrap().near.blur
    };
    let low = glow_low().near.blur;
    let high = glow_high().near.blur;
    assert!((blur_at(8.41) - low).abs() < 0.5);
    assert!((blur_at(9.4) - high).abs() < 1e-3);
    assert!((blur_at(10.4) - low).abs() < 1e-3);
    assert!((blur_at(11.4) - high).abs() < 1e-3);
    assert!((blur_at(8.4 + 2.0 * 40.0 + 1.0) - high).abs() < 1e-3);
}

#[test]
fn tagline_has_no_glow_before_the_pulse_starts() {
    let s = scene();
    for t in [0.1, 7.7, 8.0, 8.39] {
        let f = Evaluator::eval(&s, t, 0.0).unwrap();
        assert_eq!(props(&s, &f, "tagline").glow, None, "t={t}");
    }
    let f = Evaluator::eval(&s, 8.41, 0.0).unwrap();
    assert!(props(&s, &f, "tagline").glow.is_some());

    // Still absent before the start when the loop is not live.
    let f = Evaluator::eval_with_loops(&s, 8.0, 0.0, |_| false).unwrap();
    assert_eq!(props(&s, &f, "tagline").glow, None);
}

#[test]
fn stopped_loops_rest_on_their_first_value() {
    let s = scene();
    let f = Evaluator::eval_with_loops(&s, 9.4, 0.0, |_| false).unwrap();
    assert_eq!(props(&s, &f, "tagline").glow, Some(glow_low()));
}

#[test]
fn flash_overlay_takes_the_supplied_opacity() {
    let s = scene();
    let f = Evaluator::eval(&s, 1.7, 0.6).unwrap();
    assert_eq!(props(&s, &f, "flash").opacity, 0.6);
    assert_eq!(f.flash_opacity, 0.6);
}

#[test]
fn scan_line_sweeps_and_fades() {
    let s = scene();
    let (_, cue) = s.cue_by_role(CueRole::ScanLine).unwrap();
    assert_eq!(cue.timing.delay, 0.5);
    let start = Evaluator::eval(&s, 0.5, 0.0).unwrap();
    let p = props(&s, &start, "scan-line");
    assert_eq!(p.opacity, 0.8);
    assert_eq!(p.offset.y, -128.0);

    let done = Evaluator::eval(&s, 3.6, 0.0).unwrap();
    let p = props(&s, &done, "scan-line");
    assert_eq!(p.opacity, 0.0);
    assert_eq!(p.offset.y, 1080.0);
}

#[test]
fn non_finite_time_is_rejected() {
    assert!(Evaluator::eval(&scene(), f64::NAN, 0.0).is_err());
}
