use super::*;
use crate::composition::model::CueId;
use rand::{SeedableRng, rngs::StdRng};

fn scene(seed: u64) -> Scene {
    build_trailer(Canvas::default(), &mut StdRng::seed_from_u64(seed)).unwrap()
}

fn letter_starts(scene: &Scene) -> Vec<(Vec2, f64)> {
    scene
        .cues_matching(|r| matches!(r, CueRole::HeadlineLetter(_)))
        .map(|(_, cue)| {
            let mut offset = None;
            let mut rotation = None;
            for c in &cue.channels {
                match &c.channel {
                    Channel::Offset(kf) => offset = kf.first().copied(),
                    Channel::Rotation(kf) => rotation = kf.first().copied(),
                    _ => {}
                }
            }
            (offset.unwrap(), rotation.unwrap())
        })
        .collect()
}

#[test]
fn headline_has_seven_staggered_cues() {
    let s = scene(1);
    let letters: Vec<_> = s
        .cues_matching(|r| matches!(r, CueRole::HeadlineLetter(_)))
        .collect();
    assert_eq!(letters.len(), 7);
    for (i, (_, cue)) in letters.iter().enumerate() {
        assert_eq!(cue.role, CueRole::HeadlineLetter(i));
        assert!((cue.timing.delay - i as f64 * 0.15).abs() < 1e-12);
        assert_eq!(cue.timing.duration, 1.8);
        assert_eq!(cue.timing.ease, Ease::SNAP_OUT);
    }
    let mut delays: Vec<f64> = letters.iter().map(|(_, c)| c.timing.delay).collect();
    delays.dedup();
    assert_eq!(delays.len(), 7);
}

#[test]
fn headline_filter_curve_peaks_mid_animation_and_clears() {
    let s = scene(2);
    let (_, cue) = s.cue_by_role(CueRole::HeadlineLetter(0)).unwrap();
    let fringe = cue
        .channels
        .iter()
        .find_map(|c| match &c.channel {
            Channel::Fringe(kf) => Some(kf),
            _ => None,
        })
        .unwrap();
    assert_eq!(fringe.keys.len(), 10);
    assert!(!fringe.sample(0.0).unwrap().is_visible());
    assert!(fringe.sample(0.7).unwrap().is_visible());
    assert_eq!(fringe.sample(0.7).unwrap().red, Vec2::new(15.0, 2.0));
    assert!(!fringe.sample(1.0).unwrap().is_visible());
}

#[test]
fn tagline_has_thirteen_char_cues() {
    let s = scene(3);
    let chars: Vec<_> = s
        .cues_matching(|r| matches!(r, CueRole::TaglineChar(_)))
        .collect();
    assert_eq!(chars.len(), "With receipts".len());
    assert_eq!(chars.len(), 13);
    for (i, (_, cue)) in chars.iter().enumerate() {
        assert!((cue.timing.delay - (7.7 + i as f64 * 0.05)).abs() < 1e-12);
        assert_eq!(cue.timing.duration, 0.1);
        let target = s.element(cue.target).unwrap();
        assert_eq!(target.parent, s.element_by_name("tagline"));
    }
}

#[test]
fn fixed_cue_timings_match_the_script() {
    let s = scene(4);
    let timing = |role| s.cue_by_role(role).unwrap().1.timing;
    assert_eq!(timing(CueRole::TitleBlock), Timing::new(1.8, 1.5, Ease::SNAP_OUT));
    assert_eq!(timing(CueRole::Divider), Timing::new(2.5, 1.2, Ease::EaseInOut));
    assert_eq!(timing(CueRole::Subtitle).delay, 3.2);
    assert_eq!(timing(CueRole::Statement).delay, 5.2);
    assert_eq!(timing(CueRole::Tagline).delay, 7.7);
    for role in [CueRole::Subtitle, CueRole::Statement, CueRole::Tagline] {
        assert_eq!(timing(role).duration, 1.0);
    }
    assert_eq!(timing(CueRole::ScanLine), Timing::new(0.5, 3.0, Ease::EaseInOut));
}

#[test]
fn only_the_glow_pulse_repeats_forever() {
    let s = scene(5);
    let loops = s.infinite_channels();
    assert_eq!(loops.len(), 1);
    let (tagline_id, _) = s.cue_by_role(CueRole::Tagline).unwrap();
    assert_eq!(loops[0].cue, tagline_id);
    let t = s.cue(loops[0].cue).unwrap().channel_timing(loops[0].channel).unwrap();
    assert_eq!(t.delay, 8.4);
    assert_eq!(t.duration, 2.0);
    // Everything else has settled once the tagline has finished.
    assert!((s.settle_time() - 8.7).abs() < 1e-9);
}

#[test]
fn fixed_values_are_stable_and_scatter_follows_the_seed() {
    let a = scene(10);
    let b = scene(10);
    let c = scene(11);
    assert_eq!(a, b);

    let timings = |s: &Scene| s.cues.iter().map(|c| c.timing).collect::<Vec<_>>();
    assert_eq!(timings(&a), timings(&c));
    assert_ne!(letter_starts(&a), letter_starts(&c));

    for (offset, rotation) in letter_starts(&c) {
        assert!(offset.x.abs() <= SCATTER_X && offset.y.abs() <= SCATTER_Y);
        assert!(rotation.abs() <= SCATTER_ROTATION_DEG);
    }
}

#[test]
fn scan_line_travels_from_above_to_below_the_canvas() {
    let s = scene(6);
    let (id, cue) = s.cue_by_role(CueRole::ScanLine).unwrap();
    assert_eq!(id, CueId(s.cues.len() - 1));
    let Channel::Offset(kf) = &cue.channels[0].channel else {
        panic!("scan line must lead with an offset channel");
    };
    assert!(kf.first().unwrap().y < 0.0);
    assert_eq!(kf.last().unwrap().y, 1080.0);
}
