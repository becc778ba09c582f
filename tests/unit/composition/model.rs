use super::*;
use crate::animation::ease::Ease;
use crate::animation::timing::Repeat;

fn dot(name: &str) -> Element {
    Element {
        name: name.to_owned(),
        kind: ElementKind::FlashOverlay {
            color: Rgba8::WHITE,
        },
        parent: None,
        base: VisualProps::default(),
    }
}

fn fade(target: usize, delay: f64) -> Cue {
    Cue {
        role: CueRole::Subtitle,
        target: ElementId(target),
        timing: Timing::new(delay, 1.0, Ease::Linear),
        channels: vec![ChannelAnim {
            channel: Channel::Opacity(Keyframes::tween(0.0, 1.0)),
            timing: None,
        }],
    }
}

fn scene(cues: Vec<Cue>) -> Scene {
    Scene {
        canvas: Canvas::default(),
        elements: vec![dot("a"), dot("b")],
        cues,
    }
}

#[test]
fn validate_catches_dangling_targets_and_empty_cues() {
    assert!(scene(vec![fade(1, 0.0)]).validate().is_ok());
    assert!(scene(vec![fade(2, 0.0)]).validate().is_err());

    let mut empty = fade(0, 0.0);
    empty.channels.clear();
    assert!(scene(vec![empty]).validate().is_err());
}

#[test]
fn validate_requires_parents_first() {
    let mut s = scene(vec![]);
    s.elements[0].parent = Some(ElementId(1));
    assert!(s.validate().is_err());

    let mut s = scene(vec![]);
    s.elements[1].parent = Some(ElementId(0));
    assert!(s.validate().is_ok());
}

#[test]
fn channel_override_timing_wins() {
    let mut cue = fade(0, 1.0);
    cue.channels.push(ChannelAnim {
        channel: Channel::Blur(Keyframes::tween(4.0, 0.0)),
        timing: Some(Timing::new(3.0, 2.0, Ease::Linear)),
    });
    assert_eq!(cue.channel_timing(0).unwrap().delay, 1.0);
    assert_eq!(cue.channel_timing(1).unwrap().delay, 3.0);
    assert!(cue.channel_timing(2).is_none());
}

#[test]
fn infinite_channels_and_settle_time() {
    let mut looping = fade(0, 0.5);
    looping.channels.push(ChannelAnim {
        channel: Channel::Opacity(Keyframes::tween(0.2, 0.8)),
        timing: Some(Timing::new(8.4, 2.0, Ease::EaseInOut).with_repeat(Repeat::PING_PONG_FOREVER)),
    });
    let s = scene(vec![fade(1, 3.0), looping]);
    assert_eq!(s.infinite_channels(), vec![LoopKey {
        cue: CueId(1),
        channel: 1
    }]);
    assert_eq!(s.settle_time(), 4.0);
}

#[test]
fn apply_clamps_opacity_and_blur() {
    let mut props = VisualProps::default();
    Channel::Opacity(Keyframes::tween(0.0, 2.0))
        .apply(1.0, &mut props)
        .unwrap();
    assert_eq!(props.opacity, 1.0);
    Channel::Blur(Keyframes::tween(-4.0, 0.0))
        .apply(0.0, &mut props)
        .unwrap();
    assert_eq!(props.blur, 0.0);
}

#[test]
fn fringe_split_mirrors_and_visibility() {
    let f = Fringe::split(15.0, 2.0, 1.0);
    assert_eq!(f.cyan, Vec2::new(-15.0, -2.0));
    assert!(f.is_visible());
    assert!(!Fringe::NONE.is_visible());
    let half = Fringe::lerp(&Fringe::NONE, &f, 0.5);
    assert_eq!(half.red, Vec2::new(7.5, 1.0));
    assert_eq!(half.alpha, 0.5);
}

#[test]
fn cue_roles_serialize_with_index() {
    let json = serde_json::to_string(&CueRole::HeadlineLetter(3)).unwrap();
    assert_eq!(json, r#"{"role":"headline_letter","index":3}"#);
}
