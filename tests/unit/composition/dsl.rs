use super::*;
use crate::animation::ease::Ease;
use crate::foundation::core::Rgba8;

fn overlay() -> ElementKind {
    ElementKind::FlashOverlay {
        color: Rgba8::WHITE,
    }
}

#[test]
fn builder_assigns_ids_in_order_and_validates() {
    let mut b = SceneBuilder::new(Canvas::default());
    let a = b.element("a", overlay()).unwrap();
    let c = b.child(a, "c", overlay()).unwrap();
    assert_eq!(a, ElementId(0));
    assert_eq!(c, ElementId(1));

    let cue = CueBuilder::new(CueRole::Divider, c, Timing::new(2.5, 1.2, Ease::EaseInOut))
        .scale(Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0))
        .build();
    assert_eq!(b.cue(cue), CueId(0));

    let scene = b.build().unwrap();
    assert_eq!(scene.elements[1].parent, Some(a));
    assert_eq!(scene.cues[0].channels.len(), 1);
}

#[test]
fn duplicate_names_and_missing_parents_are_rejected() {
    let mut b = SceneBuilder::new(Canvas::default());
    b.element("a", overlay()).unwrap();
    assert!(b.element("a", overlay()).is_err());
    assert!(b.child(ElementId(9), "orphan", overlay()).is_err());
}

#[test]
fn build_rejects_cue_without_channels() {
    let mut b = SceneBuilder::new(Canvas::default());
    let a = b.element("a", overlay()).unwrap();
    b.cue(CueBuilder::new(CueRole::Halo, a, Timing::new(0.0, 1.0, Ease::Linear)).build());
    assert!(b.build().is_err());
}

#[test]
fn timed_channels_keep_their_override() {
    let cue = CueBuilder::new(CueRole::Tagline, ElementId(0), Timing::new(7.7, 1.0, Ease::SNAP_OUT))
        .opacity(0.0, 1.0)
        .channel_timed(
            Channel::Blur(Keyframes::tween(1.0, 0.0)),
            Timing::new(8.4, 2.0, Ease::EaseInOut),
        )
        .build();
    assert!(cue.channels[0].timing.is_none());
    assert_eq!(cue.channels[1].timing.unwrap().delay, 8.4);
}
