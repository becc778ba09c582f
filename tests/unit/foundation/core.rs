use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn fps_frame_to_duration_is_exact_for_ntsc() {
    let fps = Fps::new(30000, 1001).unwrap();
    let d = fps.frame_to_duration(FrameIndex(30000));
    assert_eq!(d, std::time::Duration::from_secs(1001));
    assert_eq!(Fps::default().secs_to_frames_floor(2.5), 75);
    assert!((Fps::default().frame_to_secs(FrameIndex(45)) - 1.5).abs() < 1e-12);
}

#[test]
fn canvas_clamp_vw_matches_css_clamp() {
    let wide = Canvas {
        width: 1920,
        height: 1080,
    };
    assert_eq!(wide.clamp_vw(64.0, 0.15, 192.0), 192.0);

    let narrow = Canvas {
        width: 320,
        height: 480,
    };
    assert_eq!(narrow.clamp_vw(64.0, 0.15, 192.0), 64.0);
    assert!(Canvas { width: 0, height: 1 }.validate().is_err());
}

#[test]
fn rgba_alpha_and_hex() {
    let c = Rgba8::rgb(168, 85, 247).with_alpha(0.8);
    assert_eq!(c.a, 204);
    assert_eq!(c.to_hex(), "#a855f7");
    assert!((c.alpha_f64() - 0.8).abs() < 0.01);
}
