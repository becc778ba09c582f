use super::*;
use crate::foundation::core::{Canvas, Fps};

fn small() -> TrailerConfig {
    TrailerConfig {
        canvas: Canvas {
            width: 320,
            height: 180,
        },
        fps: Fps { num: 10, den: 1 },
        seconds: 0.3,
        seed: Some(4),
        ..TrailerConfig::default()
    }
}

fn mean_luma(frame: &FrameRGBA) -> f64 {
    let px = frame.to_straight();
    let sum: u64 = px
        .chunks_exact(4)
        .map(|p| u64::from(p[0]) + u64::from(p[1]) + u64::from(p[2]))
        .sum();
    sum as f64 / (3.0 * f64::from(frame.width * frame.height))
}

#[test]
fn flash_whites_out_the_frame() {
    let cfg = TrailerConfig {
        canvas: Canvas {
            width: 640,
            height: 360,
        },
        ..small()
    };
    let r = TrailerRenderer::new(cfg).unwrap();
    let dark = r.render_frame_at(4, 1.0).unwrap();
    let lit = r.render_frame_at(4, 1.75).unwrap();
    assert_eq!((lit.width, lit.height), (640, 360));
    assert!(mean_luma(&dark) < 128.0, "{}", mean_luma(&dark));
    assert!(mean_luma(&lit) > 200.0, "{}", mean_luma(&lit));
}

#[test]
fn svg_is_reproducible_per_seed() {
    let r = TrailerRenderer::new(small()).unwrap();
    assert_eq!(r.svg_at(8, 0.5).unwrap(), r.svg_at(8, 0.5).unwrap());
    assert_ne!(r.svg_at(8, 0.5).unwrap(), r.svg_at(9, 0.5).unwrap());
    // Once the letters land, scatter no longer shows.
    assert_eq!(r.svg_at(8, 4.0).unwrap(), r.svg_at(9, 4.0).unwrap());
}

#[test]
fn negative_or_nan_offsets_are_rejected() {
    let r = TrailerRenderer::new(small()).unwrap();
    assert!(matches!(r.svg_at(1, -1.0), Err(TrailerError::Validation(_))));
    assert!(r.svg_at(1, f64::NAN).is_err());
}

#[test]
fn configured_seed_wins() {
    let r = TrailerRenderer::new(small()).unwrap();
    assert_eq!(r.resolve_seed(), 4);
    assert_eq!(r.config().frame_count(), 3);
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let cfg = TrailerConfig {
        seconds: -1.0,
        ..small()
    };
    assert!(TrailerRenderer::new(cfg).is_err());
}

#[test]
fn png_round_trips_through_disk() {
    let r = TrailerRenderer::new(small()).unwrap();
    let frame = r.render_frame_at(4, 12.0).unwrap();
    let path = std::path::PathBuf::from("target")
        .join("pipeline")
        .join("settled.png");
    save_png(&frame, &path).unwrap();
    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (320, 180));
}

#[test]
fn renders_mp4_when_ffmpeg_is_available() {
    if crate::encode::ffmpeg::ffmpeg_version().is_none() {
        eprintln!("skipping: ffmpeg not on PATH");
        return;
    }
    let r = TrailerRenderer::new(small()).unwrap();
    let out = std::path::PathBuf::from("target")
        .join("pipeline")
        .join("short.mp4");
    let stats = r.render_to_mp4(4, &out).unwrap();
    assert_eq!((stats.frames, stats.seed), (3, 4));
    assert!(stats.bytes > 0);
    assert_eq!(std::fs::metadata(&out).unwrap().len(), stats.bytes);
}
