use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TrailerError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        TrailerError::animation("x")
            .to_string()
            .contains("animation error:")
    );
    assert!(
        TrailerError::lifecycle("x")
            .to_string()
            .contains("lifecycle error:")
    );
    assert!(TrailerError::render("x").to_string().contains("render error:"));
    assert!(TrailerError::encode("x").to_string().contains("encode error:"));
    assert!(
        TrailerError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TrailerError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde() {
    let err: TrailerError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, TrailerError::Serde(_)));
}
