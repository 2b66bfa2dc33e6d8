use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        DeckleError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(DeckleError::asset("x").to_string().contains("asset error:"));
    assert!(
        DeckleError::render("x")
            .to_string()
            .contains("render error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = DeckleError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
