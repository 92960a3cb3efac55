use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        BlobscapeError::config("x")
            .to_string()
            .contains("config error:")
    );
    assert!(
        BlobscapeError::capability("x")
            .to_string()
            .contains("capability error:")
    );
    assert!(
        BlobscapeError::surface("x")
            .to_string()
            .contains("surface error:")
    );
    assert!(
        BlobscapeError::render("x")
            .to_string()
            .contains("render error:")
    );
}
