use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        DrapeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(DrapeError::asset("x").to_string().contains("asset error:"));
    assert!(DrapeError::render("x").to_string().contains("render error:"));
    assert!(
        DrapeError::Serde("x".to_string())
            .to_string()
            .contains("serialization error:")
    );
    assert!(DrapeError::busy("x").to_string().starts_with("busy:"));

    let timeout = DrapeError::Timeout {
        view: "Back".to_string(),
        waited_ms: 25,
    };
    assert!(timeout.to_string().contains("'Back'"));
    assert!(timeout.to_string().contains("25 ms"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = DrapeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn recoverability_classification() {
    assert!(DrapeError::asset("x").is_recoverable());
    assert!(DrapeError::busy("x").is_recoverable());
    assert!(
        DrapeError::Timeout {
            view: "Front".to_string(),
            waited_ms: 1
        }
        .is_recoverable()
    );
    assert!(!DrapeError::validation("x").is_recoverable());
}

#[test]
fn serde_json_errors_convert() {
    let err: DrapeError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, DrapeError::Serde(_)));
}
