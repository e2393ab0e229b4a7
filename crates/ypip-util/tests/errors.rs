use ypip_util::errors::YpipError;

#[test]
fn test_parse_error_names_input() {
    let err = YpipError::parse("1.2.3-xyzzy", "not PEP 440");
    assert_eq!(err.to_string(), "Could not parse \"1.2.3-xyzzy\": not PEP 440");
}

#[test]
fn test_node_exists_display() {
    let err = YpipError::NodeExists {
        identity: "a".to_string(),
    };
    assert_eq!(err.to_string(), "<a> already exists");
}

#[test]
fn test_node_does_not_exist_display() {
    let err = YpipError::NodeDoesNotExist {
        identity: "b".to_string(),
    };
    assert_eq!(err.to_string(), "No such node <b>");
}

#[test]
fn test_conflict_display_names_both_requirements() {
    let err = YpipError::Conflict {
        identity: "lib:github org/repo".to_string(),
        existing: "git+https://github.com/org/repo.git@v1#egg=lib".to_string(),
        incoming: "git+https://github.com/org/repo.git@v2#egg=lib".to_string(),
    };
    let s = err.to_string();
    assert!(s.contains("lib:github org/repo"), "got: {s}");
    assert!(s.contains("@v1#egg=lib"), "got: {s}");
    assert!(s.contains("@v2#egg=lib"), "got: {s}");
}

#[test]
fn test_fetch_error_display() {
    let err = YpipError::fetch("HTTP 500 for https://example.invalid");
    assert_eq!(
        err.to_string(),
        "Fetch failed: HTTP 500 for https://example.invalid"
    );
}

#[test]
fn test_config_error_display() {
    let err = YpipError::Config {
        message: "bad key".to_string(),
    };
    assert_eq!(err.to_string(), "Configuration error: bad key");
}

#[test]
fn test_io_error_from_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: YpipError = io_err.into();
    assert!(matches!(err, YpipError::Io(_)));
    assert!(err.to_string().contains("I/O error"));
}
