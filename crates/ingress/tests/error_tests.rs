use ingress_utils::config::ConfigError;
use ingress_utils::{EndpointError, StreamError};
use std::io;

#[test]
fn test_endpoint_error_display_and_debug() {
    let err = EndpointError::InvalidEndpoint("[fe80::2]".to_string());
    assert_eq!(err.to_string(), "Invalid endpoint: [fe80::2]");
    assert_eq!(err.input(), "[fe80::2]");
    assert!(format!("{:?}", err).contains("InvalidEndpoint"));
}

#[test]
fn test_stream_error_variants() {
    let limit_err = StreamError::SizeLimitExceeded { limit: 1023 };
    assert!(
        limit_err
            .to_string()
            .contains("Size limit exceeded (limit 1023 bytes)")
    );
    assert!(limit_err.is_size_limit());

    let io_err: StreamError = io::Error::new(io::ErrorKind::UnexpectedEof, "short read").into();
    assert_eq!(io_err.to_string(), "short read");
    assert!(!io_err.is_size_limit());
}

#[test]
fn test_stream_error_into_io_error() {
    let io_err: io::Error = StreamError::SizeLimitExceeded { limit: 7 }.into();
    assert_eq!(io_err.kind(), io::ErrorKind::Other);
    assert!(io_err.to_string().contains("limit 7 bytes"));

    // Source errors come back out unchanged.
    let original = StreamError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "pipe"));
    let io_err: io::Error = original.into();
    assert_eq!(io_err.kind(), io::ErrorKind::BrokenPipe);
}

#[test]
fn test_config_error_validation_display() {
    let err = ConfigError::Validation("streaming.size_limit must be > 0".to_string());
    assert_eq!(
        err.to_string(),
        "Invalid configuration: streaming.size_limit must be > 0"
    );
}
