use hoko::errors::{HokoError, Result};
use std::error::Error;

#[cfg(test)]
mod error_creation_tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = HokoError::validation("token is empty");

        assert!(matches!(error, HokoError::Validation(_)));
        assert!(error.to_string().contains("Validation Error"));
        assert!(error.to_string().contains("token is empty"));
    }

    #[test]
    fn test_invalid_route_error() {
        let error = HokoError::invalid_route("product//x");

        assert!(matches!(error, HokoError::InvalidRoute(_)));
        assert_eq!(error.message(), "product//x");
        assert_eq!(error.error_type(), "Invalid Route");
    }

    #[test]
    fn test_network_error() {
        let error = HokoError::network("connection refused");

        assert!(matches!(error, HokoError::Network(_)));
        assert!(error.to_string().contains("connection refused"));
    }
}

#[cfg(test)]
mod error_code_tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let errors = vec![
            HokoError::validation(""),
            HokoError::not_found(""),
            HokoError::invalid_route(""),
            HokoError::invalid_url(""),
            HokoError::payload(""),
            HokoError::network(""),
            HokoError::serialization(""),
            HokoError::file_operation(""),
            HokoError::config(""),
        ];

        let mut codes: Vec<&str> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert_eq!(HokoError::validation("").code(), "E001");
        assert_eq!(HokoError::config("").code(), "E009");
    }

    #[test]
    fn test_format_outputs() {
        let error = HokoError::not_found("route 'home' is not mapped");
        assert_eq!(
            error.format_simple(),
            "Resource Not Found: route 'home' is not mapped"
        );
        let colored = error.format_colored();
        assert!(colored.contains("E002"));
        assert!(colored.contains("route 'home' is not mapped"));
    }
}

#[cfg(test)]
mod error_conversion_tests {
    use super::*;

    #[test]
    fn test_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "icon.png missing");
        let error: HokoError = io_error.into();
        assert!(matches!(error, HokoError::FileOperation(_)));
        assert!(error.message().contains("icon.png missing"));
    }

    #[test]
    fn test_from_json_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: HokoError = json_error.into();
        assert!(matches!(error, HokoError::Serialization(_)));
    }

    #[test]
    fn test_from_url_error() {
        let url_error = url::Url::parse("no scheme").unwrap_err();
        let error: HokoError = url_error.into();
        assert!(matches!(error, HokoError::InvalidUrl(_)));
    }

    #[test]
    fn test_question_mark_propagation() {
        fn parse(raw: &str) -> Result<serde_json::Value> {
            Ok(serde_json::from_str(raw)?)
        }

        assert!(parse("{\"a\": 1}").is_ok());
        let err = parse("nope").unwrap_err();
        assert!(err.source().is_none());
        assert_eq!(err.code(), "E007");
    }
}
