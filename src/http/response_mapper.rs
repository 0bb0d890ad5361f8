use crate::error::ClassifiedError;
use crate::http::KeyConvention;
use crate::traits::ResponseMapper;
use crate::types::RawResponse;
use serde::de::DeserializeOwned;

/// JSON implementation of the ResponseMapper trait
#[derive(Debug, Clone, Default)]
pub struct JsonResponseMapper {
    key_convention: KeyConvention,
}

impl JsonResponseMapper {
    /// Create a mapper that matches keys exactly as sent
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mapper that rewrites keys to `convention` before decoding
    pub fn with_key_convention(key_convention: KeyConvention) -> Self {
        Self { key_convention }
    }

    pub fn key_convention(&self) -> KeyConvention {
        self.key_convention
    }

    fn check_status(response: &RawResponse) -> Result<(), ClassifiedError> {
        if response.is_success() {
            Ok(())
        } else {
            Err(ClassifiedError::UnacceptableStatus(response.status))
        }
    }
}

impl ResponseMapper for JsonResponseMapper {
    fn map<T: DeserializeOwned>(&self, response: &RawResponse) -> Result<T, ClassifiedError> {
        Self::check_status(response)?;

        if self.key_convention == KeyConvention::Preserve {
            return serde_json::from_slice(&response.body).map_err(ClassifiedError::decode);
        }

        let document: serde_json::Value =
            serde_json::from_slice(&response.body).map_err(ClassifiedError::decode)?;
        serde_json::from_value(self.key_convention.apply(document)).map_err(ClassifiedError::decode)
    }

    fn map_empty(&self, response: &RawResponse) -> Result<(), ClassifiedError> {
        Self::check_status(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: i64,
        name: String,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Profile {
        user_id: u32,
        display_name: String,
    }

    fn response(status: u16, body: &str) -> RawResponse {
        RawResponse::new(status, HashMap::new(), body.as_bytes().to_vec(), "https://example.com".into())
    }

    #[test]
    fn test_decodes_success_body() {
        let mapper = JsonResponseMapper::new();
        let item: Item = mapper.map(&response(200, r#"{"id":1,"name":"a"}"#)).unwrap();
        assert_eq!(item, Item { id: 1, name: "a".into() });
    }

    #[test]
    fn test_every_2xx_attempts_decode() {
        let mapper = JsonResponseMapper::new();
        for status in 200..300 {
            let error = mapper.map::<Item>(&response(status, "not json")).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::DecodeFailure, "status {}", status);
        }
    }

    #[test]
    fn test_non_2xx_never_reads_body() {
        let mapper = JsonResponseMapper::new();
        // A valid body must not turn a non-2xx status into a success
        for status in [100, 199, 300, 304, 400, 401, 404, 500, 503, 599] {
            let error = mapper.map::<Item>(&response(status, r#"{"id":1,"name":"a"}"#)).unwrap_err();
            assert_eq!(error.status_code(), Some(status));
        }
    }

    #[test]
    fn test_missing_field_and_type_mismatch_are_decode_failures() {
        let mapper = JsonResponseMapper::new();
        let missing = mapper.map::<Item>(&response(200, r#"{"id":1}"#)).unwrap_err();
        let mismatch = mapper.map::<Item>(&response(200, r#"{"id":"one","name":"a"}"#)).unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::DecodeFailure);
        assert_eq!(mismatch.kind(), ErrorKind::DecodeFailure);
    }

    #[test]
    fn test_key_convention_applies_before_matching() {
        let body = r#"{"userId":7,"displayName":"Ada"}"#;

        let strict = JsonResponseMapper::new();
        assert!(strict.map::<Profile>(&response(200, body)).is_err());

        let converting = JsonResponseMapper::with_key_convention(KeyConvention::SnakeCase);
        let profile: Profile = converting.map(&response(200, body)).unwrap();
        assert_eq!(profile, Profile { user_id: 7, display_name: "Ada".into() });
    }

    #[test]
    fn test_map_empty_checks_status_only() {
        let mapper = JsonResponseMapper::new();
        assert!(mapper.map_empty(&response(204, "")).is_ok());
        assert_eq!(
            mapper.map_empty(&response(410, "")).unwrap_err().status_code(),
            Some(410)
        );
    }
}
