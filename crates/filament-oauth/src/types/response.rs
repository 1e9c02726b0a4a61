//! Token endpoint response bodies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

// https://datatracker.ietf.org/doc/html/rfc6749#section-5.1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: SmolStr,
    pub token_type: SmolStr,
    pub expires_in: Option<i64>,
    pub refresh_token: Option<SmolStr>,
    pub scope: Option<SmolStr>,
    /// Any other member of the response object, e.g. OIDC's `id_token`.
    #[serde(flatten)]
    pub extensions: BTreeMap<SmolStr, serde_json::Value>,
}

// https://datatracker.ietf.org/doc/html/rfc6749#section-5.2
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenErrorResponse {
    pub error: SmolStr,
    pub error_description: Option<SmolStr>,
    pub error_uri: Option<SmolStr>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc6749_example() {
        let response: TokenResponse = serde_json::from_str(
            r#"{"access_token":"AT","token_type":"Bearer","expires_in":3600,"refresh_token":"RT"}"#,
        )
        .unwrap();
        assert_eq!(response.access_token, "AT");
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, Some(3600));
        assert_eq!(response.refresh_token.as_deref(), Some("RT"));
        assert!(response.scope.is_none());
        assert!(response.extensions.is_empty());
    }

    #[test]
    fn captures_unknown_members_as_extensions() {
        let response: TokenResponse = serde_json::from_str(
            r#"{"access_token":"AT","token_type":"Bearer","id_token":"JWT"}"#,
        )
        .unwrap();
        assert_eq!(
            response.extensions.get("id_token"),
            Some(&serde_json::Value::String("JWT".into()))
        );
    }

    #[test]
    fn missing_required_member_is_an_error() {
        assert!(serde_json::from_str::<TokenResponse>(r#"{"token_type":"Bearer"}"#).is_err());
    }

    #[test]
    fn parses_error_body() {
        let error: TokenErrorResponse =
            serde_json::from_str(r#"{"error":"invalid_grant","error_description":"D"}"#).unwrap();
        assert_eq!(error.error, "invalid_grant");
        assert_eq!(error.error_description.as_deref(), Some("D"));
        assert!(error.error_uri.is_none());
    }
}
