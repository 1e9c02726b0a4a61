//! Builds, authenticates, and sends token endpoint requests, and classifies
//! the response per RFC 6749 section 5.

use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{Method, Request, StatusCode};
use serde::Serialize;
use smol_str::SmolStr;

use crate::client::OAuth2Client;
use crate::error::{OAuthError, Result, TokenRequestError};
use crate::http_client::HttpClient;
use crate::scopes::Scope;
use crate::types::{AccessToken, TokenErrorResponse, TokenResponse};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const APPLICATION_JSON: &str = "application/json";

/// Sends one authenticated token request and parses the outcome.
///
/// Status 200 with a JSON body parses into an [`AccessToken`]; status 400
/// with a JSON body surfaces the server's structured error as
/// [`TokenRequestError`]; anything else is an unexpected-status failure the
/// caller may retry at the transport level. A non-JSON content type on 200
/// or 400 is a protocol error for this call.
#[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all))]
pub async fn token_request<T, P>(
    client: &OAuth2Client,
    http: &T,
    parameters: &P,
    requested_scope: &Scope,
) -> Result<AccessToken>
where
    T: HttpClient + Sync,
    P: Serialize + Sync,
{
    let body = serde_html_form::to_string(parameters)?;
    let request = Request::builder()
        .uri(client.provider().token_endpoint().as_str())
        .method(Method::POST)
        .header(CONTENT_TYPE, FORM_URLENCODED)
        .header(AUTHORIZATION, client.basic_authorization())
        .body(body.into_bytes())?;

    let response = http
        .send_http(request)
        .await
        .map_err(OAuthError::transport)?;

    match response.status() {
        StatusCode::OK => {
            require_json(&response)?;
            let parsed: TokenResponse = serde_json::from_slice(response.body())?;
            Ok(AccessToken::from_response(
                parsed,
                requested_scope,
                client.default_token_ttl(),
            ))
        }
        StatusCode::BAD_REQUEST => {
            require_json(&response)?;
            let parsed: TokenErrorResponse = serde_json::from_slice(response.body())?;
            Err(TokenRequestError::new(
                parsed.error,
                parsed.error_description,
                parsed.error_uri,
            )
            .into())
        }
        status => Err(OAuthError::UnexpectedStatus(status)),
    }
}

fn require_json(response: &http::Response<Vec<u8>>) -> Result<()> {
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    let media_type = content_type.map(|value| value.split(';').next().unwrap_or(value).trim());
    if media_type != Some(APPLICATION_JSON) {
        return Err(OAuthError::UnexpectedContentType(
            content_type.map(SmolStr::from),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockClient, json_response, test_client};
    use crate::types::ClientCredentialsTokenRequest;

    #[tokio::test]
    async fn success_parses_access_token() {
        let http = MockClient::default();
        http.respond(json_response(
            StatusCode::OK,
            r#"{"access_token":"AT","token_type":"Bearer","expires_in":3600,"refresh_token":"RT"}"#,
        ))
        .await;
        let client = test_client();
        let scope = Scope::empty();
        let token = token_request(
            &client,
            &http,
            &ClientCredentialsTokenRequest::new(&scope),
            &scope,
        )
        .await
        .unwrap();
        assert_eq!(token.access_token(), "AT");
        assert_eq!(token.refresh_token(), Some("RT"));

        let sent = http.sent().await.unwrap();
        assert_eq!(sent.method(), Method::POST);
        assert_eq!(sent.uri(), "http://auth.example.com/token");
        assert_eq!(
            sent.headers().get(CONTENT_TYPE).unwrap(),
            FORM_URLENCODED
        );
        assert_eq!(
            sent.headers().get(AUTHORIZATION).unwrap(),
            "Basic YWJjZDpzZWNyZXQ="
        );
        assert_eq!(sent.body(), b"grant_type=client_credentials");
    }

    #[tokio::test]
    async fn bad_request_surfaces_structured_error() {
        let http = MockClient::default();
        http.respond(json_response(
            StatusCode::BAD_REQUEST,
            r#"{"error":"invalid_grant","error_description":"D"}"#,
        ))
        .await;
        let client = test_client();
        let scope = Scope::empty();
        let err = token_request(
            &client,
            &http,
            &ClientCredentialsTokenRequest::new(&scope),
            &scope,
        )
        .await
        .unwrap_err();
        match err {
            OAuthError::TokenRequest(error) => {
                assert_eq!(error.error(), "invalid_grant");
                assert_eq!(error.description(), Some("D"));
                assert_eq!(error.uri(), None);
            }
            other => panic!("expected token request error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unexpected_status_is_a_transport_class_failure() {
        let http = MockClient::default();
        http.respond(json_response(StatusCode::INTERNAL_SERVER_ERROR, "{}"))
            .await;
        let client = test_client();
        let scope = Scope::empty();
        let err = token_request(
            &client,
            &http,
            &ClientCredentialsTokenRequest::new(&scope),
            &scope,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            OAuthError::UnexpectedStatus(StatusCode::INTERNAL_SERVER_ERROR)
        ));
    }

    #[tokio::test]
    async fn wrong_content_type_is_a_protocol_error() {
        let http = MockClient::default();
        http.respond(
            http::Response::builder()
                .status(StatusCode::OK)
                .header(CONTENT_TYPE, "text/html")
                .body(b"<html></html>".to_vec())
                .unwrap(),
        )
        .await;
        let client = test_client();
        let scope = Scope::empty();
        let err = token_request(
            &client,
            &http,
            &ClientCredentialsTokenRequest::new(&scope),
            &scope,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, OAuthError::UnexpectedContentType(Some(ct)) if ct == "text/html"));
    }

    #[tokio::test]
    async fn json_content_type_with_charset_is_accepted() {
        let http = MockClient::default();
        http.respond(
            http::Response::builder()
                .status(StatusCode::OK)
                .header(CONTENT_TYPE, "application/json; charset=utf-8")
                .body(br#"{"access_token":"AT","token_type":"Bearer"}"#.to_vec())
                .unwrap(),
        )
        .await;
        let client = test_client();
        let scope = Scope::empty();
        let token = token_request(
            &client,
            &http,
            &ClientCredentialsTokenRequest::new(&scope),
            &scope,
        )
        .await
        .unwrap();
        assert_eq!(token.access_token(), "AT");
    }
}
