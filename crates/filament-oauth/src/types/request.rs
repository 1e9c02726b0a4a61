//! Token endpoint request bodies, one per grant type. Serialized with
//! `serde_html_form` into an `application/x-www-form-urlencoded` POST body.
//! Client authentication is layered on by the client façade, not here.

use serde::Serialize;
use smol_str::SmolStr;

use crate::scopes::Scope;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenGrantType {
    AuthorizationCode,
    RefreshToken,
    ClientCredentials,
    Password,
}

// https://datatracker.ietf.org/doc/html/rfc6749#section-4.1.3
#[derive(Debug, Serialize)]
pub struct AuthorizationCodeTokenRequest<'a> {
    grant_type: TokenGrantType,
    code: &'a str,
    redirect_uri: &'a str,
    // https://datatracker.ietf.org/doc/html/rfc7636#section-4.5
    code_verifier: &'a str,
}

impl<'a> AuthorizationCodeTokenRequest<'a> {
    /// `redirect_uri` must be the exact value sent with the authorization
    /// request, byte for byte (RFC 6749 section 4.1.3).
    pub fn new(code: &'a str, redirect_uri: &'a str, code_verifier: &'a str) -> Self {
        Self {
            grant_type: TokenGrantType::AuthorizationCode,
            code,
            redirect_uri,
            code_verifier,
        }
    }
}

// https://datatracker.ietf.org/doc/html/rfc6749#section-4.4.2
#[derive(Debug, Serialize)]
pub struct ClientCredentialsTokenRequest {
    grant_type: TokenGrantType,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<SmolStr>,
}

impl ClientCredentialsTokenRequest {
    pub fn new(scope: &Scope) -> Self {
        Self {
            grant_type: TokenGrantType::ClientCredentials,
            scope: scope.as_query_value(),
        }
    }
}

// https://datatracker.ietf.org/doc/html/rfc6749#section-4.3.2
#[derive(Debug, Serialize)]
pub struct ResourceOwnerPasswordTokenRequest<'a> {
    grant_type: TokenGrantType,
    username: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<SmolStr>,
}

impl<'a> ResourceOwnerPasswordTokenRequest<'a> {
    pub fn new(username: &'a str, password: &'a str, scope: &Scope) -> Self {
        Self {
            grant_type: TokenGrantType::Password,
            username,
            password,
            scope: scope.as_query_value(),
        }
    }
}

// https://datatracker.ietf.org/doc/html/rfc6749#section-6
#[derive(Debug, Serialize)]
pub struct RefreshTokenRequest<'a> {
    grant_type: TokenGrantType,
    refresh_token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<SmolStr>,
}

impl<'a> RefreshTokenRequest<'a> {
    pub fn new(refresh_token: &'a str, scope: &Scope) -> Self {
        Self {
            grant_type: TokenGrantType::RefreshToken,
            refresh_token,
            scope: scope.as_query_value(),
        }
    }
}
