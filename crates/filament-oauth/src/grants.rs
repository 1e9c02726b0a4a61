//! The grant flows.
//!
//! Non-interactive grants (client credentials, resource owner password,
//! refresh) are single-step: build a token request, authenticate it, send,
//! parse. Interactive grants (authorization code, implicit) are two-state
//! machines interrupted by a user-agent redirect; Initial and Authorized are
//! distinct types, so an operation that is invalid for the current state
//! does not compile, and `with_redirect` consumes the grant, so a flow
//! instance is single-use.

mod code;
mod implicit;
mod noninteractive;

pub use self::code::{AuthorizationCodeGrant, AuthorizedCodeGrant};
pub use self::implicit::{AuthorizedImplicitGrant, ImplicitGrant};
pub use self::noninteractive::{
    ClientCredentialsGrant, ResourceOwnerPasswordGrant, TokenRefreshGrant,
};

pub(crate) mod redirect {
    //! Form-encoded redirect parameter handling shared by the interactive
    //! grants. The authorization code flow reads the redirect's query, the
    //! implicit flow its fragment; the two must never be conflated.

    use url::form_urlencoded;

    use crate::error::{OAuthError, Result};

    pub(crate) fn form_parameters(input: &str) -> Vec<(String, String)> {
        form_urlencoded::parse(input.as_bytes())
            .into_owned()
            .collect()
    }

    pub(crate) fn first<'a>(parameters: &'a [(String, String)], name: &str) -> Option<&'a str> {
        parameters
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// The CSRF check: the redirect's `state` must match the issued one bit
    /// for bit before anything else in the redirect is trusted.
    pub(crate) fn require_state(parameters: &[(String, String)], expected: &str) -> Result<()> {
        match first(parameters, "state") {
            None => Err(OAuthError::missing_parameter("state")),
            Some(state) if state != expected => Err(OAuthError::StateMismatch),
            Some(_) => Ok(()),
        }
    }
}
