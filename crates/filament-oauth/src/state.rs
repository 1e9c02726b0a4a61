//! The continuation snapshot: an interactive grant's state, exportable to a
//! compact opaque string and re-creatable on the other side of the
//! user-agent redirect, possibly in a different process.
//!
//! The snapshot embeds its grant kind as a closed enum tag and resumption
//! dispatches through an exhaustive `match`; no type is ever instantiated
//! from an untrusted name. The snapshot is not signed; the CSRF `state`
//! inside it still gates resumption, since the redirect must present the
//! matching value before any transition happens.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use smol_str::{SmolStr, format_smolstr};
use url::Url;

use crate::error::{OAuthError, Result};
use crate::grants::{
    AuthorizationCodeGrant, AuthorizedCodeGrant, AuthorizedImplicitGrant, ImplicitGrant,
};
use crate::pkce::CodeVerifier;
use crate::scopes::Scope;

/// The closed set of resumable grant states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantKind {
    AuthorizationCode,
    AuthorizedAuthorizationCode,
    Implicit,
    AuthorizedImplicit,
}

/// A serialized-form interactive grant state.
///
/// Self-contained and client-independent: resuming requires supplying the
/// live [`OAuth2Client`](crate::client::OAuth2Client) separately, since it
/// holds live credentials and is never embedded. `encode`/`decode`
/// round-trip exactly; the encoded form is URL- and cookie-safe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrantSnapshot {
    pub kind: GrantKind,
    pub scope: Scope,
    pub state: SmolStr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_verifier: Option<CodeVerifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<Url>,
}

impl GrantSnapshot {
    /// Encodes to unpadded base64url over a JSON payload.
    pub fn encode(&self) -> Result<String> {
        Ok(URL_SAFE_NO_PAD.encode(serde_json::to_vec(self)?))
    }

    pub fn decode(encoded: &str) -> Result<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|e| OAuthError::snapshot(format_smolstr!("{e}")))?;
        serde_json::from_slice(&bytes).map_err(|e| OAuthError::snapshot(format_smolstr!("{e}")))
    }

    /// Reconstructs the grant this snapshot was taken from.
    ///
    /// Fails when the snapshot's fields don't fit its kind, e.g. an
    /// authorization code state without a PKCE verifier.
    pub fn grant(self) -> Result<InteractiveGrant> {
        match self.kind {
            GrantKind::AuthorizationCode => {
                let verifier = self.require_code_verifier()?;
                Ok(InteractiveGrant::AuthorizationCode(
                    AuthorizationCodeGrant::restore(self.scope, self.state, verifier),
                ))
            }
            GrantKind::AuthorizedAuthorizationCode => {
                let verifier = self.require_code_verifier()?;
                let redirect_uri = self.require_redirect_uri()?;
                Ok(InteractiveGrant::AuthorizedAuthorizationCode(
                    AuthorizedCodeGrant::restore(self.scope, self.state, verifier, redirect_uri),
                ))
            }
            GrantKind::Implicit => Ok(InteractiveGrant::Implicit(ImplicitGrant::restore(
                self.scope, self.state,
            ))),
            GrantKind::AuthorizedImplicit => {
                let redirect_uri = self.require_redirect_uri()?;
                Ok(InteractiveGrant::AuthorizedImplicit(
                    AuthorizedImplicitGrant::restore(self.scope, self.state, redirect_uri),
                ))
            }
        }
    }

    fn require_code_verifier(&self) -> Result<CodeVerifier> {
        self.code_verifier
            .clone()
            .ok_or_else(|| OAuthError::snapshot("missing code verifier for authorization code state"))
    }

    fn require_redirect_uri(&self) -> Result<Url> {
        self.redirect_uri
            .clone()
            .ok_or_else(|| OAuthError::snapshot("missing redirect uri for authorized state"))
    }
}

/// An interactive grant reconstructed from a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractiveGrant {
    AuthorizationCode(AuthorizationCodeGrant),
    AuthorizedAuthorizationCode(AuthorizedCodeGrant),
    Implicit(ImplicitGrant),
    AuthorizedImplicit(AuthorizedImplicitGrant),
}
