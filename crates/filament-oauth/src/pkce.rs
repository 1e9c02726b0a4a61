//! PKCE (RFC 7636) verifier and challenge.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::ThreadRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use smol_str::SmolStr;

/// The challenge transform. Only `S256` is implemented; `plain` is a
/// downgrade RFC 7636 section 7.2 discourages and this engine never emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeMethod {
    S256,
}

impl ChallengeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeMethod::S256 => "S256",
        }
    }
}

/// An opaque high-entropy code verifier.
///
/// Generated verifiers are 43 URL-safe characters (base64url of 32 random
/// bytes), the RFC 7636 section 4.1 minimum length. A verifier is fixed for
/// the lifetime of a flow; the challenge is a pure function of it and is
/// never regenerated once the flow has started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeVerifier(SmolStr);

impl CodeVerifier {
    pub fn generate() -> Self {
        // https://datatracker.ietf.org/doc/html/rfc7636#section-4.1
        let mut bytes = [0u8; 32];
        ThreadRng::default().fill_bytes(&mut bytes);
        Self(SmolStr::from(URL_SAFE_NO_PAD.encode(bytes)))
    }

    pub fn new(verifier: impl Into<SmolStr>) -> Self {
        Self(verifier.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A `(method, value)` challenge pair derived from a verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeChallenge {
    method: ChallengeMethod,
    value: SmolStr,
}

impl CodeChallenge {
    /// `S256`: unpadded base64url of SHA-256 over the verifier's UTF-8
    /// bytes. The `=` padding must not appear in the challenge parameter
    /// (RFC 7636 section 4.2), which the no-pad engine guarantees.
    pub fn s256(verifier: &CodeVerifier) -> Self {
        Self {
            method: ChallengeMethod::S256,
            value: SmolStr::from(URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_str()))),
        }
    }

    pub fn method(&self) -> ChallengeMethod {
        self.method
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}
