//! The authorization endpoint request: an immutable accumulator of query
//! parameters rendered onto the authorization endpoint URL.

use smol_str::SmolStr;
use url::Url;
use url::form_urlencoded;

use crate::pkce::CodeChallenge;
use crate::scopes::Scope;

/// An immutable authorization request.
///
/// Parameters form an ordered map keyed by name: every `with_*` operation
/// returns a new request with the named parameter replaced if present, else
/// appended. A name never appears twice in the rendered query.
///
/// Rendering does not require `client_id` or `redirect_uri`; the
/// [`OAuth2Client`](crate::client::OAuth2Client) façade always upserts both,
/// so URLs produced through it carry the parameters RFC 6749 section 4.1.1
/// mandates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    parameters: Vec<(SmolStr, SmolStr)>,
}

impl AuthorizationRequest {
    /// A request with the two parameters every interactive flow starts from.
    pub fn new(response_type: impl Into<SmolStr>, state: impl Into<SmolStr>) -> Self {
        Self {
            parameters: vec![
                (SmolStr::new_static("response_type"), response_type.into()),
                (SmolStr::new_static("state"), state.into()),
            ],
        }
    }

    /// Like [`AuthorizationRequest::new`] with a `scope` parameter between
    /// `response_type` and `state`.
    pub fn scoped(
        response_type: impl Into<SmolStr>,
        scope: &Scope,
        state: impl Into<SmolStr>,
    ) -> Self {
        Self {
            parameters: vec![
                (SmolStr::new_static("response_type"), response_type.into()),
                (SmolStr::new_static("scope"), SmolStr::from(scope.to_string())),
                (SmolStr::new_static("state"), state.into()),
            ],
        }
    }

    pub fn with_client_id(self, client_id: impl Into<SmolStr>) -> Self {
        self.with_parameter("client_id", client_id)
    }

    pub fn with_redirect_uri(self, redirect_uri: impl Into<SmolStr>) -> Self {
        self.with_parameter("redirect_uri", redirect_uri)
    }

    pub fn with_code_challenge(self, challenge: &CodeChallenge) -> Self {
        self.with_parameter("code_challenge_method", challenge.method().as_str())
            .with_parameter("code_challenge", challenge.value())
    }

    /// Upserts an arbitrary extension parameter.
    pub fn with_parameter(self, name: impl Into<SmolStr>, value: impl Into<SmolStr>) -> Self {
        let name = name.into();
        let value = value.into();
        let mut parameters = self.parameters;
        match parameters.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => parameters.push((name, value)),
        }
        Self { parameters }
    }

    /// Renders the accumulated parameters onto `endpoint`.
    ///
    /// Any query or fragment already present on the endpoint is discarded so
    /// our parameters can't collide with stale ones. Values are encoded per
    /// `application/x-www-form-urlencoded` (space becomes `+`).
    pub fn authorization_uri(&self, endpoint: &Url) -> Url {
        let mut url = endpoint.clone();
        url.set_query(None);
        url.set_fragment(None);
        let mut query = form_urlencoded::Serializer::new(String::new());
        for (name, value) in &self.parameters {
            query.append_pair(name, value);
        }
        url.set_query(Some(&query.finish()));
        url
    }
}
