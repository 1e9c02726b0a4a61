use http::StatusCode;
use miette::Diagnostic;
use smol_str::SmolStr;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors emitted by the OAuth2 client engine.
///
/// Protocol errors (`StateMismatch`, `MissingParameter`, `InvalidParameter`,
/// `TokenRequest`, `UnexpectedContentType`) are terminal for the flow
/// instance that raised them. Transport errors (`Transport`,
/// `UnexpectedStatus`) are surfaced separately so the caller can decide
/// whether to retry the HTTP call.
#[derive(Debug, Error, Diagnostic)]
pub enum OAuthError {
    /// The `state` in the redirect URI doesn't match the state issued for
    /// this flow.
    #[error("state in redirect uri doesn't match the state issued for this flow")]
    #[diagnostic(
        code(filament_oauth::state_mismatch),
        help("restart the flow from the beginning; a mismatched state may indicate CSRF")
    )]
    StateMismatch,
    /// A required parameter is absent from the redirect query or fragment.
    #[error("missing `{0}` parameter in redirect uri")]
    #[diagnostic(code(filament_oauth::missing_parameter))]
    MissingParameter(SmolStr),
    /// A parameter is present but unparseable.
    #[error("can't parse `{0}` parameter in redirect uri")]
    #[diagnostic(code(filament_oauth::invalid_parameter))]
    InvalidParameter(SmolStr),
    /// The authorization server returned a structured error body.
    #[error(transparent)]
    #[diagnostic(transparent)]
    TokenRequest(#[from] TokenRequestError),
    /// The token endpoint answered with a status this protocol doesn't define.
    #[error("unexpected http status {0}")]
    #[diagnostic(
        code(filament_oauth::http_status),
        help("not an OAuth2 protocol error; the request may be retried")
    )]
    UnexpectedStatus(StatusCode),
    /// The HTTP executor failed before a response was available.
    #[error("transport error: {0}")]
    #[diagnostic(code(filament_oauth::transport))]
    Transport(#[source] BoxError),
    /// Token endpoint responded with something other than `application/json`.
    #[error("unexpected response content-type {0:?}, expected application/json")]
    #[diagnostic(code(filament_oauth::content_type))]
    UnexpectedContentType(Option<SmolStr>),
    /// A continuation snapshot could not be decoded.
    #[error("invalid grant snapshot: {0}")]
    #[diagnostic(
        code(filament_oauth::snapshot),
        help("snapshots must round-trip through GrantSnapshot::encode unmodified")
    )]
    Snapshot(SmolStr),
    /// JSON error
    #[error(transparent)]
    #[diagnostic(code(filament_oauth::serde))]
    Json(#[from] serde_json::Error),
    /// Form encoding error
    #[error(transparent)]
    #[diagnostic(code(filament_oauth::form))]
    UrlEncoding(#[from] serde_html_form::ser::Error),
    /// URL error
    #[error(transparent)]
    #[diagnostic(code(filament_oauth::url))]
    Url(#[from] url::ParseError),
    /// HTTP message build error
    #[error(transparent)]
    #[diagnostic(code(filament_oauth::http))]
    Http(#[from] http::Error),
}

impl OAuthError {
    pub fn transport(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Box::new(source))
    }

    pub fn missing_parameter(name: impl Into<SmolStr>) -> Self {
        Self::MissingParameter(name.into())
    }

    pub fn snapshot(detail: impl Into<SmolStr>) -> Self {
        Self::Snapshot(detail.into())
    }
}

/// Structured `error` body returned by the token endpoint with status 400,
/// per RFC 6749 section 5.2.
#[derive(Debug, Clone, Error, Diagnostic)]
#[error("token request failed: {error}")]
#[diagnostic(
    code(filament_oauth::token_request),
    help("the authorization server rejected the request; see the error description, if any")
)]
pub struct TokenRequestError {
    error: SmolStr,
    description: Option<SmolStr>,
    uri: Option<SmolStr>,
}

impl TokenRequestError {
    pub fn new(error: SmolStr, description: Option<SmolStr>, uri: Option<SmolStr>) -> Self {
        Self {
            error,
            description,
            uri,
        }
    }

    /// The error code token returned by the server, e.g. `invalid_grant`.
    pub fn error(&self) -> &str {
        &self.error
    }

    /// The human-readable `error_description`, if the server sent one.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The `error_uri` pointing at a descriptive error page, if any.
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }
}

pub type Result<T> = core::result::Result<T, OAuthError>;
