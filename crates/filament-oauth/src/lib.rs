//! OAuth2 (RFC 6749) client engine: grant flows, PKCE, and serializable
//! interactive grant state. Transport is abstract; see [`http_client`].

pub mod authorization;
pub mod client;
pub mod error;
pub mod grants;
pub mod http_client;
pub mod pkce;
pub mod request;
pub mod scopes;
pub mod state;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;
