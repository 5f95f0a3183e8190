//! Bearer credential retrieval.

use crate::result::AppResult;

/// Supplies the bearer token attached to every remote request.
///
/// The browser never stores the credential itself; it asks the provider
/// before each request so rotated tokens are picked up. Returning
/// `Ok(None)` sends the request unauthenticated.
pub trait CredentialProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the current bearer token, if any.
    fn bearer_token(&self) -> AppResult<Option<String>>;
}
