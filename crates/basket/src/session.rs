//! Session-bound basket identity.
//!
//! The basket identity is an explicit value threaded through every call:
//! handlers materialize a [`Session`], resolve the basket ID from it, and
//! persist the session back. There is no ambient session accessor.

use common::BasketId;

/// Request-scoped session state.
///
/// Carries the basket-identity token and the authenticated principal name,
/// if any. Authentication itself is out of scope; the principal is whatever
/// the transport layer vouches for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    basket_token: Option<String>,
    principal: Option<String>,
}

impl Session {
    /// Creates an anonymous session with no stored state.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Creates a session for an authenticated principal.
    pub fn authenticated(principal: impl Into<String>) -> Self {
        Self {
            basket_token: None,
            principal: Some(principal.into()),
        }
    }

    /// Returns the stored basket-identity token, if any.
    pub fn basket_token(&self) -> Option<&str> {
        self.basket_token.as_deref()
    }

    /// Returns the authenticated principal name, if any.
    pub fn principal(&self) -> Option<&str> {
        self.principal.as_deref()
    }

    /// Stores the basket-identity token.
    pub fn set_basket_token(&mut self, token: String) {
        self.basket_token = Some(token);
    }

    /// Drops the basket-identity binding (after a concluded purchase).
    pub fn clear_basket_token(&mut self) {
        self.basket_token = None;
    }
}

/// Derives a basket ID from an optional principal name.
///
/// Authenticated principals map deterministically to the same ID, so their
/// basket survives session regeneration; anonymous callers get a fresh
/// random ID.
pub fn derive_basket_id(principal: Option<&str>) -> BasketId {
    match principal {
        Some(name) if !name.trim().is_empty() => BasketId::for_principal(name),
        _ => BasketId::new(),
    }
}

/// Resolves the basket identity for a session, storing it back before
/// returning.
///
/// Idempotent per session lifetime: once a token is recorded, every later
/// call resolves to the same ID. A token that no longer parses is discarded
/// and replaced.
pub fn resolve_basket_id(session: &mut Session) -> BasketId {
    if let Some(token) = session.basket_token() {
        match BasketId::parse_str(token) {
            Ok(id) => return id,
            Err(error) => {
                tracing::warn!(%token, %error, "stored basket token is not parseable, regenerating");
            }
        }
    }

    let id = derive_basket_id(session.principal());
    session.set_basket_token(id.to_string());
    id
}
