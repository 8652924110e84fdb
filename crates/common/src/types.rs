use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Namespace under which principal-derived basket IDs are generated.
///
/// Changing this value changes every authenticated user's basket identity,
/// so it is fixed for the lifetime of the system.
const BASKET_NAMESPACE: Uuid = Uuid::from_bytes([
    0x6b, 0x1f, 0x6e, 0x6a, 0x1d, 0x1c, 0x4a, 0x3b, 0x92, 0x7e, 0x5d, 0x0b, 0x8a, 0x41, 0xc6,
    0x2f,
]);

/// Unique identifier for a basket, bound 1:1 to a session.
///
/// Anonymous sessions get a random ID; authenticated sessions derive the ID
/// deterministically from the principal name, so the same user resolves to
/// the same basket after a session regeneration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BasketId(Uuid);

impl BasketId {
    /// Creates a new random basket ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Derives the basket ID for an authenticated principal.
    ///
    /// Deterministic: the same principal name always yields the same ID.
    pub fn for_principal(name: &str) -> Self {
        Self(Uuid::new_v5(&BASKET_NAMESPACE, name.as_bytes()))
    }

    /// Creates a basket ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parses a basket ID from its string token form.
    pub fn parse_str(token: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(token).map(Self)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for BasketId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BasketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for BasketId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<BasketId> for Uuid {
    fn from(id: BasketId) -> Self {
        id.0
    }
}
