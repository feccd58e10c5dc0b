//! Identity projection returned by the credential store.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The credential store's view of an account, as handed across the
/// bridge boundary. Carries no password material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityInfo {
    /// Identity id (shared with the business user, when one exists).
    pub id: Uuid,
    /// Email address.
    pub email: String,
    /// Display name recorded at registration.
    pub full_name: String,
    /// Identity role names, in assignment order.
    pub roles: Vec<String>,
}

/// Data required to create a new login identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIdentity {
    /// Email address; must not already be taken.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Plaintext password; hashed by the credential store.
    pub password: String,
}
