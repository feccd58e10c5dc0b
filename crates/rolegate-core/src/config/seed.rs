//! Seed data configuration.

use serde::{Deserialize, Serialize};

/// Bootstrap seed configuration: the system admin account and the
/// default role set.
///
/// The admin email configured here is also what designates the system
/// admin at runtime — the flag is derived by comparison, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// System admin email address.
    #[serde(default = "default_admin_email")]
    pub admin_email: String,
    /// Initial system admin password.
    #[serde(default = "default_admin_password")]
    pub admin_password: String,
    /// System admin display name.
    #[serde(default = "default_admin_full_name")]
    pub admin_full_name: String,
    /// Role names ensured to exist in both stores at startup.
    #[serde(default = "default_roles")]
    pub roles: Vec<String>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            admin_email: default_admin_email(),
            admin_password: default_admin_password(),
            admin_full_name: default_admin_full_name(),
            roles: default_roles(),
        }
    }
}

fn default_admin_email() -> String {
    "admin@rolegate.local".to_string()
}

fn default_admin_password() -> String {
    "ChangeMe123!".to_string()
}

fn default_admin_full_name() -> String {
    "System Admin".to_string()
}

fn default_roles() -> Vec<String> {
    vec![
        "Admin".to_string(),
        "Manager".to_string(),
        "User".to_string(),
    ]
}
