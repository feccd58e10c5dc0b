//! # rolegate-auth
//!
//! Stateless token issuance for Rolegate.
//!
//! ## Modules
//!
//! - `jwt` — signed access token creation and validation
//! - `token` — opaque refresh token generation

pub mod jwt;
pub mod token;

pub use jwt::{AccessToken, Claims, JwtDecoder, JwtEncoder};
pub use token::generate_refresh_token;
