//! Authentication utilities

mod jwt;
mod password;

pub use jwt::{AccessClaims, JwtService};
pub use password::{hash_password, verify_password, AdminCredentials};
