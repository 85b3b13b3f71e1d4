//! Credential and token handling: bcrypt password hashing, signed bearer
//! tokens, and the request middleware gating protected routes.

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, JwtHandler, TokenError};
pub use middleware::{authenticate, require_admin, require_store_access};
