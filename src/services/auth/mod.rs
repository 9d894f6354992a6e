pub mod factory;
pub mod jwt;
pub mod verifier;

pub use factory::build_verifier;
pub use jwt::{JwtKey, JwtVerifier};
pub use verifier::{Identity, IdentityId, TokenVerifier, VerifyError};
