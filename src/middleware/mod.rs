pub mod auth;

pub use auth::{extract_bearer_token, require_auth, AuthUser};
