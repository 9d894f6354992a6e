//! Shared fixtures for unit tests.

use std::sync::Arc;

use crate::services::auth::{Identity, IdentityId, TokenVerifier, VerifyError};
use crate::services::board::Board;
use crate::state::AppState;

/// Accepts exactly `abc123` as alice (id "42").
pub struct StubVerifier;

impl TokenVerifier for StubVerifier {
    fn verify(&self, token: &str) -> Result<Identity, VerifyError> {
        match token {
            "abc123" => Ok(Identity {
                name: "alice".into(),
                id: IdentityId::Str("42".into()),
            }),
            _ => Err(VerifyError::failed()),
        }
    }
}

pub fn state() -> AppState {
    state_with_board(16)
}

pub fn state_with_board(capacity: usize) -> AppState {
    AppState::new(Arc::new(StubVerifier), Board::new(capacity))
}
