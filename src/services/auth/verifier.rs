/*
 * Responsibility
 * - 認証ゲートから見た「トークン検証器」の契約 (trait)
 * - 検証結果として得られる Identity (name / id)
 * - 検証失敗は 1 種類の VerifyError に畳み込む (詳細は source としてログ用に保持)
 */
use std::error::Error as StdError;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity id as carried in the token: issuers emit either a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdentityId {
    Int(i64),
    Str(String),
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Str(s) => f.write_str(s),
        }
    }
}

/// Decoded result of a valid credential. Only a `TokenVerifier` produces one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub id: IdentityId,
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("token verification failed")]
    VerificationFailed(#[source] Option<Box<dyn StdError + Send + Sync>>),
}

impl VerifyError {
    pub fn failed() -> Self {
        Self::VerificationFailed(None)
    }

    pub fn with_source(source: impl StdError + Send + Sync + 'static) -> Self {
        Self::VerificationFailed(Some(Box::new(source)))
    }
}

/// Decodes a raw bearer token into an `Identity`.
///
/// Implementations are shared across every in-flight request, so they must not
/// hold mutable state between calls.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Identity, VerifyError>;
}
