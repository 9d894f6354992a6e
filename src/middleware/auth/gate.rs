//! Bearer credential gate (header location → scheme check → verify → decision).
//!
//! This module is intentionally "core-only": it knows nothing about axum's
//! middleware plumbing. `access.rs` calls [`authenticate`] and acts on the
//! returned [`GateOutcome`].
//!
//! Two transport slots are checked, in this order:
//! 1. `Sec-WebSocket-Protocol: Bearer <token>` (browsers cannot set
//!    `Authorization` on a WebSocket handshake). When present and non-empty it is
//!    the only slot consulted.
//! 2. `Authorization: Bearer <token>`.
//!
//! Rejection bodies are kept byte-compatible with the existing whiteboard
//! clients, including the `code` value that differs per slot and the `mag`
//! field name on verifier failures.

use axum::{
    Json,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::api::v1::extractors::AuthCtx;
use crate::services::auth::TokenVerifier;

pub const BEARER_SCHEME: &str = "Bearer";

pub const MSG_FORMAT_INVALID: &str = "request header auth format invalid";
pub const MSG_TOKEN_INVALID: &str = "token invalid";
pub const MSG_TOKEN_EMPTY: &str = "token is empty";

/// Where the credential was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    WebSocketProtocol,
    Authorization,
}

impl Transport {
    pub fn header_name(self) -> HeaderName {
        match self {
            Self::WebSocketProtocol => header::SEC_WEBSOCKET_PROTOCOL,
            Self::Authorization => header::AUTHORIZATION,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::WebSocketProtocol => "websocket_protocol",
            Self::Authorization => "authorization",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("no credential presented")]
    MissingCredential,
    #[error("credential is not `Bearer <token>`")]
    MalformedScheme,
    #[error("token rejected by verifier")]
    InvalidToken,
}

/// JSON body sent with every rejection.
///
/// Verifier failures use the `mag` key; every other rejection uses `msg`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RejectionBody {
    Msg { code: u16, msg: &'static str },
    Mag { code: u16, mag: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    transport: Transport,
    error: GateError,
    body: RejectionBody,
}

impl Rejection {
    pub const STATUS: StatusCode = StatusCode::FORBIDDEN;

    pub fn new(transport: Transport, error: GateError) -> Self {
        let code = match (transport, error) {
            (_, GateError::MissingCredential) | (Transport::WebSocketProtocol, _) => 400,
            (Transport::Authorization, _) => 200,
        };

        let body = match error {
            GateError::MissingCredential => RejectionBody::Msg {
                code,
                msg: MSG_TOKEN_EMPTY,
            },
            GateError::MalformedScheme => RejectionBody::Msg {
                code,
                msg: MSG_FORMAT_INVALID,
            },
            GateError::InvalidToken => RejectionBody::Mag {
                code,
                mag: MSG_TOKEN_INVALID,
            },
        };

        Self {
            transport,
            error,
            body,
        }
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    pub fn error(&self) -> GateError {
        self.error
    }

    pub fn body(&self) -> &RejectionBody {
        &self.body
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        (Self::STATUS, Json(self.body)).into_response()
    }
}

/// Decision for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Proceed(AuthCtx),
    Reject(Rejection),
}

/// Pick the slot that carries the credential, if any.
///
/// An empty `Sec-WebSocket-Protocol` counts as absent. An empty `Authorization`
/// is reported as `None` as well.
pub fn locate(headers: &HeaderMap) -> Option<(Transport, &HeaderValue)> {
    [Transport::WebSocketProtocol, Transport::Authorization]
        .into_iter()
        .find_map(|transport| {
            headers
                .get(transport.header_name())
                .filter(|value| !value.is_empty())
                .map(|value| (transport, value))
        })
}

/// Split `Bearer <token>` on the first space and return the token part.
///
/// The scheme is matched case-sensitively and the token must not be empty.
pub fn parse_bearer(value: &str) -> Result<&str, GateError> {
    match value.split_once(' ') {
        Some((BEARER_SCHEME, token)) if !token.is_empty() => Ok(token),
        _ => Err(GateError::MalformedScheme),
    }
}

/// Run the gate against the request headers.
///
/// Pure with respect to its inputs: the same headers and verifier always give
/// the same outcome.
pub fn authenticate(headers: &HeaderMap, verifier: &dyn TokenVerifier) -> GateOutcome {
    let Some((transport, value)) = locate(headers) else {
        return GateOutcome::Reject(Rejection::new(
            Transport::Authorization,
            GateError::MissingCredential,
        ));
    };

    match check(transport, value, verifier) {
        Ok(ctx) => GateOutcome::Proceed(ctx),
        Err(error) => GateOutcome::Reject(Rejection::new(transport, error)),
    }
}

fn check(
    transport: Transport,
    value: &HeaderValue,
    verifier: &dyn TokenVerifier,
) -> Result<AuthCtx, GateError> {
    // Non visible-ASCII header bytes cannot form `Bearer <token>`.
    let raw = value.to_str().map_err(|_| GateError::MalformedScheme)?;
    let token = parse_bearer(raw)?;

    let identity = verifier.verify(token).map_err(|err| {
        tracing::debug!(error = ?err, transport = transport.as_str(), "token verification failed");
        GateError::InvalidToken
    })?;

    let echoed = match transport {
        Transport::WebSocketProtocol => Some(raw.to_owned()),
        Transport::Authorization => None,
    };

    Ok(AuthCtx::new(identity, echoed))
}
