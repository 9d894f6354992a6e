/*
 * Responsibility
 * - GET /api/v1/me
 * - 認証ゲートが付与した AuthCtx をそのまま返す (クライアントのログイン確認用)
 */
use axum::Json;
use serde::Serialize;

use crate::api::v1::extractors::AuthCtxExtractor;
use crate::middleware::auth::gate::Transport;
use crate::services::auth::IdentityId;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub name: String,
    pub id: IdentityId,
    pub transport: &'static str,
}

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<MeResponse> {
    let transport = if ctx.via_websocket_protocol() {
        Transport::WebSocketProtocol
    } else {
        Transport::Authorization
    };

    Json(MeResponse {
        name: ctx.name,
        id: ctx.id,
        transport: transport.as_str(),
    })
}
