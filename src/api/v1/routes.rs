/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /me, /board/ws
 * - ここに並ぶルートは全て認証ゲートの内側 (app.rs で access::apply する)
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::{board::board_ws, me::me};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/board/ws", get(board_ws))
}
