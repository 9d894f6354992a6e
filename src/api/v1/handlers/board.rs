/*
 * Responsibility
 * - GET /api/v1/board/ws (WebSocket upgrade)
 * - Sec-WebSocket-Protocol で認証された場合、そのヘッダ値をサブプロトコルとして handshake 応答に返す
 *   (ブラウザは要求したサブプロトコルが返らないと接続を閉じる)
 * - 受信したテキストフレームを whiteboard ルームへ中継する
 */
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::api::v1::extractors::{AuthCtx, AuthCtxExtractor};
use crate::services::board::{Board, BoardEvent};
use crate::state::AppState;

pub async fn board_ws(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ws: WebSocketUpgrade,
) -> Response {
    let ws = match ctx.token.clone() {
        Some(token) => ws.protocols([token]),
        None => ws,
    };

    let board = state.board.clone();
    ws.on_upgrade(move |socket| run_session(socket, ctx, board))
}

async fn run_session(mut socket: WebSocket, ctx: AuthCtx, board: Board) {
    let session = Uuid::new_v4();
    let mut rx = board.subscribe();

    tracing::info!(
        %session,
        id = %ctx.id,
        sessions = board.session_count(),
        "board session opened"
    );

    loop {
        tokio::select! {
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    board.publish(BoardEvent {
                        session,
                        name: ctx.name.clone(),
                        id: ctx.id.clone(),
                        payload: text.as_str().to_owned(),
                    });
                }
                Some(Ok(Message::Close(_))) | None => break,
                // binary / ping / pong
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    tracing::debug!(%session, error = %err, "board socket error");
                    break;
                }
            },
            outgoing = rx.recv() => match outgoing {
                Ok(event) if event.session == session => {}
                Ok(event) => {
                    let frame = match serde_json::to_string(&event) {
                        Ok(frame) => frame,
                        Err(err) => {
                            tracing::warn!(%session, error = %err, "failed to encode board event");
                            continue;
                        }
                    };
                    if socket.send(Message::Text(frame.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(%session, skipped, "board session lagging, events dropped");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    tracing::info!(%session, id = %ctx.id, "board session closed");
}
