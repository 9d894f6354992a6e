/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - verifier: トークン検証器 (リクエスト間で共有、内部状態なし)
 *   - board: whiteboard のブロードキャストルーム
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::{auth::TokenVerifier, board::Board};

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<dyn TokenVerifier>,
    pub board: Board,
}

impl AppState {
    pub fn new(verifier: Arc<dyn TokenVerifier>, board: Board) -> Self {
        Self { verifier, board }
    }
}
