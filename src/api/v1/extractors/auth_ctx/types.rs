/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - 認証ゲートが検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - トークンの検証ロジックは middleware/services 側の責務
 * - ここは「型（契約）」として固定化する
 */

use crate::services::auth::{Identity, IdentityId};

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `name` / `id` は検証器が返した Identity そのもの
/// - `token` は `Sec-WebSocket-Protocol` 経由で認証された場合のみ、ヘッダ値全体 (`Bearer ` 付き) を保持する
///   (handshake 応答でサブプロトコルとして返す必要があるため)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub name: String,
    pub id: IdentityId,
    pub token: Option<String>,
}

impl AuthCtx {
    pub fn new(identity: Identity, token: Option<String>) -> Self {
        Self {
            name: identity.name,
            id: identity.id,
            token,
        }
    }

    pub fn via_websocket_protocol(&self) -> bool {
        self.token.is_some()
    }
}
