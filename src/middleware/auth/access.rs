//! Bearer 認証ゲート → AuthCtx を extensions に入れる
//!
//! - 判定ロジックそのものは `gate` にある (ヘッダ抽出 → Bearer 形式チェック → 検証)
//! - ここは axum の middleware として配線し、Proceed なら次へ、Reject なら 403 を返して打ち切る

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use super::gate::{self, GateOutcome};
use crate::state::AppState;

/// `/api/v1/*` に認証を掛けるための middleware を適用する。
///
/// 例：
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::access::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match gate::authenticate(req.headers(), state.verifier.as_ref()) {
        GateOutcome::Proceed(auth_ctx) => {
            tracing::debug!(
                id = %auth_ctx.id,
                websocket = auth_ctx.via_websocket_protocol(),
                "request authenticated"
            );

            // middleware → extractor への受け渡し
            req.extensions_mut().insert(auth_ctx);

            next.run(req).await
        }
        GateOutcome::Reject(rejection) => {
            tracing::warn!(
                transport = rejection.transport().as_str(),
                reason = %rejection.error(),
                method = %req.method(),
                path = %req.uri().path(),
                "request rejected by auth gate"
            );
            rejection.into_response()
        }
    }
}
