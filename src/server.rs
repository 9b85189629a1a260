//! HTTPサーバ
//!
//! - `POST /api/get-items-from-image`: `{"images": [DataURL...]}` → 明細JSON配列
//! - `GET /api/health`: 死活確認
//!
//! 変換失敗（送信エラー含む）は 502 Bad Gateway。

use crate::analyzer::{convert_receipt, CompletionBackend};
use crate::error::{ReceiptAiError, Result};
use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use receipt_ai_common::{is_image_data_url, NormalizationOutcome};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, instrument, warn};

/// リクエスト本体の上限（base64画像を複数枚受けるため既定の2MBより大きくする）
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn CompletionBackend>,
    pub model: String,
}

impl AppState {
    pub fn new(backend: Arc<dyn CompletionBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ImagesRequest {
    pub images: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorBody { message })).into_response()
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/get-items-from-image", post(get_items_from_image))
        .route("/api/health", get(|| async { "OK" }))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// Handler for `POST /api/get-items-from-image`
pub async fn get_items_from_image(
    State(state): State<AppState>,
    Json(request): Json<ImagesRequest>,
) -> Response {
    if request.images.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No images were provided.".into());
    }
    if let Some(index) = request.images.iter().position(|url| !is_image_data_url(url)) {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("Image {} is not a base64 encoded image data URL.", index),
        );
    }

    info!(images = request.images.len(), backend = state.backend.name(), "Converting receipt");

    match convert_receipt(state.backend.as_ref(), &state.model, &request.images).await {
        NormalizationOutcome::Success(payload) => {
            ([(header::CONTENT_TYPE, "application/json")], payload).into_response()
        }
        NormalizationOutcome::Failure(diagnostic) => {
            warn!(%diagnostic, "Responding with bad gateway");
            error_response(
                StatusCode::BAD_GATEWAY,
                format!("Error converting the receipt to JSON. {}", diagnostic),
            )
        }
    }
}

/// サーバを起動（終了まで戻らない）
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| ReceiptAiError::Server(format!("{} にバインドできません: {}", addr, e)))?;

    info!("Receipt HTTP server listening on {}", addr);
    axum::serve(listener, router(state))
        .await
        .map_err(|e| ReceiptAiError::Server(e.to_string()))?;

    Ok(())
}
