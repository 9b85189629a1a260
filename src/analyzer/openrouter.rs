//! OpenRouter連携モジュール
//!
//! OpenAI互換の chat/completions に1回だけPOSTし、応答エンベロープをそのまま返す。
//! リトライはしない。タイムアウトは設定値を HTTP クライアントに渡すだけ。

use super::types::ChatCompletionRequest;
use super::CompletionBackend;
use crate::config::{Config, DEFAULT_API_BASE};
use crate::error::{ReceiptAiError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub struct OpenRouterBackend {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenRouterBackend {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_API_BASE.to_string(),
        }
    }

    /// 設定からバックエンドを生成（APIキー必須）
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.get_api_key()?;

        let mut builder = Client::builder();
        if config.timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_seconds));
        }
        let client = builder
            .build()
            .map_err(|e| ReceiptAiError::Config(format!("HTTPクライアント生成エラー: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.api_base.clone(),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionBackend for OpenRouterBackend {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(&self, request: &ChatCompletionRequest) -> Result<Value> {
        debug!(
            model = %request.model,
            images = request.image_count(),
            "Sending request to OpenRouter"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ReceiptAiError::ApiCall(format!("OpenRouter HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReceiptAiError::ApiStatus {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: Value = response
            .json()
            .await
            .map_err(|e| ReceiptAiError::ApiParse(format!("Failed to parse OpenRouter response: {}", e)))?;

        debug!(status = status.as_u16(), "Received OpenRouter response");
        Ok(envelope)
    }
}
