//! レシート解析
//!
//! 画像 → 会話組み立て → モデル問い合わせ → 応答正規化 の一連の処理。
//! 問い合わせ先は `CompletionBackend` として差し替える。

mod canned;
mod openrouter;
mod types;

pub use canned::{canned_envelope, CannedBackend, CANNED_REPLY_CONTENT};
pub use openrouter::OpenRouterBackend;
pub use types::{ChatCompletionRequest, ResponseFormat};

use crate::ai_provider::AiProvider;
use crate::config::Config;
use crate::error::Result;
use async_trait::async_trait;
use receipt_ai_common::parser::FAILURE_PREFIX;
use receipt_ai_common::{build_conversation, check_conventions, normalize, ChatMessage, NormalizationOutcome};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// モデル問い合わせ先
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    fn name(&self) -> &str;

    /// 1回だけ問い合わせ、応答エンベロープを返す
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<Value>;
}

/// プロバイダ指定からバックエンドを生成
///
/// OpenRouter の場合のみAPIキーが必要。
pub fn build_backend(provider: AiProvider, config: &Config) -> Result<Arc<dyn CompletionBackend>> {
    match provider {
        AiProvider::OpenRouter => Ok(Arc::new(OpenRouterBackend::from_config(config)?)),
        AiProvider::Canned => Ok(Arc::new(CannedBackend::new())),
    }
}

/// モデルへ会話を送り、生の応答エンベロープを返す
pub async fn query(
    backend: &dyn CompletionBackend,
    model: &str,
    conversation: &[ChatMessage],
) -> Result<Value> {
    let request = ChatCompletionRequest::json_object(model, conversation.to_vec());
    backend.complete(&request).await
}

/// レシート画像を明細JSONに変換
///
/// 送信エラーもここで Failure に変換するので、呼び出し側は結果の2分岐だけを扱えばよい。
///
/// # Arguments
/// * `backend` - 問い合わせ先
/// * `model` - モデルID
/// * `images` - Data URL形式の画像
pub async fn convert_receipt<S: AsRef<str>>(
    backend: &dyn CompletionBackend,
    model: &str,
    images: &[S],
) -> NormalizationOutcome {
    let conversation = build_conversation(images);

    let reply = match query(backend, model, &conversation).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(backend = backend.name(), error = %e, "Model query failed");
            return NormalizationOutcome::Failure(format!("{} {}", FAILURE_PREFIX, e));
        }
    };

    let outcome = normalize(&reply);
    match &outcome {
        NormalizationOutcome::Success(_) => {
            if let Ok(items) = outcome.items() {
                debug!(items = items.len(), "Receipt normalized");
                for warning in check_conventions(&items) {
                    warn!(%warning, "Receipt item may break output conventions");
                }
            }
        }
        NormalizationOutcome::Failure(diagnostic) => {
            warn!(backend = backend.name(), %diagnostic, "Receipt normalization failed");
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReceiptAiError;
    use std::sync::Mutex;

    /// 受け取ったリクエストを記録するバックエンド
    struct RecordingBackend {
        requests: Mutex<Vec<ChatCompletionRequest>>,
    }

    #[async_trait]
    impl CompletionBackend for RecordingBackend {
        fn name(&self) -> &str {
            "recording"
        }

        async fn complete(&self, request: &ChatCompletionRequest) -> Result<Value> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(canned_envelope())
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl CompletionBackend for FailingBackend {
        fn name(&self) -> &str {
            "failing"
        }

        async fn complete(&self, _request: &ChatCompletionRequest) -> Result<Value> {
            Err(ReceiptAiError::ApiCall("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_query_sends_json_object_request() {
        let backend = RecordingBackend { requests: Mutex::new(Vec::new()) };
        let conversation = build_conversation(&["data:image/jpeg;base64,AAAA"]);

        let reply = query(&backend, "anthropic/claude-3.5-sonnet", &conversation).await.unwrap();
        assert!(reply["choices"].is_array());

        let requests = backend.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "anthropic/claude-3.5-sonnet");
        assert_eq!(requests[0].response_format, ResponseFormat::json_object());
        assert_eq!(requests[0].messages, conversation);
    }

    #[tokio::test]
    async fn test_convert_receipt_with_canned_backend() {
        let outcome = convert_receipt(&CannedBackend::new(), "any/model", &["data:image/png;base64,AA"]).await;
        assert_eq!(outcome.items().unwrap().len(), 29);
    }

    #[tokio::test]
    async fn test_convert_receipt_transport_error_becomes_failure() {
        let outcome = convert_receipt(&FailingBackend, "any/model", &["data:image/png;base64,AA"]).await;
        match outcome {
            NormalizationOutcome::Failure(msg) => {
                assert!(msg.starts_with(FAILURE_PREFIX));
                assert!(msg.contains("connection refused"));
            }
            other => panic!("Expected Failure, got {:?}", other),
        }
    }

    #[test]
    fn test_build_backend_canned_needs_no_key() {
        let config = Config::default();
        let backend = build_backend(AiProvider::Canned, &config).unwrap();
        assert_eq!(backend.name(), "canned");
    }
}
