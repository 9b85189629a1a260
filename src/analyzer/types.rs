use receipt_ai_common::ChatMessage;
use serde::Serialize;

/// chat/completions リクエスト本体
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub response_format: ResponseFormat,
}

impl ChatCompletionRequest {
    /// JSONオブジェクト出力を指定したリクエスト
    pub fn json_object(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            response_format: ResponseFormat::json_object(),
        }
    }

    pub fn image_count(&self) -> usize {
        self.messages.iter().map(ChatMessage::image_count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self { kind: "json_object".into() }
    }
}
