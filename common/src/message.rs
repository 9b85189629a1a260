//! チャット形式の会話メッセージ
//!
//! OpenAI互換の chat/completions に渡す形をそのままシリアライズする:
//! - content は文字列、またはテキスト/画像パートの配列
//! - 画像は Data URL で埋め込む

use serde::{Deserialize, Serialize};

/// メッセージの役割
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// 画像参照（Data URL）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// content配列の1要素
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Text(text.into()),
        }
    }

    /// 画像のみのユーザーメッセージ
    pub fn user_images<I, S>(data_urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let parts = data_urls
            .into_iter()
            .map(|url| ContentPart::ImageUrl {
                image_url: ImageUrl { url: url.into() },
            })
            .collect();

        Self {
            role: Role::User,
            content: MessageContent::Parts(parts),
        }
    }

    /// 含まれる画像パートの数
    pub fn image_count(&self) -> usize {
        match &self.content {
            MessageContent::Text(_) => 0,
            MessageContent::Parts(parts) => parts
                .iter()
                .filter(|p| matches!(p, ContentPart::ImageUrl { .. }))
                .count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_message_serialize() {
        let msg = ChatMessage::system("You are a receipt assistant");
        let json = serde_json::to_value(&msg).expect("シリアライズ失敗");
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "You are a receipt assistant");
    }

    #[test]
    fn test_user_images_serialize() {
        let msg = ChatMessage::user_images(["data:image/jpeg;base64,AAAA", "data:image/png;base64,BBBB"]);
        let json = serde_json::to_value(&msg).expect("シリアライズ失敗");

        assert_eq!(json["role"], "user");
        assert_eq!(json["content"][0]["type"], "image_url");
        assert_eq!(json["content"][0]["image_url"]["url"], "data:image/jpeg;base64,AAAA");
        assert_eq!(json["content"][1]["image_url"]["url"], "data:image/png;base64,BBBB");
        assert_eq!(msg.image_count(), 2);
    }

    #[test]
    fn test_text_part_serialize() {
        let part = ContentPart::Text { text: "page 1".to_string() };
        let json = serde_json::to_string(&part).expect("シリアライズ失敗");
        assert_eq!(json, r#"{"type":"text","text":"page 1"}"#);
    }

    #[test]
    fn test_message_deserialize_both_content_forms() {
        let plain: ChatMessage =
            serde_json::from_str(r#"{"role":"assistant","content":"[]"}"#).expect("デシリアライズ失敗");
        assert_eq!(plain, ChatMessage::assistant("[]"));

        let parts: ChatMessage = serde_json::from_str(
            r#"{"role":"user","content":[{"type":"image_url","image_url":{"url":"data:image/png;base64,AA"}}]}"#,
        )
        .expect("デシリアライズ失敗");
        assert_eq!(parts.role, Role::User);
        assert_eq!(parts.image_count(), 1);
    }

    #[test]
    fn test_text_message_has_no_images() {
        assert_eq!(ChatMessage::user("hello").image_count(), 0);
    }
}
