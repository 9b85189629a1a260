//! モデル応答の正規化
//!
//! OpenAI互換の応答エンベロープからレシート行を取り出す。
//!
//! ## 処理フロー
//! 1. `choices` が空でない配列であることを確認
//! 2. 先頭 choice の `message.content` を候補テキストとする
//! 3. 候補テキスト全体を厳密にパース
//! 4. 失敗したら最初の `[` から最後の `]` までを切り出して再パース
//! 5. 行の配列を再シリアライズ
//!
//! どの段階の失敗も `NormalizationOutcome::Failure` になり、部分的な結果は返さない。

use crate::error::{Error, Result};
use crate::types::{NormalizationOutcome, ReceiptLineItem};
use serde_json::Value;

/// Failure診断メッセージの接頭辞
pub const FAILURE_PREFIX: &str = "Failed to receive expected LLM response.";

/// 最初の `[` から最後の `]` まで（両端含む）を切り出す
///
/// # Examples
/// ```
/// use receipt_ai_common::extract_json_array;
///
/// let reply = "Here you go: [{\"product\":\"Milk\",\"quantity\":1,\"cost\":1.15}] Enjoy!";
/// assert_eq!(
///     extract_json_array(reply),
///     Some("[{\"product\":\"Milk\",\"quantity\":1,\"cost\":1.15}]")
/// );
/// assert_eq!(extract_json_array("] no array ["), None);
/// ```
pub fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}

/// テキスト全体をレシート行の配列として厳密にパース
pub fn parse_line_items(text: &str) -> Result<Vec<ReceiptLineItem>> {
    let items: Vec<ReceiptLineItem> = serde_json::from_str(text)?;
    for item in &items {
        item.validate()?;
    }
    Ok(items)
}

/// 厳密パース → 配列切り出しの順でレシート行を取り出す
pub fn extract_line_items(text: &str) -> Result<Vec<ReceiptLineItem>> {
    let original = match parse_line_items(text) {
        Ok(items) => return Ok(items),
        Err(e) => e,
    };

    let Some(candidate) = extract_json_array(text) else {
        return Err(Error::Parse(format!("no JSON array found in reply ({})", original)));
    };

    parse_line_items(candidate)
        .map_err(|e| Error::Parse(format!("{} (strict parse: {})", e, original)))
}

/// エンベロープから先頭 choice の本文を取り出す
pub fn reply_content(envelope: &Value) -> Result<&str> {
    let choices = envelope
        .get("choices")
        .and_then(Value::as_array)
        .filter(|choices| !choices.is_empty())
        .ok_or_else(|| {
            Error::Envelope(format!(
                "Received the following response from the model provider: {}",
                envelope
            ))
        })?;

    choices[0]
        .get("message")
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Envelope(format!("first choice has no text content: {}", choices[0])))
}

/// 応答エンベロープを正規化
///
/// 同じ入力には常に同じ結果を返す（内部状態なし）。
pub fn normalize(envelope: &Value) -> NormalizationOutcome {
    let payload = reply_content(envelope)
        .and_then(extract_line_items)
        .and_then(|items| Ok(serde_json::to_string(&items)?));

    match payload {
        Ok(payload) => NormalizationOutcome::Success(payload),
        Err(e) => NormalizationOutcome::Failure(format!("{} {}", FAILURE_PREFIX, e)),
    }
}

/// 本文テキストだけを正規化（エンベロープなし）
pub fn normalize_reply_text(text: &str) -> NormalizationOutcome {
    normalize(&wrap_in_envelope(text))
}

/// 本文テキストを最小限のエンベロープで包む
pub fn wrap_in_envelope(text: &str) -> Value {
    serde_json::json!({
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": text } }
        ]
    })
}
