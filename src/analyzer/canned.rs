//! 固定応答バックエンド
//!
//! ネットワーク・APIキーなしでパイプライン全体を動かすためのもの。
//! 応答は実際の OpenRouter 応答と同じ形のエンベロープ。

use super::types::ChatCompletionRequest;
use super::CompletionBackend;
use crate::error::Result;
use async_trait::async_trait;
use receipt_ai_common::wrap_in_envelope;
use serde_json::{json, Value};
use tracing::debug;

/// 固定応答の本文（29行）
pub const CANNED_REPLY_CONTENT: &str = r#"[
  {"product":"Tesco Irish Chicken Breast Fillets 500G","quantity":1,"cost":5.69},
  {"product":"Tesco Blueberry 150G","quantity":1,"cost":1.99},
  {"product":"Tesco Protein Blueberry Yoghurt 200G","quantity":3,"cost":3.60},
  {"product":"Tranos Greek Feta 200G","quantity":1,"cost":1.09},
  {"product":"Tesco Natural Yoghurt 500G","quantity":2,"cost":2.38},
  {"product":"Tesco Irish Chicken Breast Fillet Portions 945G","quantity":3,"cost":30.00},
  {"product":"Tesco Skim Milk 1Litre","quantity":1,"cost":1.15},
  {"product":"Tesco Low Fat Milk 1Ltr","quantity":1,"cost":1.15},
  {"product":"Tesco Low Fat Milk500ml","quantity":1,"cost":0.75},
  {"product":"Tesco Raspberries 300G","quantity":1,"cost":1.75},
  {"product":"Hughes Farming Carrot Bag 750g","quantity":1,"cost":0.69},
  {"product":"Tesco Milled Flax Pumpkin & Chia Seed Mix 175G","quantity":1,"cost":2.80},
  {"product":"Tesco Whole Cucumber Each","quantity":2,"cost":1.38},
  {"product":"Tesco Smoked Paprika 48G","quantity":1,"cost":1.00},
  {"product":"Tesco Ginger 100g","quantity":1,"cost":0.57},
  {"product":"Tesco Lemon And Lime Zero 2 Litre","quantity":1,"cost":1.00},
  {"product":"Tesco Mild Tandoori Curry Powder 80G","quantity":1,"cost":1.00},
  {"product":"Tesco Red Onion 750G","quantity":3,"cost":2.07},
  {"product":"Tesco 12 Irish Barn Eggs","quantity":1,"cost":2.75},
  {"product":"Tesco 10 Chicken Stock Cubes 100G","quantity":1,"cost":0.45},
  {"product":"Tesco Hazelnut Chocolate Spread 400G","quantity":1,"cost":1.50},
  {"product":"Tesco Organic Oats 1Kg","quantity":1,"cost":1.10},
  {"product":"Sprite Zero Sugar Lemon-Lime Soft Drink 2L","quantity":1,"cost":3.50},
  {"product":"Tesco Cranberries 100G","quantity":1,"cost":1.35},
  {"product":"Tesco Fun-Sized Easy Peeler 500G","quantity":1,"cost":0.99},
  {"product":"Tesco Sliced Green Jalapenos In Brine 300G","quantity":3,"cost":3.00},
  {"product":"Tesco Salad Tomatoes 6 Pack","quantity":1,"cost":1.29},
  {"product":"Springforce Jumbo Kitchen Towel 240 Sheets","quantity":1,"cost":1.50},
  {"product":"Farm Select Puro Gusto Ready To Eat Mango","quantity":1,"cost":0.69}
]"#;

/// 固定応答のエンベロープ
pub fn canned_envelope() -> Value {
    json!({
        "id": "gen-1742682890-bRn4x0BWEZwQC1V82XXU",
        "provider": "Anthropic",
        "model": "anthropic/claude-3.5-sonnet",
        "object": "chat.completion",
        "created": 1000000000,
        "choices": [
            {
                "logprobs": null,
                "finish_reason": "end_turn",
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": CANNED_REPLY_CONTENT,
                    "refusal": ""
                }
            }
        ],
        "usage": {
            "prompt_tokens": 3341,
            "completion_tokens": 879,
            "total_tokens": 4220
        }
    })
}

/// 固定応答を返すバックエンド
///
/// 状態を持たないので並行呼び出しは無制限に可能。
#[derive(Debug, Clone)]
pub struct CannedBackend {
    envelope: Value,
}

impl CannedBackend {
    pub fn new() -> Self {
        Self {
            envelope: canned_envelope(),
        }
    }

    /// 任意のエンベロープを返す
    pub fn with_envelope(envelope: Value) -> Self {
        Self { envelope }
    }

    /// 任意の本文を返す
    pub fn with_content(content: &str) -> Self {
        Self::with_envelope(wrap_in_envelope(content))
    }
}

impl Default for CannedBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionBackend for CannedBackend {
    fn name(&self) -> &str {
        "canned"
    }

    async fn complete(&self, request: &ChatCompletionRequest) -> Result<Value> {
        debug!(
            model = %request.model,
            images = request.image_count(),
            "Returning canned completion"
        );
        Ok(self.envelope.clone())
    }
}
