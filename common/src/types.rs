//! 解析結果の型定義
//!
//! CLIとHTTPサーバで共有される型:
//! - ReceiptLineItem: レシート1行分（商品名・数量・金額）
//! - NormalizationOutcome: 正規化の最終結果（success/failure）

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize, Serializer};

/// レシートの1行
///
/// モデル出力と同じキー構成のみを受け付ける（余分なキーはエラー）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReceiptLineItem {
    /// 商品名（代替品は末尾に " [SUB]"）
    pub product: String,

    /// 数量（量り売りの小数も可）
    #[serde(serialize_with = "serialize_number")]
    pub quantity: f64,

    /// 実際に請求された合計金額（通貨記号なし）
    #[serde(serialize_with = "serialize_number")]
    pub cost: f64,
}

impl ReceiptLineItem {
    pub fn new(product: impl Into<String>, quantity: f64, cost: f64) -> Self {
        Self {
            product: product.into(),
            quantity,
            cost,
        }
    }

    /// 型は正しいが値が不正な行を弾く
    pub fn validate(&self) -> Result<()> {
        if self.product.trim().is_empty() {
            return Err(Error::Parse("item has an empty product name".into()));
        }
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            return Err(Error::Parse(format!(
                "item \"{}\" has a non-positive quantity: {}",
                self.product, self.quantity
            )));
        }
        if !self.cost.is_finite() || self.cost < 0.0 {
            return Err(Error::Parse(format!(
                "item \"{}\" has a negative cost: {}",
                self.product, self.cost
            )));
        }
        Ok(())
    }
}

/// 整数値は `1.0` ではなく `1` として出力
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// 正規化結果
///
/// `{"status": "success" | "failure", "content": "..."}` としてシリアライズされる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "content", rename_all = "lowercase")]
pub enum NormalizationOutcome {
    /// シリアライズ済みの ReceiptLineItem 配列
    Success(String),
    /// 失敗理由
    Failure(String),
}

impl NormalizationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, NormalizationOutcome::Success(_))
    }

    /// payload または診断メッセージ
    pub fn content(&self) -> &str {
        match self {
            NormalizationOutcome::Success(content) | NormalizationOutcome::Failure(content) => content,
        }
    }

    /// Success の payload を行の配列に戻す
    pub fn items(&self) -> Result<Vec<ReceiptLineItem>> {
        match self {
            NormalizationOutcome::Success(payload) => Ok(serde_json::from_str(payload)?),
            NormalizationOutcome::Failure(diagnostic) => Err(Error::Parse(diagnostic.clone())),
        }
    }

    pub fn into_result(self) -> std::result::Result<String, String> {
        match self {
            NormalizationOutcome::Success(payload) => Ok(payload),
            NormalizationOutcome::Failure(diagnostic) => Err(diagnostic),
        }
    }
}
