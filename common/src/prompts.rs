//! プロンプト生成モジュール
//!
//! CLIとHTTPサーバで共有されるプロンプト生成ロジック:
//! - SUBSTITUTION_MARKER / DEPARTMENT_HEADERS: モデルとの出力規約
//! - build_system_prompt: レシート読み取り用システムプロンプト
//! - build_conversation: システムプロンプト + 画像メッセージ

use crate::message::ChatMessage;

/// 既定のモデル（OpenRouterのモデルID）
pub const DEFAULT_MODEL: &str = "anthropic/claude-3.5-sonnet";

/// 代替品を示す商品名の末尾マーカー
pub const SUBSTITUTION_MARKER: &str = "[SUB]";

/// 出力から除外させる売場見出し
pub const DEPARTMENT_HEADERS: &[&str] = &["Fridge", "Freezer", "Cupboard"];

/// 処理を打ち切るセクション見出し
pub const PAYMENT_SUMMARY_HEADER: &str = "Payment summary";

/// システムプロンプト生成
///
/// JSON配列のみを返すよう指示し、代替品・除外行の規約を埋め込む。
pub fn build_system_prompt() -> String {
    let departments = DEPARTMENT_HEADERS
        .iter()
        .map(|d| format!("\"{}\"", d))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"You are a grocery receipt processing assistant that takes in image inputs. You MUST respond with ONLY a valid JSON array containing objects with exactly these fields: "product" (string), "quantity" (number), "cost" (number). Parse receipts using these rules:

    1. Extract data from "Qty", "Product", and "Total" columns:
      - Always use the exact value from the "Total" column for cost
      - Remove currency symbols from numbers

    2. Format rules for substitutions:
      - Use ONLY the substituted product name + " {SUBSTITUTION_MARKER}"
      - Use the Total value shown between original and substituted items
      - Ignore the original product entry entirely

    3. Skip these items:
      - Products listed under "Unavailable"
      - Text about price differences (e.g., "Was €X, now €Y")
      - Department headers (e.g., {departments})
      - VAT/tax explanations

    4. Stop processing at "{PAYMENT_SUMMARY_HEADER}" section

    Example output:
    [
      {{"product":"Chicken Breast Fillets","quantity":1,"cost":5.69}},
      {{"product":"Shannon Baking Parchment 12M {SUBSTITUTION_MARKER}","quantity":1,"cost":1.20}},
      {{"product":"Sprite Zero Sugar Lemon-Lime Soft Drink 2L","quantity":1,"cost":3.50}}
    ]"#
    )
}

/// 会話を組み立てる
///
/// # Arguments
/// * `images` - "data:image/jpeg;base64,..." 形式のData URL
///
/// # Returns
/// [system, user(画像パート)] の2メッセージ
pub fn build_conversation<S: AsRef<str>>(images: &[S]) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(build_system_prompt()),
        ChatMessage::user_images(images.iter().map(|s| s.as_ref().to_string())),
    ]
}
