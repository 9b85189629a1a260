//! 画像 → 明細JSON の一連の処理テスト
//!
//! 固定応答バックエンドで、ネットワークなしにパイプライン全体を検証

use receipt_ai_common::{normalize, NormalizationOutcome, ReceiptLineItem};
use receipt_ai_rust::analyzer::{self, canned_envelope, CannedBackend};
use receipt_ai_rust::scanner;
use std::io::Cursor;
use tempfile::tempdir;

const MODEL: &str = "anthropic/claude-3.5-sonnet";

fn write_png(path: &std::path::Path) {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(16, 32));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png).unwrap();
    std::fs::write(path, buffer).unwrap();
}

/// 固定応答は29行に正規化される
#[test]
fn test_canned_reply_has_29_items() {
    let outcome = normalize(&canned_envelope());
    let items = outcome.items().expect("正規化失敗");

    assert_eq!(items.len(), 29);
    assert_eq!(items[0].product, "Tesco Irish Chicken Breast Fillets 500G");
    assert_eq!(items[0].quantity, 1.0);
    assert_eq!(items[0].cost, 5.69);
}

/// 成功payloadの先頭行はJSONとして整数の数量を持つ
#[test]
fn test_canned_payload_first_item_json() {
    let payload = normalize(&canned_envelope()).into_result().expect("正規化失敗");
    let value: serde_json::Value = serde_json::from_str(&payload).unwrap();

    assert_eq!(
        value[0],
        serde_json::json!({
            "product": "Tesco Irish Chicken Breast Fillets 500G",
            "quantity": 1,
            "cost": 5.69
        })
    );
}

/// 同じ応答を2回正規化しても結果は同じ
#[test]
fn test_normalize_twice_is_identical() {
    let envelope = canned_envelope();
    assert_eq!(normalize(&envelope), normalize(&envelope));
}

/// フォルダ内の画像から明細まで
#[tokio::test]
async fn test_folder_to_items_with_canned_backend() {
    let dir = tempdir().expect("Failed to create temp dir");
    write_png(&dir.path().join("page1.png"));
    write_png(&dir.path().join("page2.png"));

    let images = scanner::collect_images(&[dir.path().to_path_buf()]).unwrap();
    assert_eq!(images.len(), 2);

    let data_urls: Vec<String> = images
        .iter()
        .map(|img| scanner::encode_data_url(&img.path, 1568))
        .collect::<Result<_, _>>()
        .unwrap();

    let outcome = analyzer::convert_receipt(&CannedBackend::new(), MODEL, &data_urls).await;
    assert!(outcome.is_success());
    assert_eq!(outcome.items().unwrap().len(), 29);
}

/// 説明文付きの応答も配列部分だけ取り出せる
#[tokio::test]
async fn test_commentary_wrapped_reply() {
    let backend = CannedBackend::with_content(
        "Here is the receipt data you asked for:\n\
         [{\"product\":\"Shannon Baking Parchment 12M [SUB]\",\"quantity\":1,\"cost\":1.20}]\n\
         I skipped the Unavailable section.",
    );

    let outcome = analyzer::convert_receipt(&backend, MODEL, &["data:image/jpeg;base64,AAAA"]).await;
    let items = outcome.items().unwrap();

    assert_eq!(items, vec![ReceiptLineItem::new("Shannon Baking Parchment 12M [SUB]", 1.0, 1.2)]);
    assert!(items[0].is_substitution());
    assert_eq!(items[0].base_product(), "Shannon Baking Parchment 12M");
}

/// 本文にJSONがなければ失敗
#[tokio::test]
async fn test_reply_without_array_fails() {
    let backend = CannedBackend::with_content("Sorry, I can't read this image.");
    let outcome = analyzer::convert_receipt(&backend, MODEL, &["data:image/jpeg;base64,AAAA"]).await;

    assert!(matches!(outcome, NormalizationOutcome::Failure(_)));
}

/// choicesが空のエンベロープは失敗
#[tokio::test]
async fn test_empty_choices_fails() {
    let backend = CannedBackend::with_envelope(serde_json::json!({ "id": "gen-x", "choices": [] }));
    let outcome = analyzer::convert_receipt(&backend, MODEL, &["data:image/jpeg;base64,AAAA"]).await;

    match outcome {
        NormalizationOutcome::Failure(msg) => assert!(msg.contains("gen-x")),
        other => panic!("Expected Failure, got {:?}", other),
    }
}
