use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReceiptAiError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`receipt-ai config --set-api-key YOUR_KEY` で設定するか OPENROUTER_API_KEY を指定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("APIがエラーを返しました (HTTP {status}): {body}")]
    ApiStatus { status: u16, body: String },

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("レシート変換エラー: {0}")]
    Normalization(String),

    #[error("サーバエラー: {0}")]
    Server(String),

    #[error(transparent)]
    Common(#[from] receipt_ai_common::Error),
}

impl ReceiptAiError {
    /// 送信側（ネットワーク/HTTP）の失敗かどうか
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ReceiptAiError::ApiCall(_) | ReceiptAiError::ApiStatus { .. } | ReceiptAiError::ApiParse(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ReceiptAiError>;
