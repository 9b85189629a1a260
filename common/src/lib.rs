//! Receipt AI Common Library
//!
//! CLIとHTTPサーバで共有される型・プロンプト・応答正規化

pub mod types;
pub mod message;
pub mod error;
pub mod prompts;
pub mod data_url;
pub mod parser;
pub mod conventions;

pub use types::{NormalizationOutcome, ReceiptLineItem};
pub use message::{ChatMessage, ContentPart, ImageUrl, MessageContent, Role};
pub use error::{Error, Result};
pub use prompts::{build_conversation, build_system_prompt, DEFAULT_MODEL, SUBSTITUTION_MARKER};
pub use data_url::{build_data_url, is_image_data_url, parse_data_url, DataUrl};
pub use parser::{
    extract_json_array, extract_line_items, normalize, normalize_reply_text, parse_line_items,
    reply_content, wrap_in_envelope,
};
pub use conventions::{check_conventions, ConventionIssue, ConventionWarning};
