use clap::{Parser, Subcommand};
use crate::ai_provider::AiProvider;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "receipt-ai")]
#[command(about = "レシート写真AI解析・購入明細抽出ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// AIプロバイダ (openrouter/canned)
    #[arg(long, default_value = "openrouter", global = true)]
    pub ai_provider: AiProvider,
}

#[derive(Subcommand)]
pub enum Commands {
    /// レシート画像から明細JSONを抽出
    Extract {
        /// 画像ファイルまたはフォルダ（複数ページは指定順に送信）
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// 出力JSONファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// モデルID（省略時は設定値）
        #[arg(short, long)]
        model: Option<String>,
    },

    /// HTTPサーバを起動
    Serve {
        /// 待ち受けポート（省略時は設定値）
        #[arg(short, long)]
        port: Option<u16>,

        /// 待ち受けアドレス
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// モデルID（省略時は設定値）
        #[arg(short, long)]
        model: Option<String>,
    },

    /// 保存済みのモデル応答を正規化
    Normalize {
        /// 応答エンベロープJSON（--text 指定時は本文テキスト）
        #[arg(required = true)]
        input: PathBuf,

        /// 入力をエンベロープではなく本文テキストとして扱う
        #[arg(long)]
        text: bool,

        /// 出力ファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 既定のモデルを設定
        #[arg(long)]
        set_model: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_extract() {
        let cli = Cli::parse_from([
            "receipt-ai", "--ai-provider", "canned", "extract", "page1.jpg", "page2.jpg", "-o", "items.json",
        ]);
        assert_eq!(cli.ai_provider, AiProvider::Canned);
        match cli.command {
            Commands::Extract { inputs, output, model } => {
                assert_eq!(inputs, vec![PathBuf::from("page1.jpg"), PathBuf::from("page2.jpg")]);
                assert_eq!(output, Some(PathBuf::from("items.json")));
                assert!(model.is_none());
            }
            _ => panic!("Expected Extract"),
        }
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::parse_from(["receipt-ai", "serve"]);
        assert_eq!(cli.ai_provider, AiProvider::OpenRouter);
        match cli.command {
            Commands::Serve { port, host, model } => {
                assert!(port.is_none());
                assert_eq!(host, "127.0.0.1");
                assert!(model.is_none());
            }
            _ => panic!("Expected Serve"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["receipt-ai", "normalize", "reply.json", "--text", "-v", "--ai-provider", "live"]);
        assert!(cli.verbose);
        assert_eq!(cli.ai_provider, AiProvider::OpenRouter);
        assert!(matches!(cli.command, Commands::Normalize { text: true, .. }));
    }
}
