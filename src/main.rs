use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use receipt_ai_common::{check_conventions, normalize, normalize_reply_text, ReceiptLineItem};
use receipt_ai_rust::{analyzer, cli, config, error, scanner, server};
use cli::{Cli, Commands};
use config::Config;
use error::{ReceiptAiError, Result};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);
    let config = Config::load()?;

    match cli.command {
        Commands::Extract { inputs, output, model } => {
            eprintln!("🧾 receipt-ai - レシート解析\n");

            // 1. 画像読み込み
            eprintln!("[1/3] レシート画像を読み込み中...");
            let images = scanner::collect_images(&inputs)?;
            if images.is_empty() {
                let names = inputs
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(ReceiptAiError::NoImagesFound(names));
            }

            let mut data_urls = Vec::with_capacity(images.len());
            for img in &images {
                if cli.verbose {
                    eprintln!("  - {}", img.file_name);
                }
                data_urls.push(scanner::encode_data_url(&img.path, config.max_image_size)?);
            }
            eprintln!("✔ {}枚の画像を検出\n", images.len());

            // 2. AI解析
            let backend = analyzer::build_backend(cli.ai_provider, &config)?;
            let model = model.unwrap_or_else(|| config.model.clone());
            eprintln!("[2/3] AI解析中... ({} / {})", backend.name(), model);

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("  {spinner} {msg} ({elapsed})")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.set_message("モデルの応答を待っています");
            spinner.enable_steady_tick(Duration::from_millis(120));

            let outcome = analyzer::convert_receipt(backend.as_ref(), &model, &data_urls).await;
            spinner.finish_and_clear();

            let payload = outcome.into_result().map_err(ReceiptAiError::Normalization)?;
            let items: Vec<ReceiptLineItem> = serde_json::from_str(&payload)?;
            eprintln!("✔ {}件の明細を抽出\n", items.len());

            // 3. 結果出力
            eprintln!("[3/3] 結果を出力中...");
            write_items(&items, output.as_deref())?;

            eprintln!("\n✅ 解析完了");
        }

        Commands::Serve { port, host, model } => {
            let backend = analyzer::build_backend(cli.ai_provider, &config)?;
            let model = model.unwrap_or_else(|| config.model.clone());
            let port = port.unwrap_or(config.port);

            let addr: SocketAddr = format!("{}:{}", host, port)
                .parse()
                .map_err(|e| ReceiptAiError::Config(format!("不正なアドレス {}:{}: {}", host, port, e)))?;

            println!("🚀 receipt-ai - サーバ起動 http://{} ({} / {})", addr, backend.name(), model);
            server::start_server(addr, server::AppState::new(backend, model)).await?;
        }

        Commands::Normalize { input, text, output } => {
            if !input.is_file() {
                return Err(ReceiptAiError::FileNotFound(input.display().to_string()));
            }
            let content = std::fs::read_to_string(&input)?;

            let outcome = if text {
                normalize_reply_text(&content)
            } else {
                let envelope: serde_json::Value = serde_json::from_str(&content)?;
                normalize(&envelope)
            };

            let payload = outcome.into_result().map_err(ReceiptAiError::Normalization)?;
            let items: Vec<ReceiptLineItem> = serde_json::from_str(&payload)?;
            eprintln!("✔ {}件の明細を抽出", items.len());
            report_conventions(&items);
            write_items(&items, output.as_deref())?;
        }

        Commands::Config { set_api_key, set_model, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if let Some(model) = set_model {
                config.set_model(model)?;
                println!("✔ モデルを設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  APIエンドポイント: {}", config.api_base);
                println!("  最大画像サイズ: {}px", config.max_image_size);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  ポート: {}", config.port);
                println!("  APIキー: {}", if config.get_api_key().is_ok() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}

/// ログ初期化（RUST_LOG 優先、--verbose で debug）
fn init_logging(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if matches!(cli.command, Commands::Serve { .. }) {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// 規約違反らしい行を表示（結果は変えない）
fn report_conventions(items: &[ReceiptLineItem]) {
    for warning in check_conventions(items) {
        eprintln!("  ⚠ {}", warning);
    }
}

fn write_items(items: &[ReceiptLineItem], output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(items)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            eprintln!("✔ 結果を保存: {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
