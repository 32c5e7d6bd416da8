// ==========================================
// 上传对账系统 - 命令行入口
// ==========================================
// 用法:
//   upload-reconcile validate <FILE>... [--api-url URL] [--pretty]
//   upload-reconcile inspect <FILE>
// 配置: 环境变量或 .env（NETWORK_API_URL / LEDGER_*），--api-url 优先
// ==========================================

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use upload_reconcile::api::TableApi;
use upload_reconcile::config::{config_keys, ConfigSource, EnvConfigSource};
use upload_reconcile::{logging, LedgerConfig, ValidationApi};

/// Publisher upload reconciliation against the network order ledger
#[derive(Parser, Debug)]
#[command(name = "upload-reconcile", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate upload files and print the reports as JSON
    Validate {
        /// Upload files (.csv, .xlsx, .xls)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Order ledger endpoint
        #[arg(long, env = "NETWORK_API_URL")]
        api_url: Option<String>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Show detected header row and projected records (no ledger access)
    Inspect {
        file: PathBuf,

        #[arg(long)]
        pretty: bool,
    },
}

/// 命令行参数覆盖环境变量
struct CliConfigSource {
    api_url: Option<String>,
}

impl ConfigSource for CliConfigSource {
    fn get(&self, key: &str) -> Option<String> {
        match (key, &self.api_url) {
            (config_keys::NETWORK_API_URL, Some(url)) => Some(url.clone()),
            _ => EnvConfigSource.get(key),
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", text);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init();

    let cli = Cli::parse();
    tracing::info!(version = upload_reconcile::VERSION, "{}", upload_reconcile::APP_NAME);

    match cli.command {
        Commands::Validate {
            files,
            api_url,
            pretty,
        } => {
            let config = LedgerConfig::from_source(&CliConfigSource { api_url })
                .context("账本配置加载失败")?;
            let api = ValidationApi::from_config(&config).context("账本客户端初始化失败")?;

            let mut failed = 0;
            for item in api.validate_batch(&files).await {
                match item.result {
                    Ok(report) => print_json(&report, pretty)?,
                    Err(e) => {
                        failed += 1;
                        eprintln!("{}: [{}] {}", item.path.display(), e.kind(), e);
                    }
                }
            }

            if failed > 0 {
                bail!("{} / {} 个文件校验失败", failed, files.len());
            }
        }
        Commands::Inspect { file, pretty } => {
            let preview = TableApi::new()
                .inspect(&file)
                .with_context(|| format!("无法读取 {}", file.display()))?;
            print_json(&preview, pretty)?;
        }
    }

    Ok(())
}
