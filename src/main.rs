use clap::Parser;
use industry_tagger::{classifier, cli, config, error, pipeline};
use classifier::OpenAiClient;
use cli::Cli;
use config::Config;
use error::{Result, TaggerError};
use pipeline::Job;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    println!("🏷  industry-tag - 業種分類\n");

    match run(&cli).await {
        Ok(()) => {
            println!("\n✅ 処理完了");
            ExitCode::SUCCESS
        }
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => {
            if !path.exists() {
                return Err(TaggerError::Config(format!(
                    "設定ファイルが見つかりません: {}",
                    path.display()
                )));
            }
            Config::load_from(path)?
        }
        None => Config::load()?,
    };
    config.apply_cli(cli);
    config.validate()?;

    let job = Job::from_cli(cli, config);
    tracing::debug!(?job, "job prepared");

    let report = pipeline::run(&job, OpenAiClient::new).await?;

    if report.output.is_none() {
        println!("✔ 事前確認のみ完了しました（{}行）", report.rows);
    }
    Ok(())
}

fn report_error(err: &TaggerError) {
    match err {
        // 行エラーの詳細は処理中に表示済み
        TaggerError::RowFailed { .. } => {
            eprintln!("\n重大なエラーのため処理を中止しました。ファイルは出力していません。");
        }
        _ => {
            eprintln!("エラー: {}", err);
            if let Some(hint) = err.hint() {
                eprintln!("{}", hint);
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "industry_tagger=debug,warn"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
