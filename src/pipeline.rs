//! 一括処理ドライバ
//!
//! 1. 事前確認: 入力ファイル → APIキー → APIクライアント → Excel読み込み・列確認
//! 2. 行ごとの分類（1行ずつ順番に。企業名が空の行はAPIを呼ばない）
//! 3. 全行成功後に業種列を追加して別ファイルへ保存し、件数を集計
//!
//! API呼び出しが1件でも失敗したら即中断し、何も出力しない。

use crate::classifier::{fallback_warning, CompletionClient, IndustryClassifier};
use crate::cli::Cli;
use crate::config::Config;
use crate::credentials::{self, SECRETS_FILE_NAME};
use crate::error::{Result, TaggerError, AUTH_GUIDANCE};
use crate::table::{self, Table};
use industry_tagger_common::{Vocabulary, UNKNOWN_LABEL};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

/// 1回の実行に必要な設定一式
#[derive(Debug, Clone)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
    pub secrets: PathBuf,
    pub sheet: Option<String>,
    pub dry_run: bool,
    pub config: Config,
}

impl Job {
    /// 入力ファイルを基準に既定の出力先・認証情報ファイルを決める
    pub fn new(input: PathBuf, config: Config) -> Self {
        let output = default_output_path(&input);
        let secrets = config
            .secrets_path
            .clone()
            .unwrap_or_else(|| default_secrets_path(&input));

        Self {
            input,
            output,
            secrets,
            sheet: None,
            dry_run: false,
            config,
        }
    }

    pub fn from_cli(cli: &Cli, config: Config) -> Self {
        let mut job = Self::new(cli.input.clone(), config);
        if let Some(output) = &cli.output {
            job.output = output.clone();
        }
        job.sheet = cli.sheet.clone();
        job.dry_run = cli.dry_run;
        job
    }
}

/// `<入力名> updated.xlsx`（入力と同じフォルダ）
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    parent_dir(input).join(format!("{} updated.xlsx", stem))
}

/// 入力フォルダの親にある secrets.md
pub fn default_secrets_path(input: &Path) -> PathBuf {
    parent_dir(input).join("..").join(SECRETS_FILE_NAME)
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// 実行結果
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub rows: usize,
    /// 行順に並んだ分類結果（ドライラン時は空）
    pub labels: Vec<String>,
    /// 業種ごとの件数（件数の多い順）
    pub summary: Vec<(String, usize)>,
    /// 保存先（ドライラン時は None）
    pub output: Option<PathBuf>,
    /// 既存の業種列を上書きしたか
    pub replaced_column: bool,
}

/// 一括処理を実行
///
/// `connect` はAPIキーからクライアントを作る。認証情報の読み込みに失敗した場合は呼ばれない。
pub async fn run<C, F>(job: &Job, connect: F) -> Result<RunReport>
where
    C: CompletionClient,
    F: FnOnce(&str, &Config) -> Result<C>,
{
    let config = &job.config;

    // 事前確認
    if !job.input.exists() {
        return Err(TaggerError::FileNotFound(job.input.display().to_string()));
    }
    if table::is_same_file(&job.output, &job.input) {
        return Err(TaggerError::Write(format!(
            "出力先が入力ファイルと同じです: {}",
            job.output.display()
        )));
    }

    let api_key = credentials::load_api_key(&job.secrets, &config.key_label)?;
    println!("✔ APIキーを取得しました");

    let client = connect(&api_key, config)?;
    println!("✔ APIクライアントを初期化しました");

    println!("\nExcelファイルを読み込み中: {}", job.input.display());
    let mut table = Table::load(&job.input, job.sheet.as_deref())?;
    println!("✔ {}行を読み込みました", table.len());

    let name_column = table.require_column(&config.name_column)?;

    let replaced_column = table.column_index(&config.industry_column).is_some();
    if replaced_column {
        println!(
            "⚠ 列「{}」は既に存在します。上書きします。",
            config.industry_column
        );
    }

    if job.dry_run {
        let blank = (0..table.len())
            .filter(|&row| table.text_at(row, name_column).is_none())
            .count();
        println!(
            "\nドライラン: {}行（企業名なし {}行）を分類予定。出力先: {}",
            table.len(),
            blank,
            job.output.display()
        );
        return Ok(RunReport {
            rows: table.len(),
            labels: Vec::new(),
            summary: Vec::new(),
            output: None,
            replaced_column,
        });
    }

    // 行ごとの分類
    let classifier = IndustryClassifier::new(client, Vocabulary::industries(), config);
    let labels = classify_rows(&table, name_column, &classifier).await?;

    // 保存
    table.set_column(&config.industry_column, labels.clone())?;
    println!("\n結果を保存中: {}", job.output.display());
    table.save(&job.output, &job.input)?;
    println!("✔ {}行の業種分類を保存しました", table.len());

    let summary = summarize(&labels);
    print_summary(&summary);

    Ok(RunReport {
        rows: table.len(),
        labels,
        summary,
        output: Some(job.output.clone()),
        replaced_column,
    })
}

/// 全行を順番に分類
///
/// 企業名が空の行は UNKNOWN_LABEL。API呼び出しの失敗で即中断。
pub async fn classify_rows<C: CompletionClient>(
    table: &Table,
    name_column: usize,
    classifier: &IndustryClassifier<C>,
) -> Result<Vec<String>> {
    let total = table.len();
    println!("\n{}社を処理中...", total);
    println!("{}", "-".repeat(60));

    let mut labels = Vec::with_capacity(total);

    for row in 0..total {
        let row_number = row + 1;

        let Some(company) = table.text_at(row, name_column) else {
            println!("Row {}/{}: 企業名が空のためスキップ", row_number, total);
            labels.push(UNKNOWN_LABEL.to_string());
            continue;
        };

        print!("Row {}/{}: '{}' を処理中... ", row_number, total, company);
        std::io::stdout().flush().ok();

        match classifier.classify(&company).await {
            Ok(resolution) => {
                println!("→ {}", resolution.label);
                if let Some(warning) = fallback_warning(&resolution) {
                    println!("  {}", warning);
                }
                labels.push(resolution.label);
            }
            Err(err) => {
                report_row_failure(row_number, &company, &err);
                return Err(TaggerError::RowFailed {
                    row: row_number,
                    company,
                    source: Box::new(err),
                });
            }
        }
    }

    Ok(labels)
}

fn report_row_failure(row_number: usize, company: &str, err: &TaggerError) {
    println!();
    eprintln!("エラー: {}行目: {}", row_number, err);
    eprintln!("企業名: {}", company);
    if err.is_auth_failure() {
        eprintln!("\n⚠ {}", AUTH_GUIDANCE);
    }
}

/// 業種ごとの件数（件数の多い順、同数は名前順）
pub fn summarize(labels: &[String]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label.as_str()).or_insert(0) += 1;
    }

    let mut summary: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect();
    summary.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    summary
}

fn print_summary(summary: &[(String, usize)]) {
    println!("\n集計:");
    let width = summary.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, count) in summary {
        println!("  {:<width$}  {:>5}", label, count, width = width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/data/Corporate accounts 2026.xlsx")),
            PathBuf::from("/data/Corporate accounts 2026 updated.xlsx")
        );
        assert_eq!(
            default_output_path(Path::new("accounts.xlsx")),
            PathBuf::from("./accounts updated.xlsx")
        );
    }

    #[test]
    fn test_default_secrets_path() {
        assert_eq!(
            default_secrets_path(Path::new("/work/tagging/accounts.xlsx")),
            PathBuf::from("/work/tagging/../secrets.md")
        );
        assert_eq!(
            default_secrets_path(Path::new("accounts.xlsx")),
            PathBuf::from("./../secrets.md")
        );
    }

    #[test]
    fn test_job_prefers_configured_secrets() {
        let config = Config {
            secrets_path: Some(PathBuf::from("/etc/keys.md")),
            ..Config::default()
        };
        let job = Job::new(PathBuf::from("/data/a.xlsx"), config);
        assert_eq!(job.secrets, PathBuf::from("/etc/keys.md"));
        assert_eq!(job.output, PathBuf::from("/data/a updated.xlsx"));
        assert!(!job.dry_run);
    }

    #[test]
    fn test_summarize_orders_by_count() {
        let labels: Vec<String> = ["FSI", "Retail", "Unknown", "Retail", "FSI", "Retail", "Aviation"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let summary = summarize(&labels);
        assert_eq!(
            summary,
            vec![
                ("Retail".to_string(), 3),
                ("FSI".to_string(), 2),
                ("Aviation".to_string(), 1),
                ("Unknown".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_summarize_empty() {
        assert!(summarize(&[]).is_empty());
    }
}
