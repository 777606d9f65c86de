use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "industry-tag")]
#[command(about = "企業名の業種をAIで分類しExcelに追記するツール", long_about = None)]
pub struct Cli {
    /// 入力Excelファイル
    #[arg(required = true)]
    pub input: PathBuf,

    /// 出力Excelファイル（デフォルト: 入力と同じフォルダの「<名前> updated.xlsx」）
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// APIキーを記載した認証情報ファイル（デフォルト: 入力フォルダの親の secrets.md）
    #[arg(long)]
    pub secrets: Option<PathBuf>,

    /// 認証情報ファイル内のキーのラベル
    #[arg(long)]
    pub key_label: Option<String>,

    /// 企業名の列名
    #[arg(long)]
    pub column: Option<String>,

    /// 業種を書き込む列名
    #[arg(long)]
    pub industry_column: Option<String>,

    /// 読み込むシート名（省略時は先頭シート）
    #[arg(long)]
    pub sheet: Option<String>,

    /// 使用するモデル
    #[arg(long)]
    pub model: Option<String>,

    /// 設定ファイル（デフォルト: ~/.config/industry-tagger/config.json）
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// 入力と認証情報の確認のみ行う（APIは呼ばない）
    #[arg(long)]
    pub dry_run: bool,

    /// 詳細ログを出力
    #[arg(short, long)]
    pub verbose: bool,
}
