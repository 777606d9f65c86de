use crate::cli::Cli;
use crate::error::{Result, TaggerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
    /// 認証情報ファイルの行を識別するラベル（`<label>=<key>`）
    pub key_label: String,
    pub name_column: String,
    pub industry_column: String,
    pub secrets_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".into(),
            base_url: "https://api.openai.com/v1".into(),
            temperature: 0.3, // 分類なので低め
            max_tokens: 20,   // 業種名1つ分
            timeout_seconds: 60,
            key_label: "OpenAI API Key".into(),
            name_column: "Sales Group Name".into(),
            industry_column: "Industry".into(),
            secrets_path: None,
        }
    }
}

impl Config {
    /// 既定の設定ファイルを読み込み（無ければ既定値）
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| TaggerError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home
            .join(".config")
            .join("industry-tagger")
            .join("config.json"))
    }

    /// コマンドライン指定で上書き
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(model) = &cli.model {
            self.model = model.clone();
        }
        if let Some(label) = &cli.key_label {
            self.key_label = label.clone();
        }
        if let Some(column) = &cli.column {
            self.name_column = column.clone();
        }
        if let Some(column) = &cli.industry_column {
            self.industry_column = column.clone();
        }
        if let Some(path) = &cli.secrets {
            self.secrets_path = Some(path.clone());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(TaggerError::Config("model が空です".into()));
        }
        if self.key_label.trim().is_empty() {
            return Err(TaggerError::Config("key_label が空です".into()));
        }
        if self.name_column == self.industry_column {
            return Err(TaggerError::Config(format!(
                "企業名の列と業種の列が同じです: {}",
                self.name_column
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(TaggerError::Config(
                "timeout_seconds は1以上にしてください".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(TaggerError::Config(format!(
                "temperature は0.0〜2.0の範囲で指定してください: {}",
                self.temperature
            )));
        }
        Ok(())
    }
}
