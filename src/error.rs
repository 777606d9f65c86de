use thiserror::Error;

/// API認証失敗を示すエラー文字列
pub const AUTH_FAILURE_MARKERS: &[&str] = &["401", "invalid_api_key", "Incorrect API key"];

#[derive(Error, Debug)]
pub enum TaggerError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("認証情報ファイルが見つかりません: {0}")]
    ConfigNotFound(String),

    #[error("認証情報ファイルに「{label}=」の行がありません: {path}")]
    KeyNotPresent { label: String, path: String },

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("Excel読み込みエラー: {0}")]
    Load(String),

    #[error("列「{column}」が見つかりません（存在する列: {}）", .found.join(", "))]
    Schema { column: String, found: Vec<String> },

    #[error("Excel書き込みエラー: {0}")]
    Write(String),

    #[error("APIクライアント初期化エラー: {0}")]
    ClientInit(String),

    #[error("API呼び出しエラー: {0}")]
    ClassifierApi(String),

    #[error("{row}行目で処理を中断しました（企業名: {company}）: {source}")]
    RowFailed {
        row: usize,
        company: String,
        source: Box<TaggerError>,
    },

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl TaggerError {
    /// エラー文字列に認証失敗の目印が含まれるか
    ///
    /// 行エラーは行番号や企業名を含むため、元のエラーだけで判定する
    pub fn is_auth_failure(&self) -> bool {
        match self {
            TaggerError::RowFailed { source, .. } => source.is_auth_failure(),
            _ => {
                let text = self.to_string();
                AUTH_FAILURE_MARKERS.iter().any(|marker| text.contains(marker))
            }
        }
    }

    /// 行処理前に検出されるエラーか（この場合APIは一度も呼ばれていない）
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            TaggerError::Config(_)
                | TaggerError::ConfigNotFound(_)
                | TaggerError::KeyNotPresent { .. }
                | TaggerError::FileNotFound(_)
                | TaggerError::Load(_)
                | TaggerError::Schema { .. }
                | TaggerError::ClientInit(_)
        )
    }

    /// 利用者向けの対処方法
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            TaggerError::FileNotFound(_) => {
                Some("入力ファイルのパスを確認してください。")
            }
            TaggerError::ConfigNotFound(_) | TaggerError::KeyNotPresent { .. } => Some(
                "認証情報ファイルに `OpenAI API Key=<APIキー>` の形式で有効なキーを記載するか、--secrets で場所を指定してください。",
            ),
            TaggerError::Load(_) => {
                Some("有効なExcelファイルであり、破損していないことを確認してください。")
            }
            TaggerError::Schema { .. } => {
                Some("企業名の列名は --column で指定できます。")
            }
            TaggerError::Write(_) => {
                Some("出力先の書き込み権限とディスクの空き容量を確認してください。")
            }
            _ if self.is_auth_failure() => Some(AUTH_GUIDANCE),
            _ => None,
        }
    }
}

/// APIキー無効時の案内
pub const AUTH_GUIDANCE: &str = "APIキーが無効または期限切れです。\
https://platform.openai.com/account/api-keys で有効なキーを発行し、認証情報ファイルを更新してください。";

pub type Result<T> = std::result::Result<T, TaggerError>;
