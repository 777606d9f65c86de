//! 認証情報ファイルからのAPIキー読み込み
//!
//! ファイルは `<ラベル>=<キー>` 形式の行を含むプレーンテキスト。

use crate::error::{Result, TaggerError};
use std::path::Path;

pub const SECRETS_FILE_NAME: &str = "secrets.md";

/// 認証情報ファイルからAPIキーを取得
pub fn load_api_key(path: &Path, key_label: &str) -> Result<String> {
    if !path.exists() {
        return Err(TaggerError::ConfigNotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;

    extract_key(&content, key_label).ok_or_else(|| TaggerError::KeyNotPresent {
        label: key_label.to_string(),
        path: path.display().to_string(),
    })
}

/// `<ラベル>=` を含む最初の行から、最初の `=` 以降を取り出す
///
/// 値が空の場合は None
pub fn extract_key(content: &str, key_label: &str) -> Option<String> {
    let marker = format!("{}=", key_label);

    content
        .lines()
        .find(|line| line.contains(&marker))
        .and_then(|line| line.split_once('='))
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
