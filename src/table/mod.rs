//! 表データモジュール
//!
//! Excelの1シートを「見出し行 + データ行」として保持する。
//! 読み込みは calamine、書き出しは rust_xlsxwriter。

mod reader;
mod writer;

use crate::error::{Result, TaggerError};
use std::path::Path;

/// セル値
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Excelのシリアル日時
    DateTime(f64),
}

impl CellValue {
    /// 空白以外の文字列表現（前後の空白は除去）
    pub fn as_text(&self) -> Option<String> {
        let text = match self {
            CellValue::Empty => return None,
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) | CellValue::DateTime(n) => {
                if n.is_nan() {
                    return None;
                }
                n.to_string()
            }
            CellValue::Bool(b) => b.to_string(),
        };

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// シート1枚分の表
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    sheet_name: String,
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// 行の長さは見出しの数に揃える
    pub fn new(sheet_name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();

        Self {
            sheet_name: sheet_name.into(),
            headers,
            rows,
        }
    }

    /// Excelファイルを読み込み
    ///
    /// `sheet` 省略時は先頭シート
    pub fn load(path: &Path, sheet: Option<&str>) -> Result<Self> {
        if !path.exists() {
            return Err(TaggerError::FileNotFound(path.display().to_string()));
        }
        reader::read_table(path, sheet)
    }

    /// 新しいxlsxファイルに書き出し（入力ファイルへの上書きは拒否）
    pub fn save(&self, path: &Path, input: &Path) -> Result<()> {
        if is_same_file(path, input) {
            return Err(TaggerError::Write(format!(
                "出力先が入力ファイルと同じです: {}",
                path.display()
            )));
        }
        writer::write_table(self, path)
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// 必須列の位置を取得（無ければ存在する列を列挙したエラー）
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| TaggerError::Schema {
            column: name.to_string(),
            found: self.headers.clone(),
        })
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// 空白でないセルの文字列
    pub fn text_at(&self, row: usize, column: usize) -> Option<String> {
        self.cell(row, column).and_then(CellValue::as_text)
    }

    /// 列の値を設定
    ///
    /// 同名の列があれば上書きして `true`、無ければ末尾に追加して `false`
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<bool> {
        if values.len() != self.rows.len() {
            return Err(TaggerError::Write(format!(
                "列「{}」の値の数({})が行数({})と一致しません",
                name,
                values.len(),
                self.rows.len()
            )));
        }

        let existing = self.column_index(name);
        let column = match existing {
            Some(idx) => idx,
            None => {
                self.headers.push(name.to_string());
                for row in &mut self.rows {
                    row.push(CellValue::Empty);
                }
                self.headers.len() - 1
            }
        };

        for (row, value) in self.rows.iter_mut().zip(values) {
            row[column] = CellValue::Text(value);
        }

        Ok(existing.is_some())
    }
}

/// 2つのパスが同じファイルを指すか
pub(crate) fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
