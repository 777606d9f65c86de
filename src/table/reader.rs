//! Excel読み込み（calamine）
//!
//! xlsx / xlsm / xls / ods を拡張子から自動判別する

use super::{CellValue, Table};
use crate::error::{Result, TaggerError};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

pub(super) fn read_table(path: &Path, sheet: Option<&str>) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| TaggerError::Load(format!("{}: {}", path.display(), e)))?;

    let sheet_names = workbook.sheet_names();
    let sheet_name = match sheet {
        Some(name) if sheet_names.iter().any(|s| s == name) => name.to_string(),
        Some(name) => {
            return Err(TaggerError::Load(format!(
                "シート「{}」が見つかりません（存在するシート: {}）",
                name,
                sheet_names.join(", ")
            )));
        }
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| TaggerError::Load(format!("シートがありません: {}", path.display())))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| TaggerError::Load(format!("シート「{}」の読み込みに失敗: {}", sheet_name, e)))?;

    // 範囲は最初に値のあるセルから始まるため、A列からのずれを空列で埋める
    let start_col = range.start().map(|(_, col)| col as usize).unwrap_or(0);
    let mut rows = range.rows();

    // 先頭行を見出しとして扱う
    let headers: Vec<String> = match rows.next() {
        Some(row) => (0..start_col)
            .map(|idx| format!("Unnamed: {}", idx))
            .chain(
                row.iter()
                    .enumerate()
                    .map(|(idx, cell)| header_name(start_col + idx, cell)),
            )
            .collect(),
        None => Vec::new(),
    };

    let data = rows
        .map(|row| {
            std::iter::repeat(CellValue::Empty)
                .take(start_col)
                .chain(row.iter().map(CellValue::from))
                .collect()
        })
        .collect();

    Ok(Table::new(sheet_name, headers, data))
}

/// 見出しセルを列名に変換（空なら `Unnamed: <index>`）
///
/// 文字列の見出しは空白も含めてそのまま使う
fn header_name(idx: usize, cell: &Data) -> String {
    match cell {
        Data::String(s) if !s.is_empty() => s.clone(),
        other => CellValue::from(other)
            .as_text()
            .unwrap_or_else(|| format!("Unnamed: {}", idx)),
    }
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
            // #N/A などのエラー値は欠損扱い
            Data::Error(_) => CellValue::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_conversion() {
        assert_eq!(CellValue::from(&Data::Empty), CellValue::Empty);
        assert_eq!(CellValue::from(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(
            CellValue::from(&Data::String("Acme".into())),
            CellValue::Text("Acme".into())
        );
        assert_eq!(
            CellValue::from(&Data::Error(calamine::CellErrorType::NA)),
            CellValue::Empty
        );
    }

    /// A列が空のシートでも列位置がずれない
    #[test]
    fn test_leading_empty_column_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("offset.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 1, "Sales Group Name").unwrap();
        sheet.write_string(0, 2, "Region").unwrap();
        sheet.write_string(1, 1, "Acme Bank").unwrap();
        sheet.write_string(1, 2, "EMEA").unwrap();
        workbook.save(&path).unwrap();

        let table = read_table(&path, None).unwrap();
        assert_eq!(
            table.headers(),
            &["Unnamed: 0", "Sales Group Name", "Region"]
        );
        assert_eq!(table.column_index("Sales Group Name"), Some(1));
        assert_eq!(table.cell(0, 0), Some(&CellValue::Empty));
        assert_eq!(table.text_at(0, 1).as_deref(), Some("Acme Bank"));
        assert_eq!(table.text_at(0, 2).as_deref(), Some("EMEA"));
    }

    #[test]
    fn test_header_name_fallback() {
        assert_eq!(header_name(3, &Data::Empty), "Unnamed: 3");
        assert_eq!(header_name(0, &Data::String("Region ".into())), "Region ");
        assert_eq!(header_name(1, &Data::Float(2026.0)), "2026");
    }
}
