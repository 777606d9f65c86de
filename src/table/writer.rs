//! Excel生成（rust_xlsxwriter）

use super::{CellValue, Table};
use crate::error::{Result, TaggerError};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::path::Path;

const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

pub(super) fn write_table(table: &Table, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    let header_format = Format::new().set_bold();
    let datetime_format = Format::new().set_num_format(DATETIME_FORMAT);

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(table.sheet_name())
        .map_err(|e| write_error("シート名設定エラー", e))?;

    for (col, header) in table.headers().iter().enumerate() {
        worksheet
            .write_string_with_format(0, column_number(col)?, header, &header_format)
            .map_err(|e| write_error("見出し書き込みエラー", e))?;
    }

    for (idx, row) in table.rows().iter().enumerate() {
        // 0行目は見出し
        let row_number = u32::try_from(idx + 1)
            .map_err(|_| TaggerError::Write(format!("行数が多すぎます: {}", idx + 1)))?;

        for (col, cell) in row.iter().enumerate() {
            let col = column_number(col)?;
            match cell {
                CellValue::Empty => {}
                CellValue::Text(s) => {
                    worksheet
                        .write_string(row_number, col, s)
                        .map_err(|e| write_error("値書き込みエラー", e))?;
                }
                CellValue::Number(n) => {
                    worksheet
                        .write_number(row_number, col, *n)
                        .map_err(|e| write_error("値書き込みエラー", e))?;
                }
                CellValue::Bool(b) => {
                    worksheet
                        .write_boolean(row_number, col, *b)
                        .map_err(|e| write_error("値書き込みエラー", e))?;
                }
                CellValue::DateTime(serial) => {
                    worksheet
                        .write_number_with_format(row_number, col, *serial, &datetime_format)
                        .map_err(|e| write_error("日時書き込みエラー", e))?;
                }
            }
        }
    }

    workbook
        .save(path)
        .map_err(|e| write_error(&format!("保存エラー ({})", path.display()), e))
}

fn column_number(col: usize) -> Result<u16> {
    u16::try_from(col).map_err(|_| TaggerError::Write(format!("列数が多すぎます: {}", col + 1)))
}

fn write_error(context: &str, err: XlsxError) -> TaggerError {
    TaggerError::Write(format!("{}: {}", context, err))
}
