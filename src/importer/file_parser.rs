// ==========================================
// Courtier CRM - 表格解码器实现
// ==========================================
// 职责: 文件字节 → 有序 RawRow 序列
// 支持: CSV (.csv) / Excel (.xlsx/.xls，仅读取第一个工作表)
// 约定:
// - 第一行为表头
// - CSV 单元格一律为文本（UTF-8，非法字节按 Latin-1 解码）；工作簿数值单元格保留为数值、日期单元格为日期
// - 完全空白的行跳过，不计入数据行
// - 行号为行序号（表头 = 1），引号内换行不影响行号
// - 解码失败即整次导入失败（尚无法定位行号）
// ==========================================

use crate::domain::import::{CellValue, RawRow};
use crate::domain::types::FileFormat;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::client_importer_trait::FileParser;
use calamine::{Data, DataType, Range, Reader, Xls, Xlsx};
use csv::ReaderBuilder;
use std::io::{Cursor, Read, Seek};
use tracing::debug;

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_rows(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>> {
        // 文本文件中不应出现 NUL 字节
        if bytes.contains(&0u8) {
            return Err(ImportError::BinaryContent);
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(bytes);

        // 读取表头（保留原始拼写）
        let headers: Vec<String> = reader.byte_headers()?.iter().map(decode_field).collect();

        // 引号内换行不计入行号：行号 = 记录起始物理行 - 之前记录内嵌的换行数
        let mut embedded_newlines = 0usize;
        let mut rows = Vec::new();
        for (idx, result) in reader.byte_records().enumerate() {
            let record = result?;
            let line = record
                .position()
                .map(|p| p.line() as usize - embedded_newlines)
                .unwrap_or(idx + 2);
            embedded_newlines += record
                .iter()
                .map(|field| field.iter().filter(|&&b| b == b'\n').count())
                .sum::<usize>();

            let cells = headers
                .iter()
                .zip(record.iter())
                .filter(|(header, _)| !header.trim().is_empty())
                .map(|(header, value)| (header.clone(), CellValue::Text(decode_field(value))))
                .collect();

            let row = RawRow::new(line, cells);

            // 跳过完全空白的行
            if row.is_blank() {
                debug!(line, "跳过空白行");
                continue;
            }

            rows.push(row);
        }

        Ok(rows)
    }
}

/// 单元格字节解码：UTF-8 优先，否则按 Latin-1 (Excel 法语版 CSV 导出) 逐字节解码
fn decode_field(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser {
    format: FileFormat,
}

impl ExcelParser {
    pub fn xlsx() -> Self {
        Self {
            format: FileFormat::Xlsx,
        }
    }

    pub fn xls() -> Self {
        Self {
            format: FileFormat::Xls,
        }
    }
}

impl FileParser for ExcelParser {
    fn parse_to_raw_rows(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>> {
        let cursor = Cursor::new(bytes);

        let range = match self.format {
            FileFormat::Xlsx => {
                let workbook: Xlsx<_> = Xlsx::new(cursor)
                    .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;
                first_sheet_range(workbook)?
            }
            FileFormat::Xls => {
                let workbook: Xls<_> = Xls::new(cursor)
                    .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;
                first_sheet_range(workbook)?
            }
            FileFormat::Csv => return Err(ImportError::UnsupportedFormat("csv".to_string())),
        };

        rows_from_range(&range)
    }
}

/// 读取第一个工作表
fn first_sheet_range<RS, R>(mut workbook: R) -> ImportResult<Range<Data>>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: std::fmt::Display,
{
    match workbook.worksheet_range_at(0) {
        None => Err(ImportError::NoWorksheet),
        Some(Err(e)) => Err(ImportError::ExcelParseError(e.to_string())),
        Some(Ok(range)) => Ok(range),
    }
}

/// 工作表区域 → RawRow（区域首行为表头）
fn rows_from_range(range: &Range<Data>) -> ImportResult<Vec<RawRow>> {
    // 区域左上角在工作表中的绝对行号（0 起）
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

    let mut rows = range.rows();
    let header_row = match rows.next() {
        Some(row) => row,
        None => return Ok(Vec::new()), // 空工作表
    };

    let headers: Vec<String> = header_row.iter().map(header_text).collect();

    let mut records = Vec::new();
    for (idx, data_row) in rows.enumerate() {
        // 表头在 first_row + 1 行，数据行依次递增
        let line = first_row + idx + 2;

        let cells = headers
            .iter()
            .zip(data_row.iter())
            .filter(|(header, _)| !header.trim().is_empty())
            .map(|(header, cell)| (header.clone(), cell_value(cell)))
            .collect();

        let row = RawRow::new(line, cells);

        // 跳过完全空白的行
        if row.is_blank() {
            continue;
        }

        records.push(row);
    }

    Ok(records)
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 单元格 → CellValue（保留数值与日期类型）
pub(crate) fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(_) => cell.as_date().map(CellValue::Date).unwrap_or(CellValue::Empty),
        Data::DateTimeIso(s) => cell
            .as_date()
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => {
            debug!(error = ?e, "单元格错误值按空值处理");
            CellValue::Empty
        }
    }
}

// ==========================================
// 通用文件解析器（根据声明格式选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse(&self, bytes: &[u8], format: FileFormat) -> ImportResult<Vec<RawRow>> {
        match format {
            FileFormat::Csv => CsvParser.parse_to_raw_rows(bytes),
            FileFormat::Xlsx => ExcelParser::xlsx().parse_to_raw_rows(bytes),
            FileFormat::Xls => ExcelParser::xls().parse_to_raw_rows(bytes),
        }
    }
}
