// ==========================================
// Courtier CRM - 导入管道数据模型
// ==========================================
// 流向: 字节 → RawRow → ResolvedRow → NewClientRecord → ClientRecord → ImportSummary
// RawRow / ResolvedRow 按行创建、用完即弃
// ==========================================

use crate::domain::client::ClientRecord;
use crate::domain::types::TargetField;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// CellValue - 原始单元格值
// ==========================================
// CSV 单元格始终为 Text；电子表格数值单元格为 Number，日期单元格为 Date
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl CellValue {
    /// 空单元格或仅含空白的文本
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) | CellValue::Date(_) => false,
        }
    }
}

// ==========================================
// RawRow - 解码后的一行
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 源文件中的行号（1 起，表头为第 1 行）
    pub line: usize,
    /// (原始列名, 值)，保持文件列序
    pub cells: Vec<(String, CellValue)>,
}

impl RawRow {
    pub fn new(line: usize, cells: Vec<(String, CellValue)>) -> Self {
        Self { line, cells }
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, v)| v.is_blank())
    }

    /// 按原始列名精确查找
    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v)
    }
}

// ==========================================
// FieldValue - 字段三态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// 没有任何列名命中该字段的别名
    Absent,
    /// 列存在但值为空
    Empty,
    Present(&'a CellValue),
}

impl<'a> FieldValue<'a> {
    pub fn is_missing(&self) -> bool {
        !matches!(self, FieldValue::Present(_))
    }

    pub fn value(&self) -> Option<&'a CellValue> {
        match self {
            FieldValue::Present(v) => Some(v),
            _ => None,
        }
    }
}

// ==========================================
// ResolvedRow - 列名解析后的一行
// ==========================================
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedRow {
    pub line: usize,
    fields: BTreeMap<TargetField, CellValue>,
}

impl ResolvedRow {
    pub fn new(line: usize) -> Self {
        Self {
            line,
            fields: BTreeMap::new(),
        }
    }

    /// 写入字段；已解析的字段不会被后续列覆盖（首个命中优先）
    ///
    /// 返回是否写入
    pub fn insert_first(&mut self, field: TargetField, value: CellValue) -> bool {
        if self.fields.contains_key(&field) {
            return false;
        }
        self.fields.insert(field, value);
        true
    }

    pub fn get(&self, field: TargetField) -> FieldValue<'_> {
        match self.fields.get(&field) {
            None => FieldValue::Absent,
            Some(v) if v.is_blank() => FieldValue::Empty,
            Some(v) => FieldValue::Present(v),
        }
    }

    pub fn is_resolved(&self, field: TargetField) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn resolved_fields(&self) -> impl Iterator<Item = TargetField> + '_ {
        self.fields.keys().copied()
    }
}

// ==========================================
// ImportRowError - 行级错误
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRowError {
    /// 源文件行号（表头 = 1，首个数据行 = 2）
    pub line: usize,
    pub reason: String,
}

// ==========================================
// ImportSummary - 导入汇总
// ==========================================
// 不变式: imported_count + error_count == 数据行数
//         created_records.len() == imported_count
//         errors.len() == error_count
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub imported_count: usize,
    pub error_count: usize,
    pub created_records: Vec<ClientRecord>,
    pub errors: Vec<ImportRowError>,
}

impl ImportSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, record: ClientRecord) {
        self.created_records.push(record);
        self.imported_count = self.created_records.len();
    }

    pub fn record_failure(&mut self, line: usize, reason: impl Into<String>) {
        self.errors.push(ImportRowError {
            line,
            reason: reason.into(),
        });
        self.error_count = self.errors.len();
    }

    /// 已处理的数据行数
    pub fn total_rows(&self) -> usize {
        self.imported_count + self.error_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_blankness() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::Text("   ".to_string()).is_blank());
        assert!(!CellValue::Text(" x ".to_string()).is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
    }

    #[test]
    fn test_resolved_row_tri_state() {
        let mut row = ResolvedRow::new(2);
        row.insert_first(TargetField::Email, CellValue::Text("  ".to_string()));
        row.insert_first(TargetField::LastName, CellValue::Text("Dupont".to_string()));

        assert_eq!(row.get(TargetField::Phone), FieldValue::Absent);
        assert_eq!(row.get(TargetField::Email), FieldValue::Empty);
        assert_eq!(
            row.get(TargetField::LastName).value(),
            Some(&CellValue::Text("Dupont".to_string()))
        );
        assert!(row.get(TargetField::Email).is_missing());
        assert!(row.is_resolved(TargetField::Email));
    }

    #[test]
    fn test_resolved_row_first_match_wins() {
        let mut row = ResolvedRow::new(2);
        assert!(row.insert_first(TargetField::Phone, CellValue::Text("01".to_string())));
        assert!(!row.insert_first(TargetField::Phone, CellValue::Text("02".to_string())));
        assert_eq!(
            row.get(TargetField::Phone).value(),
            Some(&CellValue::Text("01".to_string()))
        );
    }

    #[test]
    fn test_summary_counts_follow_entries() {
        let mut summary = ImportSummary::new();
        summary.record_failure(3, "email manquant");
        summary.record_failure(5, "nom manquant");

        assert_eq!(summary.error_count, 2);
        assert_eq!(summary.imported_count, 0);
        assert_eq!(summary.total_rows(), 2);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["errorCount"], 2);
        assert_eq!(json["errors"][0]["line"], 3);
        assert_eq!(json["errors"][0]["reason"], "email manquant");
    }
}
