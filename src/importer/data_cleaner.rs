// ==========================================
// Courtier CRM - 数据清洗器实现
// ==========================================
// 职责: 单元格值强制转换 / TRIM / 枚举归一化
// 说明: CSV 与电子表格的单元格类型不同，这里统一处理两种来源
// ==========================================

use crate::domain::import::CellValue;
use crate::domain::types::{ClientStatus, FamilySituation};
use chrono::NaiveDate;

pub struct DataCleaner;

impl DataCleaner {
    /// 单元格 → 去空白文本（空值返回 None）
    ///
    /// 整数值的数字不带小数部分输出（电话号码、社保号常以数值形式存储）
    pub fn text(&self, value: &CellValue) -> Option<String> {
        let text = match value {
            CellValue::Empty => return None,
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// 可选文本字段: 缺失或空白 → None
    pub fn optional_text(&self, value: Option<&CellValue>) -> Option<String> {
        value.and_then(|v| self.text(v))
    }

    /// 出生日期: 仅接受 ISO 日历日期文本（YYYY-MM-DD）或工作簿日期单元格
    pub fn parse_iso_date(&self, value: &CellValue) -> Option<NaiveDate> {
        match value {
            CellValue::Date(d) => Some(*d),
            CellValue::Text(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok(),
            CellValue::Number(_) | CellValue::Empty => None,
        }
    }

    /// 受益人数: 非负整数；非数字或负数 → 0
    pub fn coerce_dependents(&self, value: Option<&CellValue>) -> u32 {
        let parsed = match value {
            Some(CellValue::Number(n)) if n.is_finite() => Some(n.trunc()),
            Some(CellValue::Text(s)) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<i64>()
                    .map(|i| i as f64)
                    .ok()
                    .or_else(|| trimmed.parse::<f64>().ok().filter(|f| f.is_finite()))
                    .map(f64::trunc)
            }
            _ => None,
        };

        match parsed {
            Some(n) if n >= 0.0 && n <= u32::MAX as f64 => n as u32,
            _ => 0,
        }
    }

    /// 家庭状况: 无法识别 → Single
    pub fn family_situation(&self, value: &CellValue) -> FamilySituation {
        self.text(value)
            .and_then(|s| FamilySituation::from_code(&fold_code(&s)))
            .unwrap_or_default()
    }

    /// 客户状态: 缺失或无法识别 → Prospect
    pub fn status(&self, value: Option<&CellValue>) -> ClientStatus {
        self.optional_text(value)
            .and_then(|s| ClientStatus::from_code(&fold_code(&s)))
            .unwrap_or(ClientStatus::Prospect)
    }
}

/// 数字 → 文本；整数不带小数部分
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// 枚举代码归一化: 小写、去法语重音、空格转下划线
pub fn fold_code(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' => 'i',
            'ô' | 'ö' => 'o',
            'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            ' ' => '_',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_text_trims_and_nulls() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.text(&text("  Dupont  ")), Some("Dupont".to_string()));
        assert_eq!(cleaner.text(&text("   ")), None);
        assert_eq!(cleaner.text(&CellValue::Empty), None);
    }

    #[test]
    fn test_text_from_numbers() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.text(&CellValue::Number(123456789.0)), Some("123456789".to_string()));
        assert_eq!(
            cleaner.text(&CellValue::Number(1234567890123.0)),
            Some("1234567890123".to_string())
        );
        assert_eq!(cleaner.text(&CellValue::Number(2.5)), Some("2.5".to_string()));
    }

    #[test]
    fn test_parse_iso_date() {
        let cleaner = DataCleaner;
        let expected = NaiveDate::from_ymd_opt(1980, 1, 15).unwrap();

        assert_eq!(cleaner.parse_iso_date(&text(" 1980-01-15 ")), Some(expected));
        assert_eq!(cleaner.parse_iso_date(&CellValue::Date(expected)), Some(expected));
        assert_eq!(cleaner.parse_iso_date(&text("15/01/1980")), None);
        assert_eq!(cleaner.parse_iso_date(&text("1980-02-30")), None);
        // 工作簿中未格式化为日期的数值不被接受
        assert_eq!(cleaner.parse_iso_date(&CellValue::Number(29235.0)), None);
    }

    #[test]
    fn test_coerce_dependents_permissive() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.coerce_dependents(Some(&text("2"))), 2);
        assert_eq!(cleaner.coerce_dependents(Some(&text(" 3 "))), 3);
        assert_eq!(cleaner.coerce_dependents(Some(&text("1.0"))), 1);
        assert_eq!(cleaner.coerce_dependents(Some(&CellValue::Number(4.0))), 4);
        assert_eq!(cleaner.coerce_dependents(Some(&text("deux"))), 0);
        assert_eq!(cleaner.coerce_dependents(Some(&text("-1"))), 0);
        assert_eq!(cleaner.coerce_dependents(Some(&CellValue::Number(-2.0))), 0);
        assert_eq!(cleaner.coerce_dependents(None), 0);
    }

    #[test]
    fn test_family_situation_normalization() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.family_situation(&text("Marié")), FamilySituation::Married);
        assert_eq!(cleaner.family_situation(&text("PACS")), FamilySituation::RegisteredPartnership);
        assert_eq!(cleaner.family_situation(&text("Célibataire")), FamilySituation::Single);
        assert_eq!(cleaner.family_situation(&text("widowed")), FamilySituation::Widowed);
        assert_eq!(cleaner.family_situation(&text("compliqué")), FamilySituation::Single);
    }

    #[test]
    fn test_status_defaults_to_prospect() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.status(Some(&text("Client"))), ClientStatus::Client);
        assert_eq!(cleaner.status(Some(&text("perdu"))), ClientStatus::Lost);
        assert_eq!(cleaner.status(Some(&text("vip"))), ClientStatus::Prospect);
        assert_eq!(cleaner.status(None), ClientStatus::Prospect);
    }

    #[test]
    fn test_fold_code() {
        assert_eq!(fold_code(" Pacsé(e) "), "pacse(e)");
        assert_eq!(fold_code("Registered Partnership"), "registered_partnership");
    }
}
