// ==========================================
// Courtier CRM - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类:
// - ImportError: 调用级致命错误（整次导入中止，不产出汇总）
// - ValidationError: 行级错误（记入汇总，继续处理下一行）
// ==========================================

use crate::domain::types::TargetField;
use crate::i18n::{current_locale, t_in};
use thiserror::Error;

/// 导入模块致命错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("Fichier introuvable: {0}")]
    FileNotFound(String),

    #[error("Type de fichier non supporté: {0} (seuls .xlsx, .xls et .csv sont acceptés)")]
    UnsupportedFormat(String),

    #[error("Fichier trop volumineux: {size} octets (maximum {max})")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Lecture du fichier impossible: {0}")]
    FileReadError(String),

    // ===== 解码错误 =====
    #[error("Analyse CSV impossible: {0}")]
    CsvParseError(String),

    #[error("Contenu binaire inattendu dans un fichier texte délimité")]
    BinaryContent,

    #[error("Analyse Excel impossible: {0}")]
    ExcelParseError(String),

    #[error("Le classeur ne contient aucune feuille")]
    NoWorksheet,

    // ===== 配置错误 =====
    #[error("Table d'alias invalide: {0}")]
    InvalidAliasTable(String),

    // ===== 通用错误 =====
    #[error("Erreur interne: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 是否属于解码错误（文件内容无法按声明格式解析）
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            ImportError::CsvParseError(_)
                | ImportError::BinaryContent
                | ImportError::ExcelParseError(_)
                | ImportError::NoWorksheet
        )
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ImportError::FileNotFound(err.to_string()),
            _ => ImportError::FileReadError(err.to_string()),
        }
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

// ==========================================
// 行级校验错误
// ==========================================
// Display 即面向用户的原因文本（当前全局语言）；reason() 按指定语言生成
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{}", missing_fields_reason(.0, &current_locale()))]
    MissingFields(Vec<TargetField>),

    #[error("{}", invalid_date_reason(.field, .value, &current_locale()))]
    InvalidDate { field: TargetField, value: String },
}

impl ValidationError {
    /// 按指定语言生成原因文本
    pub fn reason(&self, locale: &str) -> String {
        match self {
            ValidationError::MissingFields(fields) => missing_fields_reason(fields, locale),
            ValidationError::InvalidDate { field, value } => {
                invalid_date_reason(field, value, locale)
            }
        }
    }
}

fn missing_fields_reason(fields: &[TargetField], locale: &str) -> String {
    let names = fields
        .iter()
        .map(|f| f.code())
        .collect::<Vec<_>>()
        .join(", ");

    if fields.len() == 1 {
        t_in(locale, "import.missing_field", &[("field", &names)])
    } else {
        t_in(locale, "import.missing_fields", &[("fields", &names)])
    }
}

fn invalid_date_reason(field: &TargetField, value: &str, locale: &str) -> String {
    t_in(
        locale,
        "import.invalid_date",
        &[("field", field.code()), ("value", value)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_classification() {
        assert!(ImportError::BinaryContent.is_decode_error());
        assert!(ImportError::CsvParseError("x".into()).is_decode_error());
        assert!(ImportError::NoWorksheet.is_decode_error());
        assert!(!ImportError::UnsupportedFormat("pdf".into()).is_decode_error());
        assert!(!ImportError::FileTooLarge { size: 2, max: 1 }.is_decode_error());
    }

    #[test]
    fn test_io_not_found_maps_to_file_not_found() {
        let err: ImportError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, ImportError::FileNotFound(_)));
    }

    #[test]
    fn test_missing_single_field_reason() {
        let err = ValidationError::MissingFields(vec![TargetField::Email]);
        assert_eq!(err.to_string(), "email manquant");
    }

    #[test]
    fn test_missing_several_fields_reason() {
        let err = ValidationError::MissingFields(vec![TargetField::LastName, TargetField::Email]);
        assert_eq!(err.to_string(), "nom, email manquants");
    }

    #[test]
    fn test_invalid_date_reason() {
        let err = ValidationError::InvalidDate {
            field: TargetField::BirthDate,
            value: "15/01/1980".to_string(),
        };
        assert_eq!(err.to_string(), "date_naissance invalide: 15/01/1980");
    }

    #[test]
    fn test_reason_in_explicit_locale() {
        let err = ValidationError::MissingFields(vec![TargetField::LastName, TargetField::Email]);
        assert_eq!(err.reason("en"), "nom, email missing");
        assert_eq!(err.reason("fr"), "nom, email manquants");

        let err = ValidationError::InvalidDate {
            field: TargetField::BirthDate,
            value: "abc".to_string(),
        };
        assert_eq!(err.reason("en"), "invalid date_naissance: abc");
    }
}
