// ==========================================
// Courtier CRM - 领域类型定义
// ==========================================
// 职责: 导入目标字段、文件格式、客户分类枚举
// 序列化格式: 与数据库存储编码一致（法语代码）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 文件格式 (File Format)
// ==========================================
// 分隔文本 / 两种电子表格工作簿
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Xlsx,
    Xls,
}

impl FileFormat {
    /// 根据扩展名识别格式（大小写不敏感，可带前导点）
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim().trim_start_matches('.').to_lowercase().as_str() {
            "csv" => Some(FileFormat::Csv),
            "xlsx" => Some(FileFormat::Xlsx),
            "xls" => Some(FileFormat::Xls),
            _ => None,
        }
    }

    /// 根据文件名识别格式
    pub fn from_file_name(name: &str) -> Option<Self> {
        std::path::Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Xlsx => "xlsx",
            FileFormat::Xls => "xls",
        }
    }

    pub fn is_workbook(&self) -> bool {
        !matches!(self, FileFormat::Csv)
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.extension())
    }
}

// ==========================================
// 目标字段 (Target Field)
// ==========================================
// 客户记录的固定字段集合（不含归属操作员，由协调器注入）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetField {
    LastName,
    FirstName,
    BirthDate,
    NationalId,
    Phone,
    Email,
    Address,
    FamilySituation,
    Dependents,
    CurrentInsurer,
    CoverageLevel,
    Status,
    Notes,
}

impl TargetField {
    pub const ALL: [TargetField; 13] = [
        TargetField::LastName,
        TargetField::FirstName,
        TargetField::BirthDate,
        TargetField::NationalId,
        TargetField::Phone,
        TargetField::Email,
        TargetField::Address,
        TargetField::FamilySituation,
        TargetField::Dependents,
        TargetField::CurrentInsurer,
        TargetField::CoverageLevel,
        TargetField::Status,
        TargetField::Notes,
    ];

    /// 必填且无默认值的字段（缺失即整行失败）
    pub const REQUIRED: [TargetField; 8] = [
        TargetField::LastName,
        TargetField::FirstName,
        TargetField::BirthDate,
        TargetField::NationalId,
        TargetField::Phone,
        TargetField::Email,
        TargetField::Address,
        TargetField::FamilySituation,
    ];

    pub fn is_required(&self) -> bool {
        Self::REQUIRED.contains(self)
    }

    /// 列名代码（与模板表头、数据库列名一致，也用于错误原因）
    pub fn code(&self) -> &'static str {
        match self {
            TargetField::LastName => "nom",
            TargetField::FirstName => "prenom",
            TargetField::BirthDate => "date_naissance",
            TargetField::NationalId => "numero_secu",
            TargetField::Phone => "telephone",
            TargetField::Email => "email",
            TargetField::Address => "adresse",
            TargetField::FamilySituation => "situation_familiale",
            TargetField::Dependents => "nombre_ayants_droit",
            TargetField::CurrentInsurer => "mutuelle_actuelle",
            TargetField::CoverageLevel => "niveau_couverture",
            TargetField::Status => "statut",
            TargetField::Notes => "notes",
        }
    }
}

impl fmt::Display for TargetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ==========================================
// 家庭状况 (Family Situation)
// ==========================================
// 封闭集合；导入时无法识别的值回退为 Single
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FamilySituation {
    #[default]
    #[serde(rename = "celibataire")]
    Single,
    #[serde(rename = "marie")]
    Married,
    #[serde(rename = "divorce")]
    Divorced,
    #[serde(rename = "veuf")]
    Widowed,
    #[serde(rename = "pacs")]
    RegisteredPartnership,
}

impl FamilySituation {
    /// 存储编码
    pub fn code(&self) -> &'static str {
        match self {
            FamilySituation::Single => "celibataire",
            FamilySituation::Married => "marie",
            FamilySituation::Divorced => "divorce",
            FamilySituation::Widowed => "veuf",
            FamilySituation::RegisteredPartnership => "pacs",
        }
    }

    /// 从已归一化（小写、去重音）的文本解析
    ///
    /// 同时接受存储编码、法语书写形式与英文名称
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "celibataire" | "single" => Some(FamilySituation::Single),
            "marie" | "mariee" | "marie(e)" | "married" => Some(FamilySituation::Married),
            "divorce" | "divorcee" | "divorce(e)" | "divorced" => Some(FamilySituation::Divorced),
            "veuf" | "veuve" | "veuf/veuve" | "widowed" => Some(FamilySituation::Widowed),
            "pacs" | "pacse" | "pacsee" | "pacse(e)" | "registered_partnership"
            | "registered-partnership" | "partnership" => {
                Some(FamilySituation::RegisteredPartnership)
            }
            _ => None,
        }
    }
}

impl fmt::Display for FamilySituation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ==========================================
// 客户状态 (Client Status)
// ==========================================
// 数据库默认 nouveau；导入默认 prospect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClientStatus {
    #[serde(rename = "nouveau")]
    New,
    #[serde(rename = "prospect")]
    Prospect,
    #[serde(rename = "client")]
    Client,
    #[serde(rename = "perdu")]
    Lost,
}

impl ClientStatus {
    pub fn code(&self) -> &'static str {
        match self {
            ClientStatus::New => "nouveau",
            ClientStatus::Prospect => "prospect",
            ClientStatus::Client => "client",
            ClientStatus::Lost => "perdu",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "nouveau" | "new" => Some(ClientStatus::New),
            "prospect" => Some(ClientStatus::Prospect),
            "client" | "customer" => Some(ClientStatus::Client),
            "perdu" | "lost" => Some(ClientStatus::Lost),
            _ => None,
        }
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_format_from_extension() {
        assert_eq!(FileFormat::from_extension("CSV"), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_extension(".xlsx"), Some(FileFormat::Xlsx));
        assert_eq!(FileFormat::from_extension("xls"), Some(FileFormat::Xls));
        assert_eq!(FileFormat::from_extension("pdf"), None);
        assert_eq!(
            FileFormat::from_file_name("Portefeuille.XLSX"),
            Some(FileFormat::Xlsx)
        );
        assert_eq!(FileFormat::from_file_name("sans_extension"), None);
    }

    #[test]
    fn test_required_fields_subset_of_all() {
        for field in TargetField::REQUIRED {
            assert!(TargetField::ALL.contains(&field));
            assert!(field.is_required());
        }
        assert!(!TargetField::Dependents.is_required());
        assert!(!TargetField::Status.is_required());
    }

    #[test]
    fn test_family_situation_codes() {
        assert_eq!(FamilySituation::from_code("marie"), Some(FamilySituation::Married));
        assert_eq!(
            FamilySituation::from_code("registered-partnership"),
            Some(FamilySituation::RegisteredPartnership)
        );
        assert_eq!(FamilySituation::from_code("inconnu"), None);
        assert_eq!(FamilySituation::default(), FamilySituation::Single);
        assert_eq!(
            serde_json::to_string(&FamilySituation::Widowed).unwrap(),
            "\"veuf\""
        );
    }

    #[test]
    fn test_client_status_codes() {
        assert_eq!(ClientStatus::from_code("perdu"), Some(ClientStatus::Lost));
        assert_eq!(ClientStatus::from_code("lead"), None);
        assert_eq!(ClientStatus::Prospect.to_string(), "prospect");
    }
}
