// ==========================================
// Courtier CRM - 客户实体
// ==========================================
// 职责: 校验后的待创建客户 / 持久化后的客户记录
// 序列化: JSON 字段名与前端约定一致（nom, prenom, dateNaissance ...）
// ==========================================

use crate::domain::types::{ClientStatus, FamilySituation};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// NewClientRecord - 待创建客户
// ==========================================
// 由行校验器产出，协调器注入 created_by 后交给持久化协作者
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewClientRecord {
    #[serde(rename = "nom")]
    pub last_name: String,
    #[serde(rename = "prenom")]
    pub first_name: String,
    #[serde(rename = "dateNaissance")]
    pub birth_date: NaiveDate,
    #[serde(rename = "numeroSecu")]
    pub national_id: String,
    #[serde(rename = "telephone")]
    pub phone: String,
    pub email: String,
    #[serde(rename = "adresse")]
    pub address: String,
    #[serde(rename = "situationFamiliale")]
    pub family_situation: FamilySituation,
    #[serde(rename = "nombreAyantsDroit")]
    pub dependents: u32,
    #[serde(rename = "mutuelleActuelle")]
    pub current_insurer: Option<String>,
    #[serde(rename = "niveauCouverture")]
    pub coverage_level: Option<String>,
    #[serde(rename = "statut")]
    pub status: ClientStatus,
    pub notes: Option<String>,
    #[serde(rename = "createdBy")]
    pub created_by: Option<i64>,
}

impl NewClientRecord {
    /// 注入导入操作员（不从文件读取）
    pub fn attributed_to(mut self, operator_id: i64) -> Self {
        self.created_by = Some(operator_id);
        self
    }
}

// ==========================================
// ClientRecord - 已持久化客户
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: i64,
    #[serde(rename = "nom")]
    pub last_name: String,
    #[serde(rename = "prenom")]
    pub first_name: String,
    #[serde(rename = "dateNaissance")]
    pub birth_date: NaiveDate,
    #[serde(rename = "numeroSecu")]
    pub national_id: String,
    #[serde(rename = "telephone")]
    pub phone: String,
    pub email: String,
    #[serde(rename = "adresse")]
    pub address: String,
    #[serde(rename = "situationFamiliale")]
    pub family_situation: FamilySituation,
    #[serde(rename = "nombreAyantsDroit")]
    pub dependents: u32,
    #[serde(rename = "mutuelleActuelle")]
    pub current_insurer: Option<String>,
    #[serde(rename = "niveauCouverture")]
    pub coverage_level: Option<String>,
    #[serde(rename = "statut")]
    pub status: ClientStatus,
    pub notes: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "createdBy")]
    pub created_by: Option<i64>,
}

impl ClientRecord {
    /// 由持久化层分配的 id 与时间戳构造
    pub fn from_new(id: i64, record: NewClientRecord, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            last_name: record.last_name,
            first_name: record.first_name,
            birth_date: record.birth_date,
            national_id: record.national_id,
            phone: record.phone,
            email: record.email,
            address: record.address,
            family_situation: record.family_situation,
            dependents: record.dependents,
            current_insurer: record.current_insurer,
            coverage_level: record.coverage_level,
            status: record.status,
            notes: record.notes,
            created_at,
            updated_at: created_at,
            created_by: record.created_by,
        }
    }
}
