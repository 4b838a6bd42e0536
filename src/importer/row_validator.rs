// ==========================================
// Courtier CRM - 行校验器实现
// ==========================================
// 职责: ResolvedRow → NewClientRecord 或 ValidationError
// 规则（按顺序）:
// 1. 必填字段（nom, prenom, date_naissance, numero_secu, telephone,
//    email, adresse, situation_familiale）缺失或为空 → 整行失败，列出全部缺失字段
// 2. date_naissance 非 ISO 日期 → 整行失败
// 3. nombre_ayants_droit 非数字或负数 → 0（宽松）
// 4. situation_familiale 不在封闭集合内 → celibataire（宽松）
// 5. mutuelle_actuelle / niveau_couverture / notes 可选，缺失为 None
// 6. statut 缺失或无法识别 → prospect
// ==========================================

use crate::domain::client::NewClientRecord;
use crate::domain::import::{CellValue, ResolvedRow};
use crate::domain::types::TargetField;
use crate::importer::client_importer_trait::RowValidator as RowValidatorTrait;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::ValidationError;

pub struct RowValidator {
    cleaner: DataCleaner,
}

impl RowValidator {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }

    fn required_text(&self, row: &ResolvedRow, field: TargetField) -> String {
        row.get(field)
            .value()
            .and_then(|v| self.cleaner.text(v))
            .unwrap_or_default()
    }
}

impl Default for RowValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl RowValidatorTrait for RowValidator {
    fn validate(&self, row: &ResolvedRow) -> Result<NewClientRecord, ValidationError> {
        // === 规则 1: 必填字段 ===
        let missing: Vec<TargetField> = TargetField::REQUIRED
            .iter()
            .copied()
            .filter(|field| {
                row.get(*field)
                    .value()
                    .and_then(|v| self.cleaner.text(v))
                    .is_none()
            })
            .collect();

        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        // === 规则 2: 出生日期 ===
        let birth_value = row
            .get(TargetField::BirthDate)
            .value()
            .cloned()
            .unwrap_or(CellValue::Empty);
        let birth_date = self.cleaner.parse_iso_date(&birth_value).ok_or_else(|| {
            ValidationError::InvalidDate {
                field: TargetField::BirthDate,
                value: self.cleaner.text(&birth_value).unwrap_or_default(),
            }
        })?;

        // === 规则 3-6: 宽松字段 ===
        let family_situation = row
            .get(TargetField::FamilySituation)
            .value()
            .map(|v| self.cleaner.family_situation(v))
            .unwrap_or_default();

        Ok(NewClientRecord {
            last_name: self.required_text(row, TargetField::LastName),
            first_name: self.required_text(row, TargetField::FirstName),
            birth_date,
            national_id: self.required_text(row, TargetField::NationalId),
            phone: self.required_text(row, TargetField::Phone),
            email: self.required_text(row, TargetField::Email),
            address: self.required_text(row, TargetField::Address),
            family_situation,
            dependents: self
                .cleaner
                .coerce_dependents(row.get(TargetField::Dependents).value()),
            current_insurer: self
                .cleaner
                .optional_text(row.get(TargetField::CurrentInsurer).value()),
            coverage_level: self
                .cleaner
                .optional_text(row.get(TargetField::CoverageLevel).value()),
            status: self.cleaner.status(row.get(TargetField::Status).value()),
            notes: self.cleaner.optional_text(row.get(TargetField::Notes).value()),
            created_by: None,
        })
    }
}
