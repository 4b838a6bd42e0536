// ==========================================
// Courtier CRM - 列名解析器实现
// ==========================================
// 职责: 原始列名 → 目标字段（大小写/空白不敏感的别名表）
// 约定:
// - 别名表为不可变配置值，在构造时注入
// - 每行独立解析；同一字段多列命中时取原始列序中的第一个
// - 无别名命中的字段在 ResolvedRow 中缺席（此阶段不报错）
// ==========================================

use crate::domain::import::{RawRow, ResolvedRow};
use crate::domain::types::TargetField;
use crate::importer::client_importer_trait::ColumnResolver;
use crate::importer::error::{ImportError, ImportResult};
use std::collections::HashMap;
use std::sync::Arc;

// ==========================================
// FieldAliasTable - 字段别名表
// ==========================================
// 不变式: 每个必填字段至少有一个别名；不同字段的别名集合互不相交
#[derive(Debug, Clone, PartialEq)]
pub struct FieldAliasTable {
    entries: Vec<(TargetField, Vec<String>)>,
    lookup: HashMap<String, TargetField>,
}

impl FieldAliasTable {
    /// 从 (字段, 别名列表) 构造并校验不变式
    pub fn new<S: AsRef<str>>(entries: Vec<(TargetField, Vec<S>)>) -> ImportResult<Self> {
        let mut normalized_entries: Vec<(TargetField, Vec<String>)> = Vec::new();
        let mut lookup = HashMap::new();

        for (field, aliases) in entries {
            let mut normalized = Vec::new();
            for alias in aliases {
                let key = normalize_header(alias.as_ref());
                if key.is_empty() {
                    continue;
                }
                match lookup.get(&key) {
                    Some(owner) if *owner != field => {
                        return Err(ImportError::InvalidAliasTable(format!(
                            "alias '{}' partagé entre {} et {}",
                            key, owner, field
                        )));
                    }
                    Some(_) => continue, // 同字段重复别名
                    None => {
                        lookup.insert(key.clone(), field);
                        normalized.push(key);
                    }
                }
            }

            match normalized_entries.iter_mut().find(|(f, _)| *f == field) {
                Some((_, existing)) => existing.extend(normalized),
                None => normalized_entries.push((field, normalized)),
            }
        }

        for field in TargetField::REQUIRED {
            let covered = normalized_entries
                .iter()
                .any(|(f, aliases)| *f == field && !aliases.is_empty());
            if !covered {
                return Err(ImportError::InvalidAliasTable(format!(
                    "aucun alias pour le champ obligatoire {}",
                    field
                )));
            }
        }

        Ok(Self {
            entries: normalized_entries,
            lookup,
        })
    }

    /// 查找列名对应的目标字段
    pub fn field_for(&self, header: &str) -> Option<TargetField> {
        self.lookup.get(&normalize_header(header)).copied()
    }

    /// 字段的别名列表（已归一化，按声明顺序）
    pub fn aliases(&self, field: TargetField) -> &[String] {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, aliases)| aliases.as_slice())
            .unwrap_or(&[])
    }
}

/// 内置别名表（不变式由 tests::test_default_table_is_valid 覆盖）
const DEFAULT_ALIASES: &[(TargetField, &[&str])] = &[
    (TargetField::LastName, &["nom", "name", "lastname", "last_name"]),
    (TargetField::FirstName, &["prenom", "firstname", "first_name"]),
    (TargetField::Email, &["email", "mail"]),
    (TargetField::Phone, &["telephone", "phone", "tel"]),
    (
        TargetField::BirthDate,
        &["date_naissance", "datenaissance", "birth_date", "naissance"],
    ),
    (
        TargetField::NationalId,
        &["numero_secu", "numerosecu", "secu", "social_security"],
    ),
    (TargetField::Address, &["adresse", "address"]),
    (
        TargetField::FamilySituation,
        &["situation_familiale", "situationfamiliale", "marital_status"],
    ),
    (
        TargetField::Dependents,
        &["nombre_ayants_droit", "ayants_droit", "dependents"],
    ),
    (
        TargetField::CurrentInsurer,
        &["mutuelle_actuelle", "mutuelleactuelle", "current_insurance"],
    ),
    (
        TargetField::CoverageLevel,
        &["niveau_couverture", "niveaucouverture", "coverage_level"],
    ),
    (TargetField::Status, &["statut", "status"]),
    (TargetField::Notes, &["notes", "comments"]),
];

impl Default for FieldAliasTable {
    fn default() -> Self {
        // 内置别名已归一化且互不相交，直接建立索引
        let entries: Vec<(TargetField, Vec<String>)> = DEFAULT_ALIASES
            .iter()
            .map(|(field, aliases)| (*field, aliases.iter().map(|a| a.to_string()).collect()))
            .collect();
        let lookup = entries
            .iter()
            .flat_map(|(field, aliases)| aliases.iter().map(move |a| (a.clone(), *field)))
            .collect();

        Self { entries, lookup }
    }
}

/// 列名归一化: 去 BOM、去首尾空白、转小写
pub fn normalize_header(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_lowercase()
}

// ==========================================
// FieldMapper - ColumnResolver 实现
// ==========================================
pub struct FieldMapper {
    aliases: Arc<FieldAliasTable>,
}

impl FieldMapper {
    pub fn new(aliases: Arc<FieldAliasTable>) -> Self {
        Self { aliases }
    }
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new(Arc::new(FieldAliasTable::default()))
    }
}

impl ColumnResolver for FieldMapper {
    fn resolve(&self, row: &RawRow) -> ResolvedRow {
        let mut resolved = ResolvedRow::new(row.line);

        for (header, value) in &row.cells {
            if let Some(field) = self.aliases.field_for(header) {
                resolved.insert_first(field, value.clone());
            }
        }

        resolved
    }
}
