// ==========================================
// Courtier CRM - 领域模型层
// ==========================================
// 职责: 定义客户实体、导入管道数据模型与枚举类型
// 红线: 不含数据访问逻辑, 不含解析/校验逻辑
// ==========================================

pub mod client;
pub mod import;
pub mod types;

// 重导出核心类型
pub use client::{ClientRecord, NewClientRecord};
pub use import::{CellValue, FieldValue, ImportRowError, ImportSummary, RawRow, ResolvedRow};
pub use types::{ClientStatus, FamilySituation, FileFormat, TargetField};
