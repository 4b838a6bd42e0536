// ==========================================
// Courtier CRM - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 保险经纪客户组合管理（批量导入）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "fr");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ClientStatus, FamilySituation, FileFormat, TargetField};

// 领域实体
pub use domain::{ClientRecord, ImportRowError, ImportSummary, NewClientRecord};

// 导入
pub use importer::{ClientImporter, ClientImporterImpl, FieldAliasTable, ImportError, TempUpload};

// API
pub use api::{ApiError, ImportApi, ImportApiResponse};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Courtier CRM";
