// ==========================================
// Courtier CRM - 导入层
// ==========================================
// 职责: 客户组合文件导入
// 支持: CSV, XLSX, XLS
// ==========================================

// 模块声明
pub mod client_importer_impl;
pub mod client_importer_trait;
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod row_validator;
pub mod temp_upload;
pub mod template;

// 重导出核心类型
pub use client_importer_impl::ClientImporterImpl;
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult, ValidationError};
pub use field_mapper::{normalize_header, FieldAliasTable, FieldMapper};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use row_validator::RowValidator as RowValidatorImpl;
pub use temp_upload::TempUpload;
pub use template::{TEMPLATE_CSV, TEMPLATE_FILE_NAME};

// 重导出 Trait 接口
pub use client_importer_trait::{ClientImporter, ColumnResolver, FileParser, RowValidator};
