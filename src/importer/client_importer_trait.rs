// ==========================================
// Courtier CRM - 客户导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 流程: 解码 → 列名解析 → 行校验 → 持久化 → 汇总
// ==========================================

use crate::domain::client::NewClientRecord;
use crate::domain::import::{ImportSummary, RawRow, ResolvedRow};
use crate::domain::types::FileFormat;
use crate::importer::error::{ImportResult, ValidationError};
use crate::importer::temp_upload::TempUpload;
use async_trait::async_trait;

// ==========================================
// ClientImporter Trait
// ==========================================
// 用途: 客户组合导入主接口
// 实现者: ClientImporterImpl
#[async_trait]
pub trait ClientImporter: Send + Sync {
    /// 导入一个已暂存的上传文件
    ///
    /// # 参数
    /// - upload: 暂存文件（所有权转移给导入器，结束时删除）
    /// - format: 声明的文件格式
    /// - operator_id: 导入操作员（写入每条记录的 created_by）
    ///
    /// # 返回
    /// - Ok(ImportSummary): 完整汇总（可能包含行级错误）
    /// - Err: 文件读取/解码失败（不产出汇总）
    ///
    /// # 保证
    /// - 行按文件顺序逐一处理，任一行失败不影响后续行
    /// - 暂存文件在所有退出路径上删除且仅删除一次（包括 future 被取消）
    async fn import_file(
        &self,
        upload: TempUpload,
        format: FileFormat,
        operator_id: i64,
    ) -> ImportResult<ImportSummary>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 表格解码接口
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件字节为原始行（表头除外，按文件顺序）
    ///
    /// # 返回
    /// - Ok(Vec<RawRow>): 行记录列表
    /// - Err: 内容无法按该格式解析
    fn parse_to_raw_rows(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>>;
}

// ==========================================
// ColumnResolver Trait
// ==========================================
// 用途: 列名解析接口（纯函数，无副作用）
// 实现者: FieldMapper
pub trait ColumnResolver: Send + Sync {
    fn resolve(&self, row: &RawRow) -> ResolvedRow;
}

// ==========================================
// RowValidator Trait
// ==========================================
// 用途: 行校验接口（纯函数，无副作用）
// 实现者: RowValidator
pub trait RowValidator: Send + Sync {
    /// 校验并转换一行
    ///
    /// # 返回
    /// - Ok(NewClientRecord): created_by 尚未填写
    /// - Err(ValidationError): 必填字段缺失或日期格式错误
    fn validate(&self, row: &ResolvedRow) -> Result<NewClientRecord, ValidationError>;
}
