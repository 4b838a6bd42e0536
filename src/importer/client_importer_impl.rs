// ==========================================
// Courtier CRM - 客户导入器实现
// ==========================================
// 职责: 整合导入流程，从暂存文件到持久化
// 流程: 读取 → 解码 → 列名解析 → 行校验 → 持久化 → 汇总 → 删除暂存文件
// 规则:
// - 解码失败为致命错误，不产出汇总
// - 行级失败（校验/持久化）记入汇总后继续
// - 行严格按文件顺序逐一处理，不并发写入
// ==========================================

use crate::domain::import::ImportSummary;
use crate::domain::types::FileFormat;
use crate::i18n::DEFAULT_LOCALE;
use crate::importer::client_importer_trait::{ClientImporter, ColumnResolver, RowValidator};
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::{FieldAliasTable, FieldMapper};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::row_validator::RowValidator as RowValidatorImpl;
use crate::importer::temp_upload::TempUpload;
use crate::repository::ClientRepository;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

// ==========================================
// ClientImporterImpl - 客户导入器实现
// ==========================================
pub struct ClientImporterImpl<R>
where
    R: ClientRepository,
{
    // 持久化协作者
    repo: R,

    // 导入组件
    file_parser: UniversalFileParser,
    column_resolver: Box<dyn ColumnResolver>,
    row_validator: Box<dyn RowValidator>,

    // 行级原因文本的语言
    locale: String,
}

impl<R> ClientImporterImpl<R>
where
    R: ClientRepository,
{
    /// 使用默认别名表创建导入器
    pub fn new(repo: R) -> Self {
        Self::with_components(
            repo,
            Box::new(FieldMapper::default()),
            Box::new(RowValidatorImpl::new()),
        )
    }

    /// 使用自定义别名表创建导入器
    pub fn with_alias_table(repo: R, aliases: Arc<FieldAliasTable>) -> Self {
        Self::with_components(
            repo,
            Box::new(FieldMapper::new(aliases)),
            Box::new(RowValidatorImpl::new()),
        )
    }

    /// 注入全部组件
    pub fn with_components(
        repo: R,
        column_resolver: Box<dyn ColumnResolver>,
        row_validator: Box<dyn RowValidator>,
    ) -> Self {
        Self {
            repo,
            file_parser: UniversalFileParser,
            column_resolver,
            row_validator,
            locale: DEFAULT_LOCALE.to_string(),
        }
    }

    /// 指定行级原因文本的语言
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// 执行导入（不负责删除暂存文件）
    async fn run(
        &self,
        path: &Path,
        format: FileFormat,
        operator_id: i64,
    ) -> ImportResult<ImportSummary> {
        // === 步骤 1: 读取 + 解码 ===
        let bytes = tokio::fs::read(path).await?;
        debug!(size = bytes.len(), "文件读取完成");

        let raw_rows = self.file_parser.parse(&bytes, format).map_err(|e| {
            error!(error = %e, "文件解码失败");
            e
        })?;
        info!(total_rows = raw_rows.len(), "文件解码完成");

        // === 步骤 2: 逐行处理 ===
        let mut summary = ImportSummary::new();
        for raw in &raw_rows {
            let resolved = self.column_resolver.resolve(raw);

            let draft = match self.row_validator.validate(&resolved) {
                Ok(draft) => draft,
                Err(e) => {
                    let reason = e.reason(&self.locale);
                    warn!(line = raw.line, %reason, "行校验失败");
                    summary.record_failure(raw.line, reason);
                    continue;
                }
            };

            match self.repo.create_client(draft.attributed_to(operator_id)).await {
                Ok(record) => {
                    debug!(line = raw.line, client_id = record.id, "客户已创建");
                    summary.record_success(record);
                }
                Err(e) => {
                    warn!(line = raw.line, error = %e, "客户持久化失败");
                    summary.record_failure(raw.line, e.to_string());
                }
            }
        }

        Ok(summary)
    }
}

#[async_trait]
impl<R> ClientImporter for ClientImporterImpl<R>
where
    R: ClientRepository,
{
    #[instrument(skip(self, upload), fields(path = %upload.path().display()))]
    async fn import_file(
        &self,
        mut upload: TempUpload,
        format: FileFormat,
        operator_id: i64,
    ) -> ImportResult<ImportSummary> {
        let start_time = Instant::now();
        info!(%format, operator_id, "开始导入客户数据");

        let outcome = self.run(upload.path(), format, operator_id).await;

        // 成功与失败路径都删除暂存文件；删除失败只记录日志
        upload.cleanup();

        match &outcome {
            Ok(summary) => info!(
                imported = summary.imported_count,
                failed = summary.error_count,
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "客户导入完成"
            ),
            Err(e) => error!(error = %e, "客户导入中止"),
        }

        outcome
    }
}
