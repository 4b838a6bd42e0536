// ==========================================
// Courtier CRM - 客户 Repository Trait
// ==========================================
// 职责: 导入管道消费的持久化协作者接口
// 红线: 导入核心只调用 create_client，不做其他查询或修改
// ==========================================

use crate::domain::client::{ClientRecord, NewClientRecord};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use std::sync::Arc;

// ==========================================
// ClientRepository Trait
// ==========================================
// 实现者: ClientRepositoryImpl（使用 rusqlite）
// 并发: 实现需自行保证与其他请求并发调用的安全性
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// 创建一条客户记录
    ///
    /// # 返回
    /// - Ok(ClientRecord): 已分配 id 与时间戳的记录
    /// - Err: 约束违反或存储错误
    async fn create_client(&self, client: NewClientRecord) -> RepositoryResult<ClientRecord>;
}

#[async_trait]
impl<T> ClientRepository for Arc<T>
where
    T: ClientRepository + ?Sized,
{
    async fn create_client(&self, client: NewClientRecord) -> RepositoryResult<ClientRecord> {
        (**self).create_client(client).await
    }
}
