// ==========================================
// Courtier CRM - 数据仓储层
// ==========================================
// 职责: 提供数据访问接口，屏蔽数据库细节
// 约束: 所有查询使用参数化
// ==========================================

pub mod client_repo;
pub mod client_repo_impl;
pub mod error;

pub use client_repo::ClientRepository;
pub use client_repo_impl::ClientRepositoryImpl;
pub use error::{RepositoryError, RepositoryResult};
