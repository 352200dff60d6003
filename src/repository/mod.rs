// ==========================================
// 多式联运物流系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供图存储访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod graph_store;
pub mod sqlite_graph_store;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use graph_store::GraphStore;
pub use sqlite_graph_store::SqliteGraphStore;
