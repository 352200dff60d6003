// ==========================================
// 多式联运物流系统 - 应用层
// ==========================================
// 职责: 组装存储/配置/引擎/API
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};
