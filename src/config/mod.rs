// ==========================================
// 多式联运物流系统 - 配置层
// ==========================================
// 职责: 规划参数管理，支持覆写与快照
// 存储: config_kv 表
// ==========================================

pub mod config_manager;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
