// ==========================================
// 多式联运物流系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 路线规划 + 车队分配 + 包裹追踪
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 图存储
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 规划参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/schema）
pub mod db;

// 日志系统
pub mod logging;

// SQL 性能统计
pub mod perf;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{FacilityRole, ShipmentClass, TransportMode};

// 领域实体
pub use domain::{
    Facility, NetworkPath, Package, PackageStatus, PathLeg, RouteResult, Segment, Vehicle,
};

// 存储
pub use repository::{GraphStore, RepositoryError, SqliteGraphStore};

// 引擎
pub use engine::{
    FleetAssignmentManager, LogisticsError, PackageTracker, PlannerConfig, RouteCostModel,
    RoutePlanner,
};

// API
pub use api::{ApiError, ShipmentApi, ShipmentReceipt};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "多式联运物流系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
