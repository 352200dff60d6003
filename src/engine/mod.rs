// ==========================================
// 多式联运物流系统 - 引擎层
// ==========================================
// 职责: 路线规划 / 车队分配 / 包裹追踪，不拼 SQL
// 红线: Engine 只通过 GraphStore 访问存储
// ==========================================

pub mod cost_model;
pub mod error;
pub mod fleet_assignment;
pub mod package_tracker;
pub mod route_planner;

// 重导出核心引擎
pub use cost_model::{mode_params, LegCost, ModeParams, RouteCost, RouteCostModel};
pub use error::{LogisticsError, LogisticsResult};
pub use fleet_assignment::FleetAssignmentManager;
pub use package_tracker::PackageTracker;
pub use route_planner::{PlannerConfig, RoutePlanner};
