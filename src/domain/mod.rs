// ==========================================
// 多式联运物流系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod fleet;
pub mod network;
pub mod package;
pub mod types;

// 重导出核心类型
pub use fleet::{Vehicle, VehicleBinding};
pub use network::{Facility, NetworkPath, PathLeg, Segment, ROUTE_DELIMITER};
pub use package::{NewPackage, Package, PackageStatus, RouteResult};
pub use types::{FacilityRole, ShipmentClass, TransportMode, UnknownTransportMode};
