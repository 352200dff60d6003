// ==========================================
// 多式联运物流系统 - API 层
// ==========================================
// 职责: 面向调用方的同步业务接口
// ==========================================

pub mod error;
pub mod shipment_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use shipment_api::{ShipmentApi, ShipmentReceipt};
