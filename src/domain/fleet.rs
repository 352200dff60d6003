// ==========================================
// 多式联运物流系统 - 车辆领域模型
// ==========================================
// 红线: 每个 (线段, 运输方式) 组合至多一辆车
// 车辆按需创建，只复用不删除
// ==========================================

use crate::domain::types::TransportMode;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Vehicle - 运输车辆
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub vehicle_id: String, // UUID
    pub segment_id: i64,    // 覆盖的线段
    pub transport_mode: TransportMode,
    pub last_node: String, // 最后经过的设施
    pub last_update_ts: NaiveDateTime,
}

/// find-or-create 的结果
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleBinding {
    pub vehicle: Vehicle,
    pub created: bool, // true = 本次新建, false = 复用
}
