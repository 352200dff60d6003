// ==========================================
// 多式联运物流系统 - 包裹领域模型
// ==========================================
// 包裹路线创建后固定，只有车辆位置会变化
// 状态(位置/剩余时间)按查询即时推导，不落库
// ==========================================

use crate::domain::network::{PathLeg, ROUTE_DELIMITER};
use crate::domain::types::{ShipmentClass, TransportMode, UnknownTransportMode};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// RouteResult - 路线规划结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub route: Vec<String>,  // 有序设施名称
    pub legs: Vec<PathLeg>,  // 每段的距离与运输方式
    pub total_time_min: f64, // 总时间（分钟）
    pub total_cost: f64,     // 总成本
}

impl RouteResult {
    pub fn leg_modes(&self) -> Vec<TransportMode> {
        self.legs.iter().map(|leg| leg.transport_mode).collect()
    }
}

// ==========================================
// Package - 包裹
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub package_id: String,
    pub purchase_ref: String, // 外部订单号
    pub shipment_class: ShipmentClass,
    pub route: Vec<String>,
    pub leg_modes: Vec<TransportMode>, // 可能为空（未记录各段运输方式）
    pub total_time_min: f64,
    pub total_cost: f64,
    pub created_at: NaiveDateTime,
}

/// 待写入的包裹
#[derive(Debug, Clone, PartialEq)]
pub struct NewPackage {
    pub purchase_ref: String,
    pub shipment_class: ShipmentClass,
    pub route: Vec<String>,
    pub leg_modes: Vec<TransportMode>,
    pub total_time_min: f64,
    pub total_cost: f64,
    pub created_at: NaiveDateTime,
}

// ==========================================
// PackageStatus - 包裹状态（推导值）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageStatus {
    pub purchase_ref: String,
    pub current_location: String,
    pub remaining_time_min: f64,
}

// ==========================================
// 路线字段编解码
// ==========================================

pub fn encode_route(route: &[String]) -> String {
    route.join(ROUTE_DELIMITER)
}

pub fn decode_route(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(ROUTE_DELIMITER).map(str::to_string).collect()
}

pub fn encode_leg_modes(modes: &[TransportMode]) -> String {
    modes
        .iter()
        .map(|m| m.to_db_str())
        .collect::<Vec<_>>()
        .join(ROUTE_DELIMITER)
}

pub fn decode_leg_modes(raw: &str) -> Result<Vec<TransportMode>, UnknownTransportMode> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    raw.split(ROUTE_DELIMITER).map(str::parse).collect()
}
