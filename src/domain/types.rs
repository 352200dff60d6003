// ==========================================
// 多式联运物流系统 - 领域类型定义
// ==========================================
// 运输方式 / 发货等级 / 设施角色
// 数据库存储格式: SCREAMING_SNAKE_CASE
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ==========================================
// 运输方式 (Transport Mode)
// ==========================================
// 封闭枚举: 参数表在 engine::cost_model 中固定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportMode {
    Road, // 公路
    Rail, // 铁路
    Air,  // 航空
    Sea,  // 海运
}

impl TransportMode {
    pub const ALL: [TransportMode; 4] = [
        TransportMode::Road,
        TransportMode::Rail,
        TransportMode::Air,
        TransportMode::Sea,
    ];

    /// 数据库存储值
    pub fn to_db_str(&self) -> &'static str {
        match self {
            TransportMode::Road => "ROAD",
            TransportMode::Rail => "RAIL",
            TransportMode::Air => "AIR",
            TransportMode::Sea => "SEA",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

/// 未知运输方式（配置错误，不可在本地恢复）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("未知的运输方式: {0}")]
pub struct UnknownTransportMode(pub String);

impl FromStr for TransportMode {
    type Err = UnknownTransportMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ROAD" => Ok(TransportMode::Road),
            "RAIL" => Ok(TransportMode::Rail),
            "AIR" => Ok(TransportMode::Air),
            "SEA" => Ok(TransportMode::Sea),
            _ => Err(UnknownTransportMode(s.to_string())),
        }
    }
}

// ==========================================
// 发货等级 (Shipment Class)
// ==========================================
// 1 = 当日达, 2 = 次日达, 3 = 经济型(不限时)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipmentClass {
    SameDay,
    NextDay,
    Economy,
}

impl ShipmentClass {
    /// 外部约定的整数编码
    pub fn code(&self) -> i64 {
        match self {
            ShipmentClass::SameDay => 1,
            ShipmentClass::NextDay => 2,
            ShipmentClass::Economy => 3,
        }
    }
}

impl TryFrom<i64> for ShipmentClass {
    type Error = i64;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(ShipmentClass::SameDay),
            2 => Ok(ShipmentClass::NextDay),
            3 => Ok(ShipmentClass::Economy),
            other => Err(other),
        }
    }
}

impl fmt::Display for ShipmentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShipmentClass::SameDay => write!(f, "SAME_DAY"),
            ShipmentClass::NextDay => write!(f, "NEXT_DAY"),
            ShipmentClass::Economy => write!(f, "ECONOMY"),
        }
    }
}

// ==========================================
// 设施角色 (Facility Role)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FacilityRole {
    Warehouse,     // 仓库（起点）
    Platform,      // 中转平台
    DeliveryPoint, // 派送点（终点）
}

impl FacilityRole {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            FacilityRole::Warehouse => "WAREHOUSE",
            FacilityRole::Platform => "PLATFORM",
            FacilityRole::DeliveryPoint => "DELIVERY_POINT",
        }
    }
}

impl fmt::Display for FacilityRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("未知的设施角色: {0}")]
pub struct UnknownFacilityRole(pub String);

impl FromStr for FacilityRole {
    type Err = UnknownFacilityRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "WAREHOUSE" => Ok(FacilityRole::Warehouse),
            "PLATFORM" => Ok(FacilityRole::Platform),
            "DELIVERY_POINT" => Ok(FacilityRole::DeliveryPoint),
            _ => Err(UnknownFacilityRole(s.to_string())),
        }
    }
}
