// ==========================================
// 多式联运物流系统 - 运输网络领域模型
// ==========================================
// 设施(节点) + 线段(无向边)
// 网络拓扑为静态数据，本系统只读
// ==========================================

use crate::domain::types::{FacilityRole, TransportMode};
use serde::{Deserialize, Serialize};

/// 路线序列化分隔符（设施名称中禁止出现）
pub const ROUTE_DELIMITER: &str = "->";

// ==========================================
// Facility - 设施
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
    pub name: String, // 唯一键
    pub role: FacilityRole,
}

impl Facility {
    pub fn new(name: impl Into<String>, role: FacilityRole) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}

// ==========================================
// Segment - 线段
// ==========================================
// 无向: from_node/to_node 只反映录入方向
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub segment_id: i64,
    pub from_node: String,
    pub to_node: String,
    pub distance_km: f64,
    pub transport_mode: TransportMode,
}

// ==========================================
// PathLeg / NetworkPath - 图查询返回的路径
// ==========================================

/// 路径中的一段（按行进方向）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathLeg {
    pub segment_id: i64,
    pub from: String,
    pub to: String,
    pub distance_km: f64,
    pub transport_mode: TransportMode,
}

/// 候选路径: nodes.len() == legs.len() + 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkPath {
    pub nodes: Vec<String>,
    pub legs: Vec<PathLeg>,
}

/// 设施名称是否可安全序列化进路线字段
pub fn is_valid_facility_name(name: &str) -> bool {
    !name.trim().is_empty() && !name.contains(ROUTE_DELIMITER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facility_name_rejects_delimiter() {
        assert!(is_valid_facility_name("Zaragoza"));
        assert!(!is_valid_facility_name("A->B"));
        assert!(!is_valid_facility_name("  "));
    }
}
