// ==========================================
// RoutePlanner 集成测试
// ==========================================
// 测试范围: 图查询 → 成本评估 → 时效过滤 → 最低成本选择
// ==========================================


use freight_routing::domain::{FacilityRole, ShipmentClass, TransportMode};
use freight_routing::engine::{PlannerConfig, RoutePlanner};
use freight_routing::repository::GraphStore;
use std::sync::Arc;
use test_helpers::*;

fn planner_for(store: Arc<dyn GraphStore>) -> RoutePlanner {
    RoutePlanner::new(store, PlannerConfig::default())
}

/// A-B 之间两种运输方式并行
fn seed_parallel_pair(store: &dyn GraphStore) {
    add_facilities(
        store,
        &[("A", FacilityRole::Warehouse), ("B", FacilityRole::DeliveryPoint)],
    );
    add_segments(
        store,
        &[
            ("A", "B", TransportMode::Road, 100.0),
            ("A", "B", TransportMode::Air, 100.0),
        ],
    );
}

// ==========================================
// 场景: 各发货等级
// ==========================================

#[test]
fn test_same_day_air_route_fits_window() {
    let (_tmp, _path, store) = create_test_store();
    seed_spain_network(store.as_ref());
    let planner = planner_for(store);

    let result = planner
        .plan_at("Madrid", "Malaga", ShipmentClass::SameDay, at(10, 0))
        .unwrap()
        .expect("Madrid -> Malaga 当日达应有路线");

    assert_eq!(result.route.last().map(String::as_str), Some("Malaga"));
    assert_eq!(result.route, route(&["Madrid", "Malaga"]));
    assert_eq!(result.legs[0].transport_mode, TransportMode::Air);
    assert!(approx(result.total_time_min, 43.0));
    assert!(approx(result.total_cost, 15.05));
    assert!(result.total_time_min <= 480.0);
}

#[test]
fn test_same_day_after_cutoff_returns_none() {
    let (_tmp, _path, store) = create_test_store();
    seed_spain_network(store.as_ref());
    let planner = planner_for(store);

    let result = planner
        .plan_at("Madrid", "Malaga", ShipmentClass::SameDay, at(18, 30))
        .unwrap();
    assert!(result.is_none());
}

#[test]
fn test_next_day_single_rail_segment() {
    let (_tmp, _path, store) = create_test_store();
    add_facilities(
        store.as_ref(),
        &[
            ("Barcelona", FacilityRole::Warehouse),
            ("Alicante", FacilityRole::DeliveryPoint),
        ],
    );
    add_segments(
        store.as_ref(),
        &[("Barcelona", "Alicante", TransportMode::Rail, 200.0)],
    );
    let planner = planner_for(store);

    let result = planner
        .plan_at("Barcelona", "Alicante", ShipmentClass::NextDay, at(10, 0))
        .unwrap()
        .expect("次日达应有路线");

    assert_eq!(result.route, route(&["Barcelona", "Alicante"]));
    assert!(approx(result.total_time_min, 100.0));
    assert!(approx(result.total_cost, 1.6));
}

#[test]
fn test_economy_two_road_legs_without_penalty() {
    let (_tmp, _path, store) = create_test_store();
    seed_road_chain(store.as_ref());
    let planner = planner_for(store);

    let result = planner
        .plan_at("Valencia", "Santander", ShipmentClass::Economy, at(23, 59))
        .unwrap()
        .expect("经济件不限时");

    assert_eq!(result.route, route(&["Valencia", "Zaragoza", "Santander"]));
    assert_eq!(result.legs.len(), 2);
    assert!(approx(result.total_time_min, 120.0));
    assert!(approx(result.total_cost, 2.0));
}

// ==========================================
// 场景: 图结构边界
// ==========================================

#[test]
fn test_segments_are_traversed_in_both_directions() {
    let (_tmp, _path, store) = create_test_store();
    seed_road_chain(store.as_ref());
    let planner = planner_for(store);

    let result = planner
        .plan_at("Santander", "Valencia", ShipmentClass::Economy, at(9, 0))
        .unwrap()
        .expect("线段不区分方向");
    assert_eq!(result.route, route(&["Santander", "Zaragoza", "Valencia"]));
    assert_eq!(result.legs[0].from, "Santander");
    assert_eq!(result.legs[1].to, "Valencia");
}

#[test]
fn test_unreachable_destination_returns_none() {
    let (_tmp, _path, store) = create_test_store();
    add_facilities(
        store.as_ref(),
        &[("A", FacilityRole::Warehouse), ("B", FacilityRole::DeliveryPoint)],
    );
    let planner = planner_for(store);

    assert!(planner
        .plan_at("A", "B", ShipmentClass::Economy, at(9, 0))
        .unwrap()
        .is_none());
    // 未知设施同样视为无路线
    assert!(planner
        .plan_at("A", "Nowhere", ShipmentClass::Economy, at(9, 0))
        .unwrap()
        .is_none());
}

#[test]
fn test_origin_equals_destination_returns_none() {
    let (_tmp, _path, store) = create_test_store();
    seed_road_chain(store.as_ref());
    let planner = planner_for(store);

    assert!(planner
        .plan_at("Valencia", "Valencia", ShipmentClass::Economy, at(9, 0))
        .unwrap()
        .is_none());
}

#[test]
fn test_hop_limit_from_config() {
    let (_tmp, _path, store) = create_test_store();
    seed_road_chain(store.as_ref());
    let planner = RoutePlanner::new(
        store,
        PlannerConfig {
            max_hops: 1,
            ..PlannerConfig::default()
        },
    );

    assert!(planner
        .plan_at("Valencia", "Santander", ShipmentClass::Economy, at(9, 0))
        .unwrap()
        .is_none());
}

// ==========================================
// 场景: 成本选择
// ==========================================

#[test]
fn test_cheapest_parallel_mode_wins_without_deadline() {
    let (_tmp, _path, store) = create_test_store();
    seed_parallel_pair(store.as_ref());
    let planner = planner_for(store);

    let result = planner
        .plan_at("A", "B", ShipmentClass::Economy, at(9, 0))
        .unwrap()
        .unwrap();
    assert_eq!(result.legs[0].transport_mode, TransportMode::Road);
    assert!(approx(result.total_cost, 1.0));
}

#[test]
fn test_deadline_forces_faster_more_expensive_mode() {
    let (_tmp, _path, store) = create_test_store();
    seed_parallel_pair(store.as_ref());
    let planner = planner_for(store);

    // 17:30 当日达仅剩 30 分钟: 公路 60 分钟超时，航空 10 分钟可行
    let result = planner
        .plan_at("A", "B", ShipmentClass::SameDay, at(17, 30))
        .unwrap()
        .unwrap();
    assert_eq!(result.legs[0].transport_mode, TransportMode::Air);
    assert!(approx(result.total_time_min, 10.0));
}

#[test]
fn test_equal_cost_keeps_first_discovered_route() {
    let (_tmp, _path, store) = create_test_store();
    add_facilities(
        store.as_ref(),
        &[
            ("A", FacilityRole::Warehouse),
            ("X", FacilityRole::Platform),
            ("Y", FacilityRole::Platform),
            ("B", FacilityRole::DeliveryPoint),
        ],
    );
    add_segments(
        store.as_ref(),
        &[
            ("A", "X", TransportMode::Road, 100.0),
            ("X", "B", TransportMode::Road, 100.0),
            ("A", "Y", TransportMode::Road, 100.0),
            ("Y", "B", TransportMode::Road, 100.0),
        ],
    );
    let planner = planner_for(store);

    let result = planner
        .plan_at("A", "B", ShipmentClass::Economy, at(9, 0))
        .unwrap()
        .unwrap();
    assert_eq!(result.route, route(&["A", "X", "B"]));
}

#[test]
fn test_mode_change_penalty_counts_towards_deadline() {
    let (_tmp, _path, store) = create_test_store();
    add_facilities(
        store.as_ref(),
        &[
            ("A", FacilityRole::Warehouse),
            ("B", FacilityRole::Platform),
            ("C", FacilityRole::DeliveryPoint),
        ],
    );
    add_segments(
        store.as_ref(),
        &[
            ("A", "B", TransportMode::Road, 100.0),
            ("B", "C", TransportMode::Rail, 100.0),
        ],
    );
    let planner = planner_for(store);

    // 60 + 50 + 10(铁路装卸) = 120 分钟
    let result = planner
        .plan_at("A", "C", ShipmentClass::SameDay, at(16, 0))
        .unwrap()
        .unwrap();
    assert!(approx(result.total_time_min, 120.0));
    assert!(approx(result.total_cost, 1.8));
    assert_eq!(
        result.leg_modes(),
        vec![TransportMode::Road, TransportMode::Rail]
    );

    // 16:01 只剩 119 分钟
    assert!(planner
        .plan_at("A", "C", ShipmentClass::SameDay, at(16, 1))
        .unwrap()
        .is_none());
}

#[test]
fn test_only_minimum_hop_paths_are_compared() {
    let (_tmp, _path, store) = create_test_store();
    add_facilities(
        store.as_ref(),
        &[
            ("A", FacilityRole::Warehouse),
            ("C", FacilityRole::Platform),
            ("B", FacilityRole::DeliveryPoint),
        ],
    );
    add_segments(
        store.as_ref(),
        &[
            ("A", "B", TransportMode::Air, 1000.0),
            ("A", "C", TransportMode::Road, 100.0),
            ("C", "B", TransportMode::Road, 100.0),
        ],
    );
    let planner = planner_for(store);

    // 两跳公路更便宜，但不在最短跳数候选集中
    let result = planner
        .plan_at("A", "B", ShipmentClass::Economy, at(9, 0))
        .unwrap()
        .unwrap();
    assert_eq!(result.route, route(&["A", "B"]));
    assert!(approx(result.total_cost, 35.0));
}
