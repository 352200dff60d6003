// ==========================================
// ShipmentApi 端到端测试
// ==========================================
// 测试范围: AppState 组装 → 规划 → 分配 → 建包 → 追踪 → 位置上报
// ==========================================


use freight_routing::api::ApiError;
use freight_routing::app::AppState;
use freight_routing::config::config_keys;
use freight_routing::domain::TransportMode;
use test_helpers::*;

fn setup() -> (tempfile::NamedTempFile, AppState) {
    let (tmp, db_path) = create_test_db().expect("Failed to create test db");
    let state = AppState::new(db_path).expect("Failed to create AppState");
    seed_spain_network(state.store.as_ref());
    (tmp, state)
}

fn package_count(db_path: &str) -> i64 {
    let conn = open_test_connection(db_path).unwrap();
    conn.query_row("SELECT COUNT(*) FROM package", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn test_full_shipment_flow() {
    let (_tmp, state) = setup();
    let api = state.shipment_api.clone();

    let receipt = api
        .plan_shipment_at("PO-2024-001", "Madrid", "Malaga", 1, at(10, 0))
        .unwrap()
        .expect("当日达应受理");

    assert_eq!(receipt.route.route, route(&["Madrid", "Malaga"]));
    assert_eq!(receipt.vehicle_ids.len(), 1);
    assert!(approx(receipt.route.total_time_min, 43.0));

    let package = api.get_package(&receipt.package_id).unwrap().unwrap();
    assert_eq!(package.purchase_ref, "PO-2024-001");
    assert_eq!(package.leg_modes, vec![TransportMode::Air]);

    let status = api.track_package(&receipt.package_id).unwrap().unwrap();
    assert_eq!(status.current_location, "Madrid");
    assert!(approx(status.remaining_time_min, 43.0));

    api.report_vehicle_position_at(&receipt.vehicle_ids[0], "Malaga", at(10, 45))
        .unwrap();
    let status = api.track_package(&receipt.package_id).unwrap().unwrap();
    assert_eq!(status.current_location, "Malaga");
}

#[test]
fn test_second_shipment_reuses_vehicle() {
    let (_tmp, state) = setup();
    let api = &state.shipment_api;

    let first = api
        .plan_shipment_at("PO-1", "Madrid", "Granada", 3, at(9, 0))
        .unwrap()
        .unwrap();
    let second = api
        .plan_shipment_at("PO-2", "Granada", "Madrid", 3, at(9, 5))
        .unwrap()
        .unwrap();

    assert_ne!(first.package_id, second.package_id);
    assert_eq!(first.vehicle_ids, second.vehicle_ids);
}

#[test]
fn test_infeasible_shipment_creates_nothing() {
    let (_tmp, state) = setup();

    let receipt = state
        .shipment_api
        .plan_shipment_at("PO-LATE", "Madrid", "Malaga", 1, at(18, 30))
        .unwrap();
    assert!(receipt.is_none());
    assert_eq!(package_count(&state.db_path), 0);
}

#[test]
fn test_invalid_requests() {
    let (_tmp, state) = setup();
    let api = &state.shipment_api;

    assert!(matches!(
        api.plan_shipment_at("PO-1", "Madrid", "Malaga", 7, at(9, 0)),
        Err(ApiError::InvalidInput(_))
    ));
    assert!(matches!(
        api.plan_shipment_at("  ", "Madrid", "Malaga", 3, at(9, 0)),
        Err(ApiError::InvalidInput(_))
    ));
    assert!(matches!(
        api.report_vehicle_position("ghost", "Madrid"),
        Err(ApiError::NotFound(_))
    ));
    assert!(api.track_package("ghost").unwrap().is_none());
    assert!(api.get_package("ghost").unwrap().is_none());
}

#[test]
fn test_config_override_extends_same_day_window() {
    let (tmp, db_path) = create_test_db().expect("Failed to create test db");
    {
        let state = AppState::new(db_path.clone()).unwrap();
        seed_spain_network(state.store.as_ref());
        state
            .config_manager
            .set_config_value(config_keys::SAME_DAY_CUTOFF, "21:00")
            .unwrap();
    }

    // 规划参数在启动时读取
    let state = AppState::new(db_path).unwrap();
    assert_eq!(state.planner_config.same_day_cutoff.to_string(), "21:00:00");

    let receipt = state
        .shipment_api
        .plan_shipment_at("PO-EVENING", "Madrid", "Malaga", 1, at(18, 30))
        .unwrap();
    assert!(receipt.is_some());
    drop(tmp);
}
