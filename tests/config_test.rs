// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 规划参数读取、覆写与快照恢复
// ==========================================


use chrono::NaiveTime;
use freight_routing::config::{config_keys, ConfigManager};
use freight_routing::engine::PlannerConfig;
use test_helpers::create_test_db;

#[test]
fn test_config_manager_creation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    let config_manager = ConfigManager::new(&db_path);
    assert!(
        config_manager.is_ok(),
        "ConfigManager should be created successfully"
    );
}

#[test]
fn test_planner_config_defaults() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    let config = config_manager.get_planner_config().unwrap();
    assert_eq!(config.max_hops, 10);
    assert_eq!(config.same_day_cutoff, NaiveTime::from_hms_opt(19, 0, 0).unwrap());
    assert_eq!(config.packaging_buffer_minutes, 60);
    assert_eq!(config.next_day_cutoff, NaiveTime::from_hms_opt(14, 0, 0).unwrap());
}

#[test]
fn test_values_written_by_other_connection_are_visible() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = test_helpers::open_test_connection(&db_path).expect("Failed to open db");
    conn.execute(
        "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
        [config_keys::NEXT_DAY_CUTOFF, "12:30"],
    )
    .unwrap();

    let config_manager = ConfigManager::new(&db_path).unwrap();
    assert_eq!(
        config_manager.get_next_day_cutoff().unwrap(),
        NaiveTime::from_hms_opt(12, 30, 0).unwrap()
    );
    assert_eq!(
        config_manager
            .get_global_config_value(config_keys::NEXT_DAY_CUTOFF)
            .unwrap()
            .as_deref(),
        Some("12:30")
    );
    assert!(config_manager
        .get_global_config_value("missing_key")
        .unwrap()
        .is_none());
}

#[test]
fn test_snapshot_and_restore() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).unwrap();

    config_manager
        .set_config_value(config_keys::ROUTE_MAX_HOPS, "6")
        .unwrap();
    config_manager
        .set_config_value(config_keys::PACKAGING_BUFFER_MINUTES, "30")
        .unwrap();
    let snapshot = config_manager.get_config_snapshot().unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&snapshot).unwrap();
    assert_eq!(parsed[config_keys::ROUTE_MAX_HOPS], "6");

    config_manager
        .set_config_value(config_keys::ROUTE_MAX_HOPS, "2")
        .unwrap();
    assert_eq!(config_manager.get_route_max_hops().unwrap(), 2);

    let restored = config_manager.restore_config_from_snapshot(&snapshot).unwrap();
    assert_eq!(restored, 2);
    assert_eq!(config_manager.get_route_max_hops().unwrap(), 6);
    assert_eq!(config_manager.get_packaging_buffer_minutes().unwrap(), 30);
}

#[test]
fn test_restore_rejects_malformed_snapshot() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).unwrap();

    assert!(config_manager.restore_config_from_snapshot("not json").is_err());
    assert_eq!(
        config_manager.get_planner_config().unwrap(),
        PlannerConfig::default()
    );
}
