// ==========================================
// 多式联运物流系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和 API 实例
// 一个数据库连接由存储层与配置层共享
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::ShipmentApi;
use crate::config::config_manager::ConfigManager;
use crate::engine::{FleetAssignmentManager, PackageTracker, PlannerConfig, RoutePlanner};
use crate::repository::{GraphStore, SqliteGraphStore};

const DB_PATH_ENV: &str = "FREIGHT_ROUTING_DB_PATH";

/// 应用状态
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 启动时加载的规划参数
    pub planner_config: PlannerConfig,

    /// 图存储
    pub store: Arc<dyn GraphStore>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    pub route_planner: Arc<RoutePlanner>,
    pub fleet_manager: Arc<FleetAssignmentManager>,
    pub package_tracker: Arc<PackageTracker>,

    /// 发货 API
    pub shipment_api: Arc<ShipmentApi>,
}

impl AppState {
    /// 创建新的 AppState 实例
    ///
    /// 1. 打开数据库并初始化 schema
    /// 2. 加载规划参数（config_kv 覆写默认值）
    /// 3. 组装引擎与 API
    ///
    /// 规划参数只在启动时读取；修改 config_kv 后需重建 AppState
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let mut conn = crate::db::open_and_init(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        crate::perf::install_sqlite_tracing(&mut conn);
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 存储层 + 配置
        // ==========================================
        let store: Arc<dyn GraphStore> = Arc::new(
            SqliteGraphStore::from_connection(conn.clone())
                .map_err(|e| format!("无法初始化图存储: {}", e))?,
        );
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法初始化配置管理器: {}", e))?,
        );
        let planner_config = config_manager
            .get_planner_config()
            .map_err(|e| format!("无法加载规划参数: {}", e))?;
        tracing::info!(?planner_config, "规划参数已加载");

        // ==========================================
        // 引擎层
        // ==========================================
        let route_planner = Arc::new(RoutePlanner::new(store.clone(), planner_config.clone()));
        let fleet_manager = Arc::new(FleetAssignmentManager::new(store.clone()));
        let package_tracker = Arc::new(PackageTracker::new(store.clone()));

        // ==========================================
        // API 层
        // ==========================================
        let shipment_api = Arc::new(ShipmentApi::new(
            store.clone(),
            route_planner.clone(),
            fleet_manager.clone(),
            package_tracker.clone(),
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            planner_config,
            store,
            config_manager,
            route_planner,
            fleet_manager,
            package_tracker,
            shipment_api,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 FREIGHT_ROUTING_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./freight_routing.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("freight-routing");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("freight_routing.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }
}
