// ==========================================
// 多式联运物流系统 - SQLite 图存储实现
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化
// ==========================================
// 子模块:
// - topology: 设施/线段/路径枚举
// - fleet: 车辆 find-or-create / 位置更新
// - package: 包裹与 包裹-车辆 关系
// ==========================================

mod fleet;
mod package;
mod topology;

use crate::db::{init_schema, open_and_init, DB_DATETIME_FORMAT};
use crate::domain::{
    Facility, NetworkPath, NewPackage, Package, Segment, TransportMode, Vehicle, VehicleBinding,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::graph_store::GraphStore;
use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

// ==========================================
// SqliteGraphStore - 图存储
// ==========================================
pub struct SqliteGraphStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteGraphStore {
    /// 打开数据库文件并确保 schema 存在
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let mut conn = open_and_init(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        crate::perf::install_sqlite_tracing(&mut conn);
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（与其他仓储共享连接）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let store = Self { conn };
        {
            let conn = store.get_conn()?;
            init_schema(&conn)?;
        }
        Ok(store)
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

// ==========================================
// 行解析辅助
// ==========================================

pub(crate) fn parse_mode_column(idx: usize, raw: String) -> rusqlite::Result<TransportMode> {
    raw.parse::<TransportMode>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn parse_ts_column(idx: usize, raw: String) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(&raw, DB_DATETIME_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn format_ts(ts: &NaiveDateTime) -> String {
    ts.format(DB_DATETIME_FORMAT).to_string()
}

// ==========================================
// GraphStore Trait 实现
// ==========================================
impl GraphStore for SqliteGraphStore {
    fn create_facility(&self, facility: &Facility) -> RepositoryResult<()> {
        self.insert_facility(facility)
    }

    fn get_facility(&self, name: &str) -> RepositoryResult<Option<Facility>> {
        self.select_facility(name)
    }

    fn create_segment(
        &self,
        from_node: &str,
        to_node: &str,
        distance_km: f64,
        mode: TransportMode,
    ) -> RepositoryResult<i64> {
        self.insert_segment(from_node, to_node, distance_km, mode)
    }

    fn find_paths(
        &self,
        origin: &str,
        destination: &str,
        max_hops: usize,
    ) -> RepositoryResult<Vec<NetworkPath>> {
        self.enumerate_shortest_paths(origin, destination, max_hops)
    }

    fn find_segment(
        &self,
        a: &str,
        b: &str,
        mode: TransportMode,
    ) -> RepositoryResult<Option<Segment>> {
        self.select_segment(a, b, Some(mode))
    }

    fn find_any_segment(&self, a: &str, b: &str) -> RepositoryResult<Option<Segment>> {
        self.select_segment(a, b, None)
    }

    fn find_vehicle_for_segment(
        &self,
        segment_id: i64,
        mode: TransportMode,
    ) -> RepositoryResult<Option<Vehicle>> {
        self.select_vehicle_by_segment(segment_id, mode)
    }

    fn create_vehicle(
        &self,
        segment_id: i64,
        mode: TransportMode,
        start_node: &str,
        ts: NaiveDateTime,
    ) -> RepositoryResult<String> {
        self.insert_vehicle(segment_id, mode, start_node, ts)
    }

    fn find_or_create_vehicle(
        &self,
        segment_id: i64,
        mode: TransportMode,
        start_node: &str,
        ts: NaiveDateTime,
    ) -> RepositoryResult<VehicleBinding> {
        self.upsert_vehicle_binding(segment_id, mode, start_node, ts)
    }

    fn get_vehicle(&self, vehicle_id: &str) -> RepositoryResult<Option<Vehicle>> {
        self.select_vehicle(vehicle_id)
    }

    fn update_vehicle(
        &self,
        vehicle_id: &str,
        last_node: &str,
        ts: NaiveDateTime,
    ) -> RepositoryResult<()> {
        self.update_vehicle_position(vehicle_id, last_node, ts)
    }

    fn create_package(&self, package: &NewPackage) -> RepositoryResult<String> {
        self.insert_package(package)
    }

    fn create_package_with_vehicles(
        &self,
        package: &NewPackage,
        vehicle_ids: &[String],
    ) -> RepositoryResult<String> {
        self.insert_package_with_vehicles(package, vehicle_ids)
    }

    fn link_package_vehicle(
        &self,
        package_id: &str,
        vehicle_id: &str,
        link_order: usize,
    ) -> RepositoryResult<()> {
        self.insert_package_vehicle(package_id, vehicle_id, link_order)
    }

    fn get_package(&self, package_id: &str) -> RepositoryResult<Option<Package>> {
        self.select_package(package_id)
    }

    fn get_vehicles_for_package(&self, package_id: &str) -> RepositoryResult<Vec<Vehicle>> {
        self.select_package_vehicles(package_id)
    }
}
