// ==========================================
// 多式联运物流系统 - 图存储接口
// ==========================================
// 职责: 引擎层访问运输网络/车辆/包裹的唯一边界
// 红线: 接口不含业务逻辑; 引擎层不拼 SQL
// ==========================================

use crate::domain::{
    Facility, NetworkPath, NewPackage, Package, Segment, TransportMode, Vehicle, VehicleBinding,
};
use crate::repository::error::RepositoryResult;
use chrono::NaiveDateTime;

/// 图存储 Trait
///
/// # 实现说明
/// - `SqliteGraphStore` 为默认实现
/// - 所有方法必须是 `Send + Sync` 安全的，引擎通过 `Arc<dyn GraphStore>` 共享
pub trait GraphStore: Send + Sync {
    // ===== 网络拓扑 =====

    /// 新建设施（网络初始化用）
    fn create_facility(&self, facility: &Facility) -> RepositoryResult<()>;

    fn get_facility(&self, name: &str) -> RepositoryResult<Option<Facility>>;

    /// 新建线段，返回 segment_id
    fn create_segment(
        &self,
        from_node: &str,
        to_node: &str,
        distance_km: f64,
        mode: TransportMode,
    ) -> RepositoryResult<i64>;

    /// 枚举 origin → destination 之间跳数最少的全部简单路径
    ///
    /// # 返回
    /// - 跳数 ≤ max_hops 的最短跳数路径（按发现顺序）
    /// - 不可达或超出跳数上限时返回空列表
    fn find_paths(
        &self,
        origin: &str,
        destination: &str,
        max_hops: usize,
    ) -> RepositoryResult<Vec<NetworkPath>>;

    /// 查找 a 与 b 之间指定运输方式的线段（不区分方向）
    fn find_segment(&self, a: &str, b: &str, mode: TransportMode)
        -> RepositoryResult<Option<Segment>>;

    /// 查找 a 与 b 之间任意运输方式的第一条线段
    fn find_any_segment(&self, a: &str, b: &str) -> RepositoryResult<Option<Segment>>;

    // ===== 车辆 =====

    fn find_vehicle_for_segment(
        &self,
        segment_id: i64,
        mode: TransportMode,
    ) -> RepositoryResult<Option<Vehicle>>;

    /// 新建车辆并绑定线段，返回 vehicle_id
    fn create_vehicle(
        &self,
        segment_id: i64,
        mode: TransportMode,
        start_node: &str,
        ts: NaiveDateTime,
    ) -> RepositoryResult<String>;

    /// 原子 find-or-create：同一 (线段, 运输方式) 只会存在一辆车
    fn find_or_create_vehicle(
        &self,
        segment_id: i64,
        mode: TransportMode,
        start_node: &str,
        ts: NaiveDateTime,
    ) -> RepositoryResult<VehicleBinding>;

    fn get_vehicle(&self, vehicle_id: &str) -> RepositoryResult<Option<Vehicle>>;

    /// 覆写车辆位置；车辆不存在时返回 NotFound
    fn update_vehicle(
        &self,
        vehicle_id: &str,
        last_node: &str,
        ts: NaiveDateTime,
    ) -> RepositoryResult<()>;

    // ===== 包裹 =====

    /// 新建包裹，返回 package_id
    fn create_package(&self, package: &NewPackage) -> RepositoryResult<String>;

    /// 原子写入包裹及其车辆关系（link_order = 下标），返回 package_id
    ///
    /// 任一关系写入失败时不留下包裹记录
    fn create_package_with_vehicles(
        &self,
        package: &NewPackage,
        vehicle_ids: &[String],
    ) -> RepositoryResult<String>;

    /// 建立 包裹 -使用-> 车辆 关系，link_order 决定主车辆
    fn link_package_vehicle(
        &self,
        package_id: &str,
        vehicle_id: &str,
        link_order: usize,
    ) -> RepositoryResult<()>;

    fn get_package(&self, package_id: &str) -> RepositoryResult<Option<Package>>;

    /// 包裹关联的车辆（按 link_order 升序）
    fn get_vehicles_for_package(&self, package_id: &str) -> RepositoryResult<Vec<Vehicle>>;
}
