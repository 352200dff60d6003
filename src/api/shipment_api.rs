// ==========================================
// 多式联运物流系统 - 发货 API
// ==========================================
// 职责: 单次同步请求编排
//   规划路线 → 分配车辆 → 创建包裹
// 以及包裹追踪、车辆位置上报
// ==========================================

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::{Package, PackageStatus, RouteResult, ShipmentClass};
use crate::engine::error::LogisticsError;
use crate::engine::{FleetAssignmentManager, PackageTracker, RoutePlanner};
use crate::repository::GraphStore;

// ==========================================
// ShipmentReceipt - 发货回执
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentReceipt {
    pub package_id: String,
    pub route: RouteResult,
    /// 与 route.legs 一一对应
    pub vehicle_ids: Vec<String>,
}

// ==========================================
// ShipmentApi - 发货 API
// ==========================================
pub struct ShipmentApi {
    store: Arc<dyn GraphStore>,
    planner: Arc<RoutePlanner>,
    fleet: Arc<FleetAssignmentManager>,
    tracker: Arc<PackageTracker>,
}

impl ShipmentApi {
    pub fn new(
        store: Arc<dyn GraphStore>,
        planner: Arc<RoutePlanner>,
        fleet: Arc<FleetAssignmentManager>,
        tracker: Arc<PackageTracker>,
    ) -> Self {
        Self {
            store,
            planner,
            fleet,
            tracker,
        }
    }

    /// 规划并下单
    ///
    /// # 参数
    /// - purchase_ref: 外部订单号（原样保存）
    /// - shipment_class: 1=当日达, 2=次日达, 3=经济
    ///
    /// # 返回
    /// - Ok(None): 没有满足时效的路线（不创建包裹，不分配车辆）
    pub fn plan_shipment(
        &self,
        purchase_ref: &str,
        origin: &str,
        destination: &str,
        shipment_class: i64,
    ) -> ApiResult<Option<ShipmentReceipt>> {
        self.plan_shipment_at(
            purchase_ref,
            origin,
            destination,
            shipment_class,
            Local::now().naive_local(),
        )
    }

    pub fn plan_shipment_at(
        &self,
        purchase_ref: &str,
        origin: &str,
        destination: &str,
        shipment_class: i64,
        now: NaiveDateTime,
    ) -> ApiResult<Option<ShipmentReceipt>> {
        let _perf = crate::perf::PerfGuard::new("shipment.plan");

        if purchase_ref.trim().is_empty() {
            return Err(ApiError::InvalidInput("purchase_ref 不能为空".to_string()));
        }
        let class = ShipmentClass::try_from(shipment_class)
            .map_err(LogisticsError::InvalidShipmentClass)?;

        let route = match self.planner.plan_at(origin, destination, class, now)? {
            Some(r) => r,
            None => {
                info!(purchase_ref, origin, destination, "无可行路线，未创建包裹");
                return Ok(None);
            }
        };

        let vehicle_ids = self.fleet.assign_legs(&route.legs)?;
        let package_id = self
            .tracker
            .create_at(purchase_ref, class, &route, &vehicle_ids, now)?;

        info!(
            purchase_ref,
            package_id = %package_id,
            total_time_min = route.total_time_min,
            total_cost = route.total_cost,
            "发货已受理"
        );

        Ok(Some(ShipmentReceipt {
            package_id,
            route,
            vehicle_ids,
        }))
    }

    /// 查询包裹当前状态；包裹不存在返回 None
    pub fn track_package(&self, package_id: &str) -> ApiResult<Option<PackageStatus>> {
        let _perf = crate::perf::PerfGuard::new("shipment.track");
        Ok(self.tracker.status(package_id)?)
    }

    /// 车辆位置上报
    pub fn report_vehicle_position(&self, vehicle_id: &str, next_node: &str) -> ApiResult<()> {
        let _perf = crate::perf::PerfGuard::new("shipment.report_position");
        debug!(vehicle_id, next_node, "收到车辆位置上报");
        Ok(self.fleet.update_position(vehicle_id, next_node)?)
    }

    pub fn report_vehicle_position_at(
        &self,
        vehicle_id: &str,
        next_node: &str,
        ts: NaiveDateTime,
    ) -> ApiResult<()> {
        Ok(self.fleet.update_position_at(vehicle_id, next_node, ts)?)
    }

    pub fn get_package(&self, package_id: &str) -> ApiResult<Option<Package>> {
        Ok(self.store.get_package(package_id)?)
    }
}
