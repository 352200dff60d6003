// ==========================================
// 多式联运物流系统 - 包裹追踪引擎
// ==========================================
// create: 同一事务内写入包裹 + 包裹-车辆 关系
// status: 由主车辆（第一辆关联车辆）最后位置推导
//         当前位置与剩余时间；纯读取，不落库、不缓存
// ==========================================

use crate::domain::package::NewPackage;
use crate::domain::{Package, PackageStatus, RouteResult, ShipmentClass};
use crate::engine::cost_model::RouteCostModel;
use crate::engine::error::{LogisticsError, LogisticsResult};
use crate::repository::GraphStore;
use chrono::{Local, NaiveDateTime};
use std::sync::Arc;
use tracing::instrument;

// ==========================================
// PackageTracker - 包裹追踪
// ==========================================
pub struct PackageTracker {
    store: Arc<dyn GraphStore>,
    cost_model: RouteCostModel,
}

impl PackageTracker {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self {
            store,
            cost_model: RouteCostModel::new(),
        }
    }

    /// 创建包裹，返回 package_id
    pub fn create(
        &self,
        purchase_ref: &str,
        shipment_class: ShipmentClass,
        route_result: &RouteResult,
        vehicle_ids: &[String],
    ) -> LogisticsResult<String> {
        self.create_at(
            purchase_ref,
            shipment_class,
            route_result,
            vehicle_ids,
            Local::now().naive_local(),
        )
    }

    #[instrument(skip(self, route_result, vehicle_ids), fields(vehicle_count = vehicle_ids.len()))]
    pub fn create_at(
        &self,
        purchase_ref: &str,
        shipment_class: ShipmentClass,
        route_result: &RouteResult,
        vehicle_ids: &[String],
        created_at: NaiveDateTime,
    ) -> LogisticsResult<String> {
        if route_result.route.is_empty() {
            return Err(LogisticsError::InvalidRoute("路线为空".to_string()));
        }

        let package = NewPackage {
            purchase_ref: purchase_ref.to_string(),
            shipment_class,
            route: route_result.route.clone(),
            leg_modes: route_result.leg_modes(),
            total_time_min: route_result.total_time_min,
            total_cost: route_result.total_cost,
            created_at,
        };
        let package_id = self
            .store
            .create_package_with_vehicles(&package, vehicle_ids)?;

        tracing::info!(package_id = %package_id, "包裹已创建");
        Ok(package_id)
    }

    /// 查询包裹状态
    ///
    /// # 规则
    /// 1. 包裹不存在 → None
    /// 2. 无关联车辆 → 位于起点，剩余时间 = 计划总时间
    /// 3. 否则取第一辆关联车辆的 last_node
    /// 4. 从起点重走路线，仅累计起点为 last_node 的段及其之后各段；
    ///    last_node 不是任何段的起点 → 剩余时间 = 计划总时间
    #[instrument(skip(self))]
    pub fn status(&self, package_id: &str) -> LogisticsResult<Option<PackageStatus>> {
        let package = match self.store.get_package(package_id)? {
            Some(p) => p,
            None => return Ok(None),
        };

        let vehicles = self.store.get_vehicles_for_package(package_id)?;
        let lead = match vehicles.first() {
            Some(v) => v,
            None => {
                let origin = package.route.first().cloned().unwrap_or_default();
                return Ok(Some(PackageStatus {
                    purchase_ref: package.purchase_ref,
                    current_location: origin,
                    remaining_time_min: package.total_time_min,
                }));
            }
        };

        let remaining = self.remaining_time_from(&package, &lead.last_node)?;
        tracing::debug!(
            lead_vehicle = %lead.vehicle_id,
            last_node = %lead.last_node,
            remaining_time_min = remaining,
            "包裹状态推导完成"
        );

        Ok(Some(PackageStatus {
            purchase_ref: package.purchase_ref,
            current_location: lead.last_node.clone(),
            remaining_time_min: remaining,
        }))
    }

    /// 从 last_node 所在段起的剩余时间（装卸惩罚按完整路线计算）
    pub fn remaining_time_from(&self, package: &Package, last_node: &str) -> LogisticsResult<f64> {
        let mut remaining = 0.0;
        let mut started = false;
        let mut prev_mode = None;

        for (idx, pair) in package.route.windows(2).enumerate() {
            let (start, end) = (pair[0].as_str(), pair[1].as_str());
            let segment = match package.leg_modes.get(idx) {
                Some(&mode) => self.store.find_segment(start, end, mode)?.ok_or_else(|| {
                    LogisticsError::NoSuchSegment {
                        from: start.to_string(),
                        to: end.to_string(),
                        mode,
                    }
                })?,
                None => self.store.find_any_segment(start, end)?.ok_or_else(|| {
                    LogisticsError::NoSegmentBetween {
                        from: start.to_string(),
                        to: end.to_string(),
                    }
                })?,
            };

            let leg = self
                .cost_model
                .leg_cost(segment.distance_km, segment.transport_mode, prev_mode);
            prev_mode = Some(segment.transport_mode);

            if start == last_node {
                started = true;
            }
            if started {
                remaining += leg.time_min;
            }
        }

        if !started {
            // 车辆尚未出发（或位置不在路线段起点上）
            return Ok(package.total_time_min);
        }
        Ok(remaining)
    }
}
