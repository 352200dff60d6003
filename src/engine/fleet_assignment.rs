// ==========================================
// 多式联运物流系统 - 车队分配引擎
// ==========================================
// 职责: 为路线每一段分配车辆
// 红线: 每个 (线段, 运输方式) 只有一辆车；重复分配必须复用
// ==========================================
// 并发: 读到“无车辆”后走存储层原子 find-or-create，
//       两个并发请求不会各自新建车辆
// ==========================================

use crate::domain::{PathLeg, TransportMode};
use crate::engine::error::{LogisticsError, LogisticsResult};
use crate::repository::{GraphStore, RepositoryError};
use chrono::{Local, NaiveDateTime};
use std::sync::Arc;
use tracing::instrument;

// ==========================================
// FleetAssignmentManager - 车队分配
// ==========================================
pub struct FleetAssignmentManager {
    store: Arc<dyn GraphStore>,
}

impl FleetAssignmentManager {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// 整条路线使用同一运输方式分配车辆
    ///
    /// # 返回
    /// - 每对相邻设施一个 vehicle_id，顺序与路线一致
    /// - 任一段不存在该运输方式的线段 → Err(NoSuchSegment)
    #[instrument(skip(self, route, mode), fields(hops = route.len().saturating_sub(1), mode = %mode))]
    pub fn assign(&self, route: &[String], mode: TransportMode) -> LogisticsResult<Vec<String>> {
        let now = Local::now().naive_local();
        let vehicle_ids = route
            .windows(2)
            .map(|pair| self.assign_pair(&pair[0], &pair[1], mode, now))
            .collect::<LogisticsResult<Vec<_>>>()?;

        tracing::info!(vehicle_count = vehicle_ids.len(), "车辆分配完成");
        Ok(vehicle_ids)
    }

    /// 多式联运路线: 每段使用自身的运输方式
    #[instrument(skip(self, legs), fields(hops = legs.len()))]
    pub fn assign_legs(&self, legs: &[PathLeg]) -> LogisticsResult<Vec<String>> {
        if let Some(gap) = legs.windows(2).find(|w| w[0].to != w[1].from) {
            return Err(LogisticsError::InvalidRoute(format!(
                "路段不连续: {} -> {} / {} -> {}",
                gap[0].from, gap[0].to, gap[1].from, gap[1].to
            )));
        }

        let now = Local::now().naive_local();
        let vehicle_ids = legs
            .iter()
            .map(|leg| self.assign_pair(&leg.from, &leg.to, leg.transport_mode, now))
            .collect::<LogisticsResult<Vec<_>>>()?;

        tracing::info!(vehicle_count = vehicle_ids.len(), "多式联运车辆分配完成");
        Ok(vehicle_ids)
    }

    fn assign_pair(
        &self,
        start: &str,
        end: &str,
        mode: TransportMode,
        now: NaiveDateTime,
    ) -> LogisticsResult<String> {
        // 1. 线段必须存在
        let segment = self
            .store
            .find_segment(start, end, mode)?
            .ok_or_else(|| LogisticsError::NoSuchSegment {
                from: start.to_string(),
                to: end.to_string(),
                mode,
            })?;

        // 2. 已有车辆 → 复用
        if let Some(vehicle) = self.store.find_vehicle_for_segment(segment.segment_id, mode)? {
            tracing::debug!(
                segment_id = segment.segment_id,
                vehicle_id = %vehicle.vehicle_id,
                "复用车辆"
            );
            return Ok(vehicle.vehicle_id);
        }

        // 3. 原子 find-or-create（并发时可能复用他人刚建的车辆）
        let binding = self
            .store
            .find_or_create_vehicle(segment.segment_id, mode, start, now)?;
        tracing::debug!(
            segment_id = segment.segment_id,
            vehicle_id = %binding.vehicle.vehicle_id,
            created = binding.created,
            "车辆绑定"
        );
        Ok(binding.vehicle.vehicle_id)
    }

    /// 车辆经过 next_node：覆写最后位置并刷新时间戳
    ///
    /// 不校验 next_node 与上一位置是否相邻，由调用方保证顺序
    pub fn update_position(&self, vehicle_id: &str, next_node: &str) -> LogisticsResult<()> {
        self.update_position_at(vehicle_id, next_node, Local::now().naive_local())
    }

    pub fn update_position_at(
        &self,
        vehicle_id: &str,
        next_node: &str,
        ts: NaiveDateTime,
    ) -> LogisticsResult<()> {
        match self.store.update_vehicle(vehicle_id, next_node, ts) {
            Ok(()) => {
                tracing::info!(vehicle_id, next_node, "车辆位置已更新");
                Ok(())
            }
            Err(RepositoryError::NotFound { .. }) => {
                Err(LogisticsError::VehicleNotFound(vehicle_id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
