// ==========================================
// 多式联运物流系统 - 路线规划引擎
// ==========================================
// 流程:
// 1. GraphStore 枚举最短跳数候选路径（跳数上限 10）
// 2. RouteCostModel 计算每条候选的 (time, cost)
// 3. 按发货等级计算可用时间并过滤
// 4. 取成本最低者；同成本按发现顺序先到先得
// ==========================================
// 已知限制: 候选集仅含最短跳数路径，跳数更多但更便宜的路径不参与比较
// ==========================================

use crate::domain::{NetworkPath, RouteResult, ShipmentClass};
use crate::engine::cost_model::{RouteCost, RouteCostModel};
use crate::engine::error::LogisticsResult;
use crate::repository::GraphStore;
use chrono::{Duration, Local, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

// ==========================================
// PlannerConfig - 规划参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// 图查询跳数上限
    pub max_hops: usize,
    /// 当日达截止时间（未扣除打包时间）
    pub same_day_cutoff: NaiveTime,
    /// 打包缓冲（分钟）
    pub packaging_buffer_minutes: i64,
    /// 次日达截止时间
    pub next_day_cutoff: NaiveTime,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_hops: 10,
            same_day_cutoff: NaiveTime::from_hms_opt(19, 0, 0).unwrap_or(NaiveTime::MIN),
            packaging_buffer_minutes: 60,
            next_day_cutoff: NaiveTime::from_hms_opt(14, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl PlannerConfig {
    /// 计算可用分钟数
    ///
    /// - SameDay: 今日截止时间 - 打包缓冲（可为负）
    /// - NextDay: 次日截止时间；无法表示次日时为负无穷（全部候选超时）
    /// - Economy: None（不限时）
    pub fn available_minutes(&self, shipment_class: ShipmentClass, now: NaiveDateTime) -> Option<f64> {
        let deadline = match shipment_class {
            ShipmentClass::SameDay => {
                now.date().and_time(self.same_day_cutoff)
                    - Duration::minutes(self.packaging_buffer_minutes)
            }
            ShipmentClass::NextDay => match now.date().succ_opt() {
                Some(next_day) => next_day.and_time(self.next_day_cutoff),
                None => return Some(f64::NEG_INFINITY),
            },
            ShipmentClass::Economy => return None,
        };
        Some(minutes_between(now, deadline))
    }
}

/// 已评分的候选路径
#[derive(Debug, Clone)]
struct ScoredCandidate {
    path: NetworkPath,
    cost: RouteCost,
}

// ==========================================
// RoutePlanner - 路线规划引擎
// ==========================================
pub struct RoutePlanner {
    store: Arc<dyn GraphStore>,
    cost_model: RouteCostModel,
    config: PlannerConfig,
}

impl RoutePlanner {
    pub fn new(store: Arc<dyn GraphStore>, config: PlannerConfig) -> Self {
        Self {
            store,
            cost_model: RouteCostModel::new(),
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// 以当前本地时间规划
    pub fn plan(
        &self,
        origin: &str,
        destination: &str,
        shipment_class: ShipmentClass,
    ) -> LogisticsResult<Option<RouteResult>> {
        self.plan_at(origin, destination, shipment_class, Local::now().naive_local())
    }

    /// 以指定时刻规划
    ///
    /// # 返回
    /// - Ok(Some(RouteResult)): 满足时效的最低成本路线
    /// - Ok(None): 无候选路径，或全部候选超出时效
    /// - Err: 存储故障
    #[instrument(skip(self), fields(class = %shipment_class))]
    pub fn plan_at(
        &self,
        origin: &str,
        destination: &str,
        shipment_class: ShipmentClass,
        now: NaiveDateTime,
    ) -> LogisticsResult<Option<RouteResult>> {
        let paths = self
            .store
            .find_paths(origin, destination, self.config.max_hops)?;

        if paths.is_empty() {
            tracing::info!("图查询未返回候选路径");
            return Ok(None);
        }

        let available = self.available_minutes(shipment_class, now);
        let candidate_count = paths.len();

        let feasible = paths.into_iter().filter_map(|path| {
            let cost = self.cost_model.evaluate_path(&path.legs);
            let fits = available.map_or(true, |limit| cost.total_time_min <= limit);
            if !fits {
                tracing::debug!(
                    route = ?path.nodes,
                    time_min = cost.total_time_min,
                    available_min = ?available,
                    "候选路径超出时效"
                );
            }
            fits.then_some(ScoredCandidate { path, cost })
        });

        let best = select_cheapest(feasible);

        match best {
            Some(candidate) => {
                tracing::info!(
                    route = ?candidate.path.nodes,
                    total_time_min = candidate.cost.total_time_min,
                    total_cost = candidate.cost.total_cost,
                    candidate_count,
                    "路线规划完成"
                );
                Ok(Some(RouteResult {
                    route: candidate.path.nodes,
                    legs: candidate.path.legs,
                    total_time_min: candidate.cost.total_time_min,
                    total_cost: candidate.cost.total_cost,
                }))
            }
            None => {
                tracing::info!(
                    candidate_count,
                    available_min = ?available,
                    "无满足时效的候选路线"
                );
                Ok(None)
            }
        }
    }

    /// 计算可用分钟数（见 PlannerConfig::available_minutes）
    pub fn available_minutes(&self, shipment_class: ShipmentClass, now: NaiveDateTime) -> Option<f64> {
        self.config.available_minutes(shipment_class, now)
    }
}

fn minutes_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / 60_000.0
}

/// 最低成本；严格小于才替换，保证同成本时先发现者胜
fn select_cheapest<I>(candidates: I) -> Option<ScoredCandidate>
where
    I: IntoIterator<Item = ScoredCandidate>,
{
    candidates.into_iter().fold(None, |best, candidate| match best {
        Some(current) if candidate.cost.total_cost >= current.cost.total_cost => Some(current),
        _ => Some(candidate),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PathLeg, TransportMode};
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 12)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn candidate(tag: &str, cost: f64) -> ScoredCandidate {
        ScoredCandidate {
            path: NetworkPath {
                nodes: vec!["A".to_string(), tag.to_string()],
                legs: vec![PathLeg {
                    segment_id: 1,
                    from: "A".to_string(),
                    to: tag.to_string(),
                    distance_km: 100.0,
                    transport_mode: TransportMode::Road,
                }],
            },
            cost: RouteCost {
                total_time_min: 60.0,
                total_cost: cost,
            },
        }
    }

    fn config() -> PlannerConfig {
        PlannerConfig::default()
    }

    #[test]
    fn test_same_day_window_ends_at_1800() {
        let p = config();
        assert_eq!(p.available_minutes(ShipmentClass::SameDay, at(10, 0)), Some(480.0));
        assert_eq!(p.available_minutes(ShipmentClass::SameDay, at(17, 30)), Some(30.0));
    }

    #[test]
    fn test_same_day_window_negative_after_1800() {
        let p = config();
        assert_eq!(p.available_minutes(ShipmentClass::SameDay, at(18, 30)), Some(-30.0));
    }

    #[test]
    fn test_next_day_window_ends_at_1400_tomorrow() {
        let p = config();
        // 10:00 → 次日 14:00 = 28 小时
        assert_eq!(p.available_minutes(ShipmentClass::NextDay, at(10, 0)), Some(28.0 * 60.0));
        // 23:00 → 次日 14:00 = 15 小时
        assert_eq!(p.available_minutes(ShipmentClass::NextDay, at(23, 0)), Some(15.0 * 60.0));
    }

    #[test]
    fn test_next_day_without_representable_tomorrow_rejects_all() {
        let p = config();
        let last_day = NaiveDate::MAX.and_hms_opt(10, 0, 0).unwrap();
        let available = p.available_minutes(ShipmentClass::NextDay, last_day).unwrap();
        assert!(available.is_infinite() && available < 0.0);
    }

    #[test]
    fn test_economy_is_unconstrained() {
        let p = config();
        assert_eq!(p.available_minutes(ShipmentClass::Economy, at(23, 59)), None);
    }

    #[test]
    fn test_select_cheapest_keeps_first_on_tie() {
        let best = select_cheapest(vec![
            candidate("X", 5.0),
            candidate("Y", 3.0),
            candidate("Z", 3.0),
        ])
        .unwrap();
        assert_eq!(best.path.nodes[1], "Y");
    }

    #[test]
    fn test_custom_cutoffs() {
        let p = PlannerConfig {
            same_day_cutoff: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            packaging_buffer_minutes: 30,
            ..PlannerConfig::default()
        };
        assert_eq!(p.available_minutes(ShipmentClass::SameDay, at(19, 0)), Some(30.0));
    }

    #[test]
    fn test_select_cheapest_empty() {
        assert!(select_cheapest(Vec::<ScoredCandidate>::new()).is_none());
    }
}
