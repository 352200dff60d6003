// ==========================================
// 多式联运物流系统 - 路线成本模型
// ==========================================
// 每段: time = 分钟/100km × (distance/100)
//       cost = 成本/100km × (distance/100)
// 运输方式与前一段不同 → 该段加上本方式的装卸时间（不加成本）
// 参数表固定，不支持运行时配置
// ==========================================

use crate::domain::{PathLeg, TransportMode};

/// 运输方式参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeParams {
    pub minutes_per_100km: f64,
    pub load_unload_minutes: f64,
    pub cost_per_100km: f64,
}

/// 运输方式参数表
pub const fn mode_params(mode: TransportMode) -> ModeParams {
    match mode {
        TransportMode::Road => ModeParams {
            minutes_per_100km: 60.0,
            load_unload_minutes: 5.0,
            cost_per_100km: 1.0,
        },
        TransportMode::Rail => ModeParams {
            minutes_per_100km: 50.0,
            load_unload_minutes: 10.0,
            cost_per_100km: 0.8,
        },
        TransportMode::Air => ModeParams {
            minutes_per_100km: 10.0,
            load_unload_minutes: 40.0,
            cost_per_100km: 3.5,
        },
        TransportMode::Sea => ModeParams {
            minutes_per_100km: 120.0,
            load_unload_minutes: 20.0,
            cost_per_100km: 0.3,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegCost {
    pub time_min: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RouteCost {
    pub total_time_min: f64,
    pub total_cost: f64,
}

// ==========================================
// RouteCostModel - 纯函数成本模型
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteCostModel;

impl RouteCostModel {
    pub fn new() -> Self {
        Self
    }

    /// 单段成本；prev_mode 为 None 表示首段
    pub fn leg_cost(
        &self,
        distance_km: f64,
        mode: TransportMode,
        prev_mode: Option<TransportMode>,
    ) -> LegCost {
        let params = mode_params(mode);
        let factor = distance_km / 100.0;

        let mut time_min = params.minutes_per_100km * factor;
        if matches!(prev_mode, Some(prev) if prev != mode) {
            time_min += params.load_unload_minutes;
        }

        LegCost {
            time_min,
            cost: params.cost_per_100km * factor,
        }
    }

    /// 按顺序累加 (distance_km, mode) 序列
    pub fn evaluate<I>(&self, legs: I) -> RouteCost
    where
        I: IntoIterator<Item = (f64, TransportMode)>,
    {
        let mut total = RouteCost::default();
        let mut prev_mode = None;
        for (distance_km, mode) in legs {
            let leg = self.leg_cost(distance_km, mode, prev_mode);
            total.total_time_min += leg.time_min;
            total.total_cost += leg.cost;
            prev_mode = Some(mode);
        }
        total
    }

    pub fn evaluate_path(&self, legs: &[PathLeg]) -> RouteCost {
        self.evaluate(legs.iter().map(|leg| (leg.distance_km, leg.transport_mode)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_single_leg_has_no_penalty() {
        let model = RouteCostModel::new();
        let cost = model.evaluate([(430.0, TransportMode::Air)]);
        assert!(approx(cost.total_time_min, 43.0));
        assert!(approx(cost.total_cost, 15.05));
    }

    #[test]
    fn test_same_mode_chain_sums_without_penalty() {
        let model = RouteCostModel::new();
        let cost = model.evaluate([(100.0, TransportMode::Road), (100.0, TransportMode::Road)]);
        assert!(approx(cost.total_time_min, 120.0));
        assert!(approx(cost.total_cost, 2.0));
    }

    #[test]
    fn test_mode_change_adds_incoming_mode_penalty() {
        let model = RouteCostModel::new();
        // road 300km: 180 min; rail 200km: 100 min + 10 装卸
        let cost = model.evaluate([(300.0, TransportMode::Road), (200.0, TransportMode::Rail)]);
        assert!(approx(cost.total_time_min, 290.0));
        assert!(approx(cost.total_cost, 3.0 + 1.6));
    }

    #[test]
    fn test_penalty_only_at_boundaries() {
        let model = RouteCostModel::new();
        // road → road → air → air → sea
        let legs = [
            (100.0, TransportMode::Road),
            (100.0, TransportMode::Road),
            (100.0, TransportMode::Air),
            (100.0, TransportMode::Air),
            (100.0, TransportMode::Sea),
        ];
        let cost = model.evaluate(legs);
        let base = 60.0 + 60.0 + 10.0 + 10.0 + 120.0;
        assert!(approx(cost.total_time_min, base + 40.0 + 20.0));
        assert!(approx(cost.total_cost, 1.0 + 1.0 + 3.5 + 3.5 + 0.3));
    }

    #[test]
    fn test_empty_sequence_is_zero() {
        let model = RouteCostModel::new();
        assert_eq!(model.evaluate(Vec::<(f64, TransportMode)>::new()), RouteCost::default());
    }

    #[test]
    fn test_leg_cost_first_leg_never_penalised() {
        let model = RouteCostModel::new();
        let leg = model.leg_cost(200.0, TransportMode::Sea, None);
        assert!(approx(leg.time_min, 240.0));
        let leg = model.leg_cost(200.0, TransportMode::Sea, Some(TransportMode::Sea));
        assert!(approx(leg.time_min, 240.0));
        let leg = model.leg_cost(200.0, TransportMode::Sea, Some(TransportMode::Rail));
        assert!(approx(leg.time_min, 260.0));
    }
}
