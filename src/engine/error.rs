// ==========================================
// 多式联运物流系统 - 引擎层错误类型
// ==========================================
// 无可行路线 ≠ 错误（返回 None）
// 线段/运输方式不存在 = 本次请求致命错误
// 存储故障原样传播，引擎层不重试
// ==========================================

use crate::domain::TransportMode;
use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogisticsError {
    #[error("线段不存在: {from} -> {to} (mode={mode})")]
    NoSuchSegment {
        from: String,
        to: String,
        mode: TransportMode,
    },

    #[error("设施之间没有任何线段: {from} -> {to}")]
    NoSegmentBetween { from: String, to: String },

    #[error("无效的发货等级: {0} (仅支持 1/2/3)")]
    InvalidShipmentClass(i64),

    #[error("无效的路线: {0}")]
    InvalidRoute(String),

    #[error("车辆不存在: {0}")]
    VehicleNotFound(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type LogisticsResult<T> = Result<T, LogisticsError>;
