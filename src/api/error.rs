// ==========================================
// 多式联运物流系统 - API 层错误类型
// ==========================================
// 职责: 将仓储/引擎错误转换为调用方可读的错误消息
// ==========================================

use crate::engine::error::LogisticsError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 请求错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("线段不存在: {0}")]
    NoSuchSegment(String),

    #[error("无效的路线: {0}")]
    InvalidRoute(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("存储繁忙，请稍后重试: {0}")]
    StoreBusy(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::StoreBusy(msg) => ApiError::StoreBusy(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }

            // 网络拓扑
            RepositoryError::UnknownFacility(name) => {
                ApiError::NotFound(format!("设施 {} 不存在", name))
            }
            RepositoryError::InvalidFacilityName(name) => {
                ApiError::InvalidInput(format!("设施名称非法: {}", name))
            }

            // 数据质量
            RepositoryError::ValidationError(msg) => ApiError::ValidationError(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InternalError(format!("存储字段{}无法解析: {}", field, message))
            }

            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 LogisticsError 转换
// ==========================================
impl From<LogisticsError> for ApiError {
    fn from(err: LogisticsError) -> Self {
        match err {
            e @ (LogisticsError::NoSuchSegment { .. } | LogisticsError::NoSegmentBetween { .. }) => {
                ApiError::NoSuchSegment(e.to_string())
            }
            LogisticsError::InvalidShipmentClass(code) => {
                ApiError::InvalidInput(format!("发货等级 {} 无效，仅支持 1/2/3", code))
            }
            LogisticsError::InvalidRoute(msg) => ApiError::InvalidRoute(msg),
            LogisticsError::VehicleNotFound(id) => {
                ApiError::NotFound(format!("Vehicle(id={})不存在", id))
            }
            LogisticsError::Repository(e) => e.into(),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransportMode;

    #[test]
    fn test_repository_error_conversion() {
        let api_err: ApiError = RepositoryError::NotFound {
            entity: "Package".to_string(),
            id: "P001".to_string(),
        }
        .into();
        match api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("Package"));
                assert!(msg.contains("P001"));
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }

        let api_err: ApiError = RepositoryError::StoreBusy("locked".to_string()).into();
        assert!(matches!(api_err, ApiError::StoreBusy(_)));
    }

    #[test]
    fn test_logistics_error_conversion() {
        let api_err: ApiError = LogisticsError::NoSuchSegment {
            from: "Madrid".to_string(),
            to: "Lisboa".to_string(),
            mode: TransportMode::Rail,
        }
        .into();
        match api_err {
            ApiError::NoSuchSegment(msg) => {
                assert!(msg.contains("Madrid"));
                assert!(msg.contains("RAIL"));
            }
            other => panic!("Expected NoSuchSegment, got {:?}", other),
        }

        let api_err: ApiError = LogisticsError::InvalidShipmentClass(7).into();
        assert!(matches!(api_err, ApiError::InvalidInput(_)));

        let api_err: ApiError =
            LogisticsError::Repository(RepositoryError::LockError("poisoned".to_string())).into();
        assert!(matches!(api_err, ApiError::DatabaseConnectionError(_)));
    }
}
