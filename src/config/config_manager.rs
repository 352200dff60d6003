// ==========================================
// 多式联运物流系统 - 配置管理器
// ==========================================
// 职责: 规划参数加载、覆写、快照
// 存储: config_kv 表 (key-value + scope，当前仅 global)
// 运输方式参数表不在此处，固定在成本模型中
// ==========================================

use crate::db::open_sqlite_connection;
use crate::engine::route_planner::PlannerConfig;
use chrono::NaiveTime;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

const TIME_FORMAT: &str = "%H:%M";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// 要求 config_kv 表已存在（见 db::init_schema）
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager（会重新应用统一 PRAGMA，幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        tracing::info!(config_key = key, value, "配置已更新");
        Ok(())
    }

    /// 读取并解析配置；缺失用默认值，格式错误告警后用默认值
    fn get_parsed_or_default<T, F>(
        &self,
        key: &str,
        default: T,
        parse: F,
    ) -> Result<T, Box<dyn Error>>
    where
        F: Fn(&str) -> Option<T>,
    {
        let raw = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };

        match parse(raw.trim()) {
            Some(value) => Ok(value),
            None => {
                tracing::warn!(config_key = key, raw_value = %raw, "配置格式错误，使用默认值");
                Ok(default)
            }
        }
    }

    // ===== 规划参数 =====

    /// 图查询跳数上限（必须 ≥ 1）
    pub fn get_route_max_hops(&self) -> Result<usize, Box<dyn Error>> {
        let default = PlannerConfig::default().max_hops;
        self.get_parsed_or_default(config_keys::ROUTE_MAX_HOPS, default, |s| {
            usize::from_str(s).ok().filter(|&hops| hops >= 1)
        })
    }

    pub fn get_same_day_cutoff(&self) -> Result<NaiveTime, Box<dyn Error>> {
        let default = PlannerConfig::default().same_day_cutoff;
        self.get_parsed_or_default(config_keys::SAME_DAY_CUTOFF, default, parse_time)
    }

    /// 打包缓冲（分钟，≥ 0）
    pub fn get_packaging_buffer_minutes(&self) -> Result<i64, Box<dyn Error>> {
        let default = PlannerConfig::default().packaging_buffer_minutes;
        self.get_parsed_or_default(config_keys::PACKAGING_BUFFER_MINUTES, default, |s| {
            i64::from_str(s).ok().filter(|&m| m >= 0)
        })
    }

    pub fn get_next_day_cutoff(&self) -> Result<NaiveTime, Box<dyn Error>> {
        let default = PlannerConfig::default().next_day_cutoff;
        self.get_parsed_or_default(config_keys::NEXT_DAY_CUTOFF, default, parse_time)
    }

    /// 汇总为 RoutePlanner 使用的参数
    pub fn get_planner_config(&self) -> Result<PlannerConfig, Box<dyn Error>> {
        Ok(PlannerConfig {
            max_hops: self.get_route_max_hops()?,
            same_day_cutoff: self.get_same_day_cutoff()?,
            packaging_buffer_minutes: self.get_packaging_buffer_minutes()?,
            next_day_cutoff: self.get_next_day_cutoff()?,
        })
    }

    // ===== 快照 =====

    /// 获取所有 global 配置的快照（JSON 对象，key → value）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let config_map = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<HashMap<String, String>, _>>()?;

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 从快照恢复配置，返回写入的配置项数量
    ///
    /// 覆盖同名 global 配置；快照中不存在的键保持不变
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> Result<usize, Box<dyn Error>> {
        let config_map: HashMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value, updated_at)
                 VALUES ('global', ?1, ?2, datetime('now'))
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
                params![key, value],
            )?;
        }

        tx.commit()?;
        tracing::info!(restored = count, "配置快照已恢复");
        Ok(count)
    }
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, TIME_FORMAT).ok()
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 路径搜索
    pub const ROUTE_MAX_HOPS: &str = "route_max_hops";

    // 时效窗口 (HH:MM)
    pub const SAME_DAY_CUTOFF: &str = "same_day_cutoff";
    pub const PACKAGING_BUFFER_MINUTES: &str = "packaging_buffer_minutes";
    pub const NEXT_DAY_CUTOFF: &str = "next_day_cutoff";
}
