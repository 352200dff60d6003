// ==========================================
// SqliteGraphStore - 车辆
// ==========================================
// 红线: UNIQUE(segment_id, transport_mode)
// find-or-create 在 IMMEDIATE 事务内完成，跨连接/跨进程安全
// ==========================================

use super::{format_ts, parse_mode_column, parse_ts_column, SqliteGraphStore};
use crate::domain::{TransportMode, Vehicle, VehicleBinding};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row, TransactionBehavior};
use uuid::Uuid;

const VEHICLE_COLUMNS: &str = "vehicle_id, segment_id, transport_mode, last_node, last_update_ts";

pub(super) fn map_vehicle_row(row: &Row) -> SqliteResult<Vehicle> {
    Ok(Vehicle {
        vehicle_id: row.get(0)?,
        segment_id: row.get(1)?,
        transport_mode: parse_mode_column(2, row.get(2)?)?,
        last_node: row.get(3)?,
        last_update_ts: parse_ts_column(4, row.get(4)?)?,
    })
}

fn query_vehicle_by_segment(
    conn: &Connection,
    segment_id: i64,
    mode: TransportMode,
) -> SqliteResult<Option<Vehicle>> {
    let sql = format!(
        "SELECT {} FROM vehicle WHERE segment_id = ?1 AND transport_mode = ?2",
        VEHICLE_COLUMNS
    );
    conn.query_row(&sql, params![segment_id, mode.to_db_str()], map_vehicle_row)
        .optional()
}

impl SqliteGraphStore {
    pub(super) fn select_vehicle_by_segment(
        &self,
        segment_id: i64,
        mode: TransportMode,
    ) -> RepositoryResult<Option<Vehicle>> {
        let conn = self.get_conn()?;
        Ok(query_vehicle_by_segment(&conn, segment_id, mode)?)
    }

    pub(super) fn select_vehicle(&self, vehicle_id: &str) -> RepositoryResult<Option<Vehicle>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM vehicle WHERE vehicle_id = ?1", VEHICLE_COLUMNS);
        let vehicle = conn
            .query_row(&sql, params![vehicle_id], map_vehicle_row)
            .optional()?;
        Ok(vehicle)
    }

    /// 直接插入（已存在同一绑定时返回 UniqueConstraintViolation）
    pub(super) fn insert_vehicle(
        &self,
        segment_id: i64,
        mode: TransportMode,
        start_node: &str,
        ts: NaiveDateTime,
    ) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let vehicle_id = Uuid::new_v4().to_string();
        conn.execute(
            r#"
            INSERT INTO vehicle (vehicle_id, segment_id, transport_mode, last_node, last_update_ts)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![vehicle_id, segment_id, mode.to_db_str(), start_node, format_ts(&ts)],
        )?;
        Ok(vehicle_id)
    }

    /// 原子 find-or-create
    ///
    /// 1. BEGIN IMMEDIATE（拿写锁，阻止其他连接并发插入）
    /// 2. INSERT ... ON CONFLICT DO NOTHING
    /// 3. 事务内回读唯一绑定
    pub(super) fn upsert_vehicle_binding(
        &self,
        segment_id: i64,
        mode: TransportMode,
        start_node: &str,
        ts: NaiveDateTime,
    ) -> RepositoryResult<VehicleBinding> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let candidate_id = Uuid::new_v4().to_string();
        let inserted = tx.execute(
            r#"
            INSERT INTO vehicle (vehicle_id, segment_id, transport_mode, last_node, last_update_ts)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(segment_id, transport_mode) DO NOTHING
            "#,
            params![candidate_id, segment_id, mode.to_db_str(), start_node, format_ts(&ts)],
        )?;

        let vehicle = query_vehicle_by_segment(&tx, segment_id, mode)?.ok_or_else(|| {
            RepositoryError::DatabaseTransactionError(format!(
                "车辆绑定回读失败: segment_id={}, mode={}",
                segment_id, mode
            ))
        })?;
        tx.commit()?;

        Ok(VehicleBinding {
            created: inserted == 1 && vehicle.vehicle_id == candidate_id,
            vehicle,
        })
    }

    /// 单条 UPDATE，按调用原子生效（后写者胜）
    pub(super) fn update_vehicle_position(
        &self,
        vehicle_id: &str,
        last_node: &str,
        ts: NaiveDateTime,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let changed = conn.execute(
            "UPDATE vehicle SET last_node = ?2, last_update_ts = ?3 WHERE vehicle_id = ?1",
            params![vehicle_id, last_node, format_ts(&ts)],
        )?;
        if changed == 0 {
            return Err(RepositoryError::not_found("Vehicle", vehicle_id));
        }
        Ok(())
    }
}
