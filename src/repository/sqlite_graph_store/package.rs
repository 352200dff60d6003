// ==========================================
// SqliteGraphStore - 包裹
// ==========================================
// route / leg_modes 以 "->" 连接后存储
// package_vehicle.link_order 决定主车辆（最小者）
// ==========================================

use super::fleet::map_vehicle_row;
use super::{format_ts, parse_ts_column, SqliteGraphStore};
use crate::domain::network::is_valid_facility_name;
use crate::domain::package::{decode_leg_modes, decode_route, encode_leg_modes, encode_route};
use crate::domain::{NewPackage, Package, ShipmentClass, Vehicle};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use uuid::Uuid;

fn validate_new_package(package: &NewPackage) -> RepositoryResult<()> {
    if package.route.is_empty() {
        return Err(RepositoryError::ValidationError("包裹路线为空".to_string()));
    }
    if let Some(bad) = package.route.iter().find(|n| !is_valid_facility_name(n)) {
        return Err(RepositoryError::InvalidFacilityName(bad.clone()));
    }
    if !package.leg_modes.is_empty() && package.leg_modes.len() + 1 != package.route.len() {
        return Err(RepositoryError::FieldValueError {
            field: "leg_modes".to_string(),
            message: format!(
                "段数与路线不一致: legs={}, nodes={}",
                package.leg_modes.len(),
                package.route.len()
            ),
        });
    }
    Ok(())
}

fn execute_insert_package(conn: &Connection, package: &NewPackage) -> RepositoryResult<String> {
    let package_id = Uuid::new_v4().to_string();
    conn.execute(
        r#"
        INSERT INTO package (
            package_id, purchase_ref, shipment_class, route, leg_modes,
            total_time_min, total_cost, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            package_id,
            package.purchase_ref,
            package.shipment_class.code(),
            encode_route(&package.route),
            encode_leg_modes(&package.leg_modes),
            package.total_time_min,
            package.total_cost,
            format_ts(&package.created_at),
        ],
    )?;
    Ok(package_id)
}

fn execute_link_vehicle(
    conn: &Connection,
    package_id: &str,
    vehicle_id: &str,
    link_order: usize,
) -> RepositoryResult<()> {
    conn.execute(
        r#"
        INSERT INTO package_vehicle (package_id, vehicle_id, link_order)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(package_id, vehicle_id) DO NOTHING
        "#,
        params![package_id, vehicle_id, link_order as i64],
    )?;
    Ok(())
}

impl SqliteGraphStore {
    pub(super) fn insert_package(&self, package: &NewPackage) -> RepositoryResult<String> {
        validate_new_package(package)?;
        let conn = self.get_conn()?;
        execute_insert_package(&conn, package)
    }

    /// 包裹与全部车辆关系在同一事务内写入；任一关系失败则整体回滚
    pub(super) fn insert_package_with_vehicles(
        &self,
        package: &NewPackage,
        vehicle_ids: &[String],
    ) -> RepositoryResult<String> {
        validate_new_package(package)?;
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let package_id = execute_insert_package(&tx, package)?;
        for (order, vehicle_id) in vehicle_ids.iter().enumerate() {
            execute_link_vehicle(&tx, &package_id, vehicle_id, order)?;
        }

        tx.commit()?;
        Ok(package_id)
    }

    pub(super) fn insert_package_vehicle(
        &self,
        package_id: &str,
        vehicle_id: &str,
        link_order: usize,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        execute_link_vehicle(&conn, package_id, vehicle_id, link_order)
    }

    pub(super) fn select_package(&self, package_id: &str) -> RepositoryResult<Option<Package>> {
        let conn = self.get_conn()?;
        let package = conn
            .query_row(
                r#"
                SELECT package_id, purchase_ref, shipment_class, route, leg_modes,
                       total_time_min, total_cost, created_at
                FROM package
                WHERE package_id = ?1
                "#,
                params![package_id],
                |row| {
                    let class_code: i64 = row.get(2)?;
                    let shipment_class = ShipmentClass::try_from(class_code).map_err(|code| {
                        rusqlite::Error::IntegralValueOutOfRange(2, code)
                    })?;
                    let raw_modes: String = row.get(4)?;
                    let leg_modes = decode_leg_modes(&raw_modes).map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e))
                    })?;
                    Ok(Package {
                        package_id: row.get(0)?,
                        purchase_ref: row.get(1)?,
                        shipment_class,
                        route: decode_route(&row.get::<_, String>(3)?),
                        leg_modes,
                        total_time_min: row.get(5)?,
                        total_cost: row.get(6)?,
                        created_at: parse_ts_column(7, row.get(7)?)?,
                    })
                },
            )
            .optional()?;
        Ok(package)
    }

    pub(super) fn select_package_vehicles(&self, package_id: &str) -> RepositoryResult<Vec<Vehicle>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT v.vehicle_id, v.segment_id, v.transport_mode, v.last_node, v.last_update_ts
            FROM package_vehicle pv
            JOIN vehicle v ON v.vehicle_id = pv.vehicle_id
            WHERE pv.package_id = ?1
            ORDER BY pv.link_order ASC
            "#,
        )?;
        let vehicles = stmt
            .query_map(params![package_id], map_vehicle_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(vehicles)
    }
}
