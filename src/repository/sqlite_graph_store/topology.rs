// ==========================================
// SqliteGraphStore - 网络拓扑
// ==========================================
// 路径枚举语义: 仅返回跳数最少的简单路径（边级别，
// 同一对设施间不同运输方式的线段视为不同路径），
// 跳数上限 max_hops，发现顺序 = segment_id 升序
// ==========================================

use super::{parse_mode_column, SqliteGraphStore};
use crate::domain::network::is_valid_facility_name;
use crate::domain::{Facility, FacilityRole, NetworkPath, PathLeg, Segment, TransportMode};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Result as SqliteResult, Row};
use std::collections::{HashMap, VecDeque};

const SEGMENT_COLUMNS: &str = "segment_id, from_node, to_node, distance_km, transport_mode";

fn map_segment_row(row: &Row) -> SqliteResult<Segment> {
    Ok(Segment {
        segment_id: row.get(0)?,
        from_node: row.get(1)?,
        to_node: row.get(2)?,
        distance_km: row.get(3)?,
        transport_mode: parse_mode_column(4, row.get(4)?)?,
    })
}

impl SqliteGraphStore {
    pub(super) fn insert_facility(&self, facility: &Facility) -> RepositoryResult<()> {
        if !is_valid_facility_name(&facility.name) {
            return Err(RepositoryError::InvalidFacilityName(facility.name.clone()));
        }
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO facility (name, role) VALUES (?1, ?2)",
            params![facility.name, facility.role.to_db_str()],
        )?;
        Ok(())
    }

    pub(super) fn select_facility(&self, name: &str) -> RepositoryResult<Option<Facility>> {
        let conn = self.get_conn()?;
        let facility = conn
            .query_row(
                "SELECT name, role FROM facility WHERE name = ?1",
                params![name],
                |row| {
                    let raw: String = row.get(1)?;
                    let role = raw.parse::<FacilityRole>().map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e))
                    })?;
                    Ok(Facility {
                        name: row.get(0)?,
                        role,
                    })
                },
            )
            .optional()?;
        Ok(facility)
    }

    pub(super) fn insert_segment(
        &self,
        from_node: &str,
        to_node: &str,
        distance_km: f64,
        mode: TransportMode,
    ) -> RepositoryResult<i64> {
        if !(distance_km.is_finite() && distance_km > 0.0) {
            return Err(RepositoryError::FieldValueError {
                field: "distance_km".to_string(),
                message: format!("必须为正数, got {}", distance_km),
            });
        }
        if from_node == to_node {
            return Err(RepositoryError::ValidationError(format!(
                "线段两端不能相同: {}",
                from_node
            )));
        }
        for node in [from_node, to_node] {
            if self.select_facility(node)?.is_none() {
                return Err(RepositoryError::UnknownFacility(node.to_string()));
            }
        }
        if let Some(existing) = self.select_segment(from_node, to_node, Some(mode))? {
            return Err(RepositoryError::UniqueConstraintViolation(format!(
                "线段已存在: {} <-> {} (mode={}, segment_id={})",
                from_node, to_node, mode, existing.segment_id
            )));
        }

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO segment (from_node, to_node, distance_km, transport_mode)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![from_node, to_node, distance_km, mode.to_db_str()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 查找 a-b 之间的线段；mode 为 None 时取任意运输方式
    ///
    /// 同向录入的线段优先，其次按 segment_id
    pub(super) fn select_segment(
        &self,
        a: &str,
        b: &str,
        mode: Option<TransportMode>,
    ) -> RepositoryResult<Option<Segment>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT {}
            FROM segment
            WHERE ((from_node = ?1 AND to_node = ?2) OR (from_node = ?2 AND to_node = ?1))
              AND (?3 IS NULL OR transport_mode = ?3)
            ORDER BY (from_node = ?1) DESC, segment_id ASC
            LIMIT 1
            "#,
            SEGMENT_COLUMNS
        );
        let segment = conn
            .query_row(
                &sql,
                params![a, b, mode.map(|m| m.to_db_str())],
                map_segment_row,
            )
            .optional()?;
        Ok(segment)
    }

    fn load_segments(&self) -> RepositoryResult<Vec<Segment>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM segment ORDER BY segment_id ASC", SEGMENT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let segments = stmt
            .query_map([], map_segment_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(segments)
    }

    /// 枚举跳数最少的全部路径
    pub(super) fn enumerate_shortest_paths(
        &self,
        origin: &str,
        destination: &str,
        max_hops: usize,
    ) -> RepositoryResult<Vec<NetworkPath>> {
        if origin == destination || max_hops == 0 {
            return Ok(Vec::new());
        }

        let segments = self.load_segments()?;

        // 无向邻接表，保持 segment_id 顺序
        let mut adjacency: HashMap<&str, Vec<(&Segment, &str)>> = HashMap::new();
        for seg in &segments {
            adjacency
                .entry(seg.from_node.as_str())
                .or_default()
                .push((seg, seg.to_node.as_str()));
            adjacency
                .entry(seg.to_node.as_str())
                .or_default()
                .push((seg, seg.from_node.as_str()));
        }

        // 1. BFS 求跳数
        let mut hops: HashMap<&str, usize> = HashMap::new();
        let mut queue = VecDeque::new();
        hops.insert(origin, 0);
        queue.push_back(origin);
        while let Some(node) = queue.pop_front() {
            let depth = hops[node];
            if depth >= max_hops || hops.contains_key(destination) {
                continue;
            }
            for &(_, next) in adjacency.get(node).map(Vec::as_slice).unwrap_or(&[]) {
                if !hops.contains_key(next) {
                    hops.insert(next, depth + 1);
                    queue.push_back(next);
                }
            }
        }

        let target_depth = match hops.get(destination) {
            Some(d) => *d,
            None => {
                tracing::debug!(origin, destination, max_hops, "跳数上限内不可达");
                return Ok(Vec::new());
            }
        };

        // 2. 沿 hops 严格递增的边 DFS，收集全部最短路径
        let mut paths = Vec::new();
        let mut nodes = vec![origin.to_string()];
        let mut legs = Vec::new();
        collect_paths(
            origin,
            destination,
            target_depth,
            &adjacency,
            &hops,
            &mut nodes,
            &mut legs,
            &mut paths,
        );

        tracing::debug!(
            origin,
            destination,
            hop_count = target_depth,
            path_count = paths.len(),
            "最短跳数路径枚举完成"
        );
        Ok(paths)
    }
}

#[allow(clippy::too_many_arguments)]
fn collect_paths(
    current: &str,
    destination: &str,
    target_depth: usize,
    adjacency: &HashMap<&str, Vec<(&Segment, &str)>>,
    hops: &HashMap<&str, usize>,
    nodes: &mut Vec<String>,
    legs: &mut Vec<PathLeg>,
    out: &mut Vec<NetworkPath>,
) {
    if current == destination {
        out.push(NetworkPath {
            nodes: nodes.clone(),
            legs: legs.clone(),
        });
        return;
    }
    if legs.len() >= target_depth {
        return;
    }

    let depth = legs.len();
    for &(seg, next) in adjacency.get(current).map(Vec::as_slice).unwrap_or(&[]) {
        if hops.get(next) != Some(&(depth + 1)) {
            continue;
        }
        nodes.push(next.to_string());
        legs.push(PathLeg {
            segment_id: seg.segment_id,
            from: current.to_string(),
            to: next.to_string(),
            distance_km: seg.distance_km,
            transport_mode: seg.transport_mode,
        });
        collect_paths(next, destination, target_depth, adjacency, hops, nodes, legs, out);
        legs.pop();
        nodes.pop();
    }
}
