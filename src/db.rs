// ==========================================
// 多式联运物流系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 建表幂等，可在任意连接上重复执行
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 时间戳存储格式
pub const DB_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 创建全部业务表（幂等）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL DEFAULT 'global',
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS facility (
            name TEXT PRIMARY KEY,
            role TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS segment (
            segment_id INTEGER PRIMARY KEY AUTOINCREMENT,
            from_node TEXT NOT NULL REFERENCES facility(name),
            to_node TEXT NOT NULL REFERENCES facility(name),
            distance_km REAL NOT NULL CHECK (distance_km > 0),
            transport_mode TEXT NOT NULL,
            UNIQUE (from_node, to_node, transport_mode)
        );

        -- 线段无向: 同一设施对 + 运输方式只允许一条（不论录入方向）
        CREATE UNIQUE INDEX IF NOT EXISTS idx_segment_unordered_pair
            ON segment(min(from_node, to_node), max(from_node, to_node), transport_mode);

        CREATE INDEX IF NOT EXISTS idx_segment_from ON segment(from_node);
        CREATE INDEX IF NOT EXISTS idx_segment_to ON segment(to_node);

        CREATE TABLE IF NOT EXISTS vehicle (
            vehicle_id TEXT PRIMARY KEY,
            segment_id INTEGER NOT NULL REFERENCES segment(segment_id),
            transport_mode TEXT NOT NULL,
            last_node TEXT NOT NULL,
            last_update_ts TEXT NOT NULL,
            UNIQUE (segment_id, transport_mode)
        );

        CREATE TABLE IF NOT EXISTS package (
            package_id TEXT PRIMARY KEY,
            purchase_ref TEXT NOT NULL,
            shipment_class INTEGER NOT NULL,
            route TEXT NOT NULL,
            leg_modes TEXT NOT NULL DEFAULT '',
            total_time_min REAL NOT NULL,
            total_cost REAL NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_package_purchase_ref ON package(purchase_ref);

        CREATE TABLE IF NOT EXISTS package_vehicle (
            package_id TEXT NOT NULL REFERENCES package(package_id) ON DELETE CASCADE,
            vehicle_id TEXT NOT NULL REFERENCES vehicle(vehicle_id),
            link_order INTEGER NOT NULL,
            PRIMARY KEY (package_id, vehicle_id)
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 打开连接并确保 schema 存在；版本不一致时仅告警
pub fn open_and_init(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = open_sqlite_connection(db_path)?;
    init_schema(&conn)?;
    match read_schema_version(&conn)? {
        Some(v) if v > CURRENT_SCHEMA_VERSION => {
            tracing::warn!(
                db_version = v,
                expected = CURRENT_SCHEMA_VERSION,
                "数据库 schema 版本高于当前代码版本"
            );
        }
        _ => {}
    }
    Ok(conn)
}
