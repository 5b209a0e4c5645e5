//! SQLite persistence layer.
//!
//! RULE: only store.rs talks to the database. The engine and the analyzers
//! call [`OrderSource`] methods; they never execute SQL directly.

use crate::error::AnalyticsResult;
use crate::period::AnalyticsPeriod;
use crate::records::{
    parse_timestamp, CustomerLifetime, OrderItemRecord, OrderRecord, OrderStatus,
};
use crate::request::Scope;
use crate::source::OrderSource;
use crate::types::{BranchId, OrderId, Phone};
use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection};
use std::collections::BTreeMap;

/// Upper bound on `IN (...)` placeholders per statement, under SQLite's
/// default variable limit.
const SQL_IN_CHUNK: usize = 500;

pub struct OrderStore {
    conn: Connection,
}

impl OrderStore {
    pub fn open(path: &str) -> AnalyticsResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> AnalyticsResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> AnalyticsResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_orders.sql"))?;
        Ok(())
    }

    // ── Writes ───────────────────────────────────────────────────────────────

    pub fn insert_order(&self, order: &OrderRecord) -> AnalyticsResult<()> {
        self.conn.execute(
            "INSERT INTO orders
                (order_id, branch_id, customer_phone, placed_at, status, total_amount)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                order.id,
                order.branch_id,
                order.customer_phone,
                order.placed_at.to_rfc3339(),
                order.status.as_str(),
                order.total_amount,
            ],
        )?;
        Ok(())
    }

    pub fn insert_order_item(&self, item: &OrderItemRecord) -> AnalyticsResult<()> {
        self.conn.execute(
            "INSERT INTO order_items
                (order_id, product_id, product_name, quantity, unit_price)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                item.order_id,
                item.product_id,
                item.product_name,
                item.quantity as i64,
                item.unit_price,
            ],
        )?;
        Ok(())
    }

    // ── Counts (runner summaries and tests) ──────────────────────────────────

    pub fn order_count(&self) -> AnalyticsResult<i64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM orders", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn item_count(&self) -> AnalyticsResult<i64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM order_items", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn customer_count(&self) -> AnalyticsResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT customer_phone) FROM orders",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // ── Scope-aware reads ────────────────────────────────────────────────────

    fn branch_orders(
        &self,
        branch_id: &str,
        period: &AnalyticsPeriod,
    ) -> AnalyticsResult<Vec<OrderRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT order_id, branch_id, customer_phone, placed_at, status, total_amount
             FROM orders
             WHERE branch_id = ?1
               AND date(placed_at) >= ?2 AND date(placed_at) <= ?3",
        )?;
        let raw = stmt
            .query_map(
                params![
                    branch_id,
                    period.start.format("%Y-%m-%d").to_string(),
                    period.end.format("%Y-%m-%d").to_string(),
                ],
                |row| {
                    Ok((
                        row.get::<_, OrderId>(0)?,
                        row.get::<_, BranchId>(1)?,
                        row.get::<_, Phone>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, f64>(5)?,
                    ))
                },
            )?
            .collect::<Result<Vec<_>, _>>()?;

        let mut orders = Vec::with_capacity(raw.len());
        for (id, branch, phone, placed_at, status, total_amount) in raw {
            orders.push(OrderRecord {
                id,
                branch_id: branch,
                customer_phone: phone,
                placed_at: parse_timestamp(&placed_at)?,
                status: OrderStatus::parse(&status)?,
                total_amount,
            });
        }
        Ok(orders)
    }
}

impl OrderSource for OrderStore {
    fn fetch_orders(
        &self,
        scope: &Scope,
        period: &AnalyticsPeriod,
    ) -> AnalyticsResult<Vec<OrderRecord>> {
        let mut orders = Vec::new();
        for branch_id in scope.branch_list() {
            orders.extend(self.branch_orders(&branch_id, period)?);
        }
        orders.sort_by(|a, b| a.placed_at.cmp(&b.placed_at).then_with(|| a.id.cmp(&b.id)));
        Ok(orders)
    }

    fn fetch_order_items(
        &self,
        _scope: &Scope,
        order_ids: &[OrderId],
    ) -> AnalyticsResult<Vec<OrderItemRecord>> {
        let mut items = Vec::new();
        for chunk in order_ids.chunks(SQL_IN_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "SELECT order_id, product_id, product_name, quantity, unit_price
                 FROM order_items
                 WHERE order_id IN ({placeholders})
                 ORDER BY item_id"
            );
            let mut stmt = self.conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(chunk.iter()), |row| {
                    Ok(OrderItemRecord {
                        order_id: row.get(0)?,
                        product_id: row.get(1)?,
                        product_name: row.get(2)?,
                        quantity: row.get::<_, i64>(3)? as u64,
                        unit_price: row.get(4)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            items.extend(rows);
        }
        Ok(items)
    }

    fn fetch_first_order_dates(
        &self,
        scope: &Scope,
    ) -> AnalyticsResult<BTreeMap<Phone, DateTime<Utc>>> {
        let mut first_orders: BTreeMap<Phone, DateTime<Utc>> = BTreeMap::new();
        for branch_id in scope.branch_list() {
            let mut stmt = self.conn.prepare(
                "SELECT customer_phone, MIN(placed_at)
                 FROM orders
                 WHERE branch_id = ?1
                 GROUP BY customer_phone",
            )?;
            let rows = stmt
                .query_map(params![branch_id], |row| {
                    Ok((row.get::<_, Phone>(0)?, row.get::<_, String>(1)?))
                })?
                .collect::<Result<Vec<_>, _>>()?;

            for (phone, raw_first) in rows {
                let first_at = parse_timestamp(&raw_first)?;
                first_orders
                    .entry(phone)
                    .and_modify(|existing| {
                        if first_at < *existing {
                            *existing = first_at;
                        }
                    })
                    .or_insert(first_at);
            }
        }
        Ok(first_orders)
    }

    fn fetch_customer_lifetimes(&self, scope: &Scope) -> AnalyticsResult<Vec<CustomerLifetime>> {
        // Revenue-bearing spend only; cancelled and refunded orders still
        // count toward the lifetime order count.
        let mut merged: BTreeMap<Phone, CustomerLifetime> = BTreeMap::new();
        for branch_id in scope.branch_list() {
            let mut stmt = self.conn.prepare(
                "SELECT customer_phone,
                        MIN(placed_at),
                        COUNT(*),
                        COALESCE(SUM(CASE WHEN status IN ('cancelled', 'refunded')
                                          THEN 0 ELSE total_amount END), 0.0)
                 FROM orders
                 WHERE branch_id = ?1
                 GROUP BY customer_phone",
            )?;
            let rows = stmt
                .query_map(params![branch_id], |row| {
                    Ok((
                        row.get::<_, Phone>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, f64>(3)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;

            for (phone, raw_first, order_count, total_spend) in rows {
                let first_order_at = parse_timestamp(&raw_first)?;
                merged
                    .entry(phone.clone())
                    .and_modify(|existing| {
                        existing.first_order_at = existing.first_order_at.min(first_order_at);
                        existing.order_count += order_count as u64;
                        existing.total_spend += total_spend;
                    })
                    .or_insert(CustomerLifetime {
                        phone,
                        first_order_at,
                        order_count: order_count as u64,
                        total_spend,
                    });
            }
        }
        Ok(merged.into_values().collect())
    }
}
