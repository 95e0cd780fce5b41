//! Reads and writes against the order table

use log::{debug, info, warn};
use rusqlite::params;

use super::{OrderStore, StoreError};
use crate::entities::{Observation, Order, ProcessGroup};

/// The one query the analysis runs
pub const OBSERVATION_QUERY: &str = r#"
SELECT
    process_group,
    processing_time_min,
    labor_cost
FROM warehouse_orders
"#;

/// Row counts of one write to the order table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    pub removed: usize,
    pub inserted: usize,
}

impl OrderStore {
    /// Load the analysis columns for every order
    ///
    /// Rows labelled anything other than exactly `A` or `B` are skipped.
    pub fn load_observations(&self) -> Result<Vec<Observation>, StoreError> {
        let mut stmt = self.conn.prepare(OBSERVATION_QUERY)?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, f64>(2)?,
            ))
        })?;

        let mut observations = Vec::new();
        let mut skipped = 0usize;
        for row in rows {
            let (label, time, cost) = row?;
            match label.parse::<ProcessGroup>() {
                Ok(group) => observations.push(Observation::new(group, time, cost)),
                Err(_) => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(
                "ignored {} orders with a process group other than A or B",
                skipped
            );
        }
        info!(
            "loaded {} observations from {}",
            observations.len(),
            self.path.display()
        );
        Ok(observations)
    }

    pub fn count_orders(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM warehouse_orders", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Write orders in one transaction, first deleting existing rows unless
    /// `append` is set. On any failure the table is left as it was.
    pub fn replace_orders(
        &mut self,
        orders: &[Order],
        append: bool,
    ) -> Result<WriteSummary, StoreError> {
        let tx = self.conn.transaction()?;
        let removed = if append {
            0
        } else {
            tx.execute("DELETE FROM warehouse_orders", [])?
        };
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO warehouse_orders (
                    order_id, order_date, process_group, warehouse_id, picker_id,
                    items_count, processing_time_min, labor_cost, error_flag, on_time_delivery
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
            )?;
            for order in orders {
                stmt.execute(params![
                    order.order_id,
                    order.order_date.to_string(),
                    order.process_group.as_str(),
                    order.warehouse_id,
                    order.picker_id,
                    order.items_count,
                    order.processing_time_min,
                    order.labor_cost,
                    order.error_flag,
                    order.on_time_delivery,
                ])?;
            }
        }
        tx.commit()?;
        debug!("removed {} orders, inserted {}", removed, orders.len());
        Ok(WriteSummary {
            removed,
            inserted: orders.len(),
        })
    }
}
