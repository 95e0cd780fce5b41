//! Database schema initialization

use super::{OrderStore, StoreError};

impl OrderStore {
    /// Create tables if they do not exist yet
    pub(super) fn init_schema(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            r#"
            -- Digest of the store credential (single row)
            CREATE TABLE IF NOT EXISTS store_access (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                credential_sha256 TEXT NOT NULL
            );

            -- One row per warehouse order; appended imports may repeat ids
            CREATE TABLE IF NOT EXISTS warehouse_orders (
                order_id TEXT NOT NULL,
                order_date TEXT NOT NULL,
                process_group TEXT NOT NULL,
                warehouse_id TEXT NOT NULL,
                picker_id TEXT NOT NULL,
                items_count INTEGER NOT NULL,
                processing_time_min REAL NOT NULL,
                labor_cost REAL NOT NULL,
                error_flag INTEGER NOT NULL,
                on_time_delivery INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_orders_id ON warehouse_orders(order_id);
            CREATE INDEX IF NOT EXISTS idx_orders_group ON warehouse_orders(process_group);
            CREATE INDEX IF NOT EXISTS idx_orders_date ON warehouse_orders(order_date);
            "#,
        )?;
        Ok(())
    }
}
