//! SQLite-backed order store
//!
//! The store holds a single `warehouse_orders` table. Access is gated by a
//! credential: the first import records a SHA-256 digest of it, and every
//! later open must present the same credential.
//!
//! Handles are scoped. Use [`OrderStore::with`] (or keep the handle in a
//! local) so the connection is released when the work is done; there is no
//! process-wide connection.

mod queries;
mod schema;

use std::fmt;
use std::path::{Path, PathBuf};

use log::debug;
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Name of the order table
pub const ORDERS_TABLE: &str = "warehouse_orders";

/// Secret that unlocks the store. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Lowercase hex SHA-256 of the secret
    fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(****)")
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no store credential configured (set WAB_DB_PASSWORD, --db-password, or db_password in config.yaml)")]
    MissingCredential,

    #[error("store credential rejected for {0}")]
    InvalidCredential(PathBuf),

    #[error("order store not found at {0}. Run 'wab import <csv>' to create it.")]
    NotFound(PathBuf),

    #[error("{0} is not an initialized order store")]
    Uninitialized(PathBuf),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// An open connection to the order store
pub struct OrderStore {
    conn: Connection,
    path: PathBuf,
}

impl OrderStore {
    /// Open an existing store for reading
    pub fn open(path: &Path, credential: Option<&Credential>) -> Result<Self, StoreError> {
        let credential = credential.ok_or(StoreError::MissingCredential)?;
        if !path.exists() {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        let store = Self {
            conn,
            path: path.to_path_buf(),
        };
        store.verify(credential)?;
        debug!("opened order store {} (read-only)", path.display());
        Ok(store)
    }

    /// Open a store for writing, creating file and schema if needed
    ///
    /// A new store records the credential's digest; an existing store must
    /// match it before anything is written. A database that already holds
    /// other tables but no credential is refused.
    pub fn create(path: &Path, credential: Option<&Credential>) -> Result<Self, StoreError> {
        let credential = credential.ok_or(StoreError::MissingCredential)?;

        let conn = Connection::open(path)?;
        let mut store = Self {
            conn,
            path: path.to_path_buf(),
        };

        if store.stored_digest()?.is_some() {
            store.verify(credential)?;
            store.init_schema()?;
        } else {
            if store.has_user_tables()? {
                return Err(StoreError::Uninitialized(path.to_path_buf()));
            }
            store.init_schema()?;
            store.record_digest(credential)?;
            debug!("initialized order store {}", path.display());
        }
        Ok(store)
    }

    /// Run `f` against a read-only handle that is dropped when `f` returns
    pub fn with<T, E, F>(path: &Path, credential: Option<&Credential>, f: F) -> Result<T, E>
    where
        F: FnOnce(&OrderStore) -> Result<T, E>,
        E: From<StoreError>,
    {
        let store = Self::open(path, credential)?;
        let result = f(&store);
        drop(store);
        debug!("released order store {}", path.display());
        result
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn verify(&self, credential: &Credential) -> Result<(), StoreError> {
        match self.stored_digest()? {
            Some(digest) if digest == credential.digest() => Ok(()),
            Some(_) => Err(StoreError::InvalidCredential(self.path.clone())),
            None => Err(StoreError::Uninitialized(self.path.clone())),
        }
    }

    fn stored_digest(&self) -> Result<Option<String>, StoreError> {
        let has_table: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'store_access'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        if has_table.is_none() {
            return Ok(None);
        }

        let digest = self
            .conn
            .query_row(
                "SELECT credential_sha256 FROM store_access WHERE id = 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(digest)
    }

    fn has_user_tables(&self) -> Result<bool, StoreError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn record_digest(&mut self, credential: &Credential) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO store_access (id, credential_sha256) VALUES (1, ?1)",
            [credential.digest()],
        )?;
        Ok(())
    }
}
