//! Core module - configuration, storage and data generation

pub mod config;
pub mod flatfile;
pub mod generator;
pub mod store;

pub use config::{Config, ConfigError, ConfigOverrides};
pub use flatfile::{read_orders_file, write_orders_file, FlatFileError};
pub use generator::{generate_orders, GeneratorConfig, GeneratorError, OrderGenerator};
pub use store::{Credential, OrderStore, StoreError};
