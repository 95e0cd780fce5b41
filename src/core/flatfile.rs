//! CSV flat-file reading and writing for order tables

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use thiserror::Error;

use crate::entities::Order;

/// Column order of the generated artifact
pub const ORDER_COLUMNS: [&str; 10] = [
    "order_id",
    "order_date",
    "process_group",
    "warehouse_id",
    "picker_id",
    "items_count",
    "processing_time_min",
    "labor_cost",
    "error_flag",
    "on_time_delivery",
];

#[derive(Debug, Error)]
pub enum FlatFileError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing column '{0}' in CSV header")]
    MissingColumn(String),
}

/// Write orders as CSV (header included) to any writer
pub fn write_orders<W: Write>(orders: &[Order], writer: W) -> Result<(), FlatFileError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for order in orders {
        wtr.serialize(order)?;
    }
    // serialize() only emits the header alongside the first record
    if orders.is_empty() {
        wtr.write_record(ORDER_COLUMNS)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write orders to a CSV file, replacing any existing file
pub fn write_orders_file(orders: &[Order], path: &Path) -> Result<(), FlatFileError> {
    let file = File::create(path).map_err(|source| FlatFileError::Open {
        path: path.display().to_string(),
        source,
    })?;
    write_orders(orders, file)
}

/// Read orders from CSV; the header must name every order column
pub fn read_orders<R: Read>(reader: R) -> Result<Vec<Order>, FlatFileError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in ORDER_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(FlatFileError::MissingColumn(column.to_string()));
        }
    }

    let mut orders = Vec::new();
    for record in rdr.deserialize() {
        orders.push(record?);
    }
    Ok(orders)
}

pub fn read_orders_file(path: &Path) -> Result<Vec<Order>, FlatFileError> {
    let file = File::open(path).map_err(|source| FlatFileError::Open {
        path: path.display().to_string(),
        source,
    })?;
    read_orders(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generator::{generate_orders, GeneratorConfig};

    fn config() -> GeneratorConfig {
        GeneratorConfig {
            days: 3,
            min_orders_per_day: 5,
            max_orders_per_day: 8,
            ..GeneratorConfig::default()
        }
    }

    fn to_csv(orders: &[Order]) -> String {
        let mut buf = Vec::new();
        write_orders(orders, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_header_matches_column_order() {
        let orders = generate_orders(config()).unwrap();
        let csv = to_csv(&orders);
        assert_eq!(csv.lines().next().unwrap(), ORDER_COLUMNS.join(","));
        assert_eq!(csv.lines().count(), orders.len() + 1);
    }

    #[test]
    fn test_empty_table_still_has_header() {
        let csv = to_csv(&[]);
        assert_eq!(csv.trim_end(), ORDER_COLUMNS.join(","));
    }

    #[test]
    fn test_same_seed_gives_identical_bytes() {
        let first = to_csv(&generate_orders(config()).unwrap());
        let second = to_csv(&generate_orders(config()).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn test_row_format() {
        let orders = generate_orders(config()).unwrap();
        let csv = to_csv(&orders);
        let first_row: Vec<&str> = csv.lines().nth(1).unwrap().split(',').collect();
        assert_eq!(first_row[0], "ORD_1");
        assert_eq!(first_row[1], "2024-01-01");
        assert!(first_row[2] == "A" || first_row[2] == "B");
        assert!(first_row[8] == "0" || first_row[8] == "1");
        assert!(first_row[9] == "0" || first_row[9] == "1");
    }

    #[test]
    fn test_read_back_written_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("orders.csv");
        let orders = generate_orders(config()).unwrap();

        write_orders_file(&orders, &path).unwrap();
        let loaded = read_orders_file(&path).unwrap();

        assert_eq!(loaded, orders);
    }

    #[test]
    fn test_missing_column_rejected() {
        let csv = "order_id,process_group\nORD_1,A\n";
        let err = read_orders(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, FlatFileError::MissingColumn(c) if c == "order_date"));
    }

    #[test]
    fn test_invalid_group_rejected() {
        let csv = format!(
            "{}\nORD_1,2024-01-01,C,WH_01,P_1,3,30.0,18.0,0,1\n",
            ORDER_COLUMNS.join(",")
        );
        assert!(matches!(
            read_orders(csv.as_bytes()),
            Err(FlatFileError::Csv(_))
        ));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = read_orders_file(Path::new("/nonexistent/orders.csv")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/orders.csv"));
    }
}
