//! DuckDB sales store

use std::path::{Path, PathBuf};

use duckdb::types::Value;
use duckdb::{params_from_iter, Connection};
use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{Column, MonthlyRevenue, SalesFrame};
use crate::ports::{SalesStore, MONTHLY_TABLE, SALES_TABLE};

/// DuckDB-backed [`SalesStore`].
///
/// Holds only the database path; each operation opens its own connection
/// and drops it before returning.
#[derive(Debug, Clone)]
pub struct DuckDbStore {
    db_path: PathBuf,
}

/// Contents of the stored tables, read back for reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredSummary {
    pub sales_rows: i64,
    pub sales_columns: Vec<String>,
    /// `(month, revenue)` in calendar order
    pub monthly: Vec<(String, f64)>,
}

impl DuckDbStore {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn open(&self) -> Result<Connection> {
        // Disable extension autoloading; nothing here needs extensions and
        // cached ones in ~/.duckdb can fail code signing on macOS
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_with_flags(&self.db_path, config).map_err(|e| {
            Error::storage(format!("Failed to open {}: {}", self.db_path.display(), e))
        })?;
        Ok(conn)
    }

    /// Number of rows in the sales table
    pub fn sales_count(&self) -> Result<i64> {
        let conn = self.open()?;
        let count = conn.query_row(&format!("SELECT COUNT(*) FROM {}", SALES_TABLE), [], |row| {
            row.get(0)
        })?;
        Ok(count)
    }

    /// Monthly revenue rows in calendar order
    pub fn monthly_revenue(&self) -> Result<Vec<(String, f64)>> {
        let conn = self.open()?;
        read_monthly(&conn)
    }

    /// `(name, type)` of each column of `table`, in table order
    pub fn table_columns(&self, table: &str) -> Result<Vec<(String, String)>> {
        let conn = self.open()?;
        read_table_columns(&conn, table)
    }

    /// Read back both tables
    pub fn summary(&self) -> Result<StoredSummary> {
        let conn = self.open()?;
        let sales_rows: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {}", SALES_TABLE), [], |row| {
                row.get(0)
            })?;
        let sales_columns = read_table_columns(&conn, SALES_TABLE)?
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        let monthly = read_monthly(&conn)?;

        Ok(StoredSummary {
            sales_rows,
            sales_columns,
            monthly,
        })
    }
}

impl SalesStore for DuckDbStore {
    fn replace_sales(&self, frame: &SalesFrame) -> Result<()> {
        let conn = self.open()?;
        write_sales(&conn, frame)
    }

    fn replace_monthly_revenue(&self, monthly: &MonthlyRevenue) -> Result<()> {
        let conn = self.open()?;
        write_monthly(&conn, monthly)
    }

    fn replace_all(&self, frame: &SalesFrame, monthly: &MonthlyRevenue) -> Result<()> {
        let mut conn = self.open()?;
        let tx = conn.transaction()?;
        write_sales(&tx, frame)?;
        write_monthly(&tx, monthly)?;
        tx.commit()?;
        Ok(())
    }

    fn destination(&self) -> String {
        self.db_path.display().to_string()
    }
}

fn sql_type(column: Column) -> &'static str {
    match column {
        // Dates are stored as ISO text
        Column::Date | Column::Product => "VARCHAR",
        Column::Quantity | Column::UnitPrice | Column::Total => "DOUBLE",
    }
}

fn cell(frame: &SalesFrame, column: Column, row: usize) -> Value {
    let value = match column {
        Column::Date => frame
            .dates()
            .map(|d| Value::Text(d[row].format("%Y-%m-%d").to_string())),
        Column::Product => frame.products().map(|p| Value::Text(p[row].clone())),
        Column::Quantity => frame.quantities().map(|q| Value::Double(q[row])),
        Column::UnitPrice => frame.unit_prices().map(|p| Value::Double(p[row])),
        Column::Total => frame.totals().map(|t| Value::Double(t[row])),
    };
    value.unwrap_or(Value::Null)
}

fn write_sales(conn: &Connection, frame: &SalesFrame) -> Result<()> {
    let columns = frame.columns();
    if columns.is_empty() {
        return Err(Error::storage("dataset has no columns to store"));
    }

    let definitions: Vec<String> = columns
        .iter()
        .map(|c| format!("{} {}", c.name(), sql_type(*c)))
        .collect();
    conn.execute_batch(&format!(
        "CREATE OR REPLACE TABLE {} ({})",
        SALES_TABLE,
        definitions.join(", ")
    ))?;

    let placeholders = vec!["?"; columns.len()].join(", ");
    let mut stmt = conn.prepare(&format!("INSERT INTO {} VALUES ({})", SALES_TABLE, placeholders))?;
    for row in 0..frame.len() {
        let values: Vec<Value> = columns.iter().map(|c| cell(frame, *c, row)).collect();
        stmt.execute(params_from_iter(values))?;
    }

    tracing::debug!(rows = frame.len(), table = SALES_TABLE, "Replaced table");
    Ok(())
}

fn write_monthly(conn: &Connection, monthly: &MonthlyRevenue) -> Result<()> {
    conn.execute_batch(&format!(
        "CREATE OR REPLACE TABLE {} (mes VARCHAR, facturacion_total DOUBLE)",
        MONTHLY_TABLE
    ))?;

    let mut stmt = conn.prepare(&format!("INSERT INTO {} VALUES (?, ?)", MONTHLY_TABLE))?;
    for (month, total) in monthly.iter() {
        stmt.execute(duckdb::params![month.to_string(), total])?;
    }

    tracing::debug!(rows = monthly.len(), table = MONTHLY_TABLE, "Replaced table");
    Ok(())
}

fn read_monthly(conn: &Connection) -> Result<Vec<(String, f64)>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT mes, facturacion_total FROM {} ORDER BY mes",
        MONTHLY_TABLE
    ))?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn read_table_columns(conn: &Connection, table: &str) -> Result<Vec<(String, String)>> {
    let mut stmt = conn.prepare(
        "SELECT column_name, data_type FROM information_schema.columns
         WHERE table_name = ? ORDER BY ordinal_position",
    )?;
    let columns = stmt
        .query_map([table], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use crate::domain::{Sale, YearMonth};

    fn frame_with_totals() -> SalesFrame {
        let mut frame = SalesFrame::from_sales(vec![
            Sale::new(NaiveDate::from_ymd_opt(2023, 5, 1).unwrap(), "A", 10.0, 100.0),
            Sale::new(NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(), "B", 1.0, 20.0),
        ]);
        frame.set_totals(vec![1000.0, 20.0]).unwrap();
        frame
    }

    fn monthly() -> MonthlyRevenue {
        vec![(YearMonth::new(2023, 6), 20.0), (YearMonth::new(2023, 5), 1000.0)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_replace_all_writes_both_tables() {
        let temp = TempDir::new().unwrap();
        let store = DuckDbStore::new(temp.path().join("ventas.duckdb"));

        store.replace_all(&frame_with_totals(), &monthly()).unwrap();

        assert_eq!(store.sales_count().unwrap(), 2);
        assert_eq!(
            store.monthly_revenue().unwrap(),
            vec![("2023-05".to_string(), 1000.0), ("2023-06".to_string(), 20.0)]
        );
    }

    #[test]
    fn test_sales_table_schema() {
        let temp = TempDir::new().unwrap();
        let store = DuckDbStore::new(temp.path().join("ventas.duckdb"));
        store.replace_sales(&frame_with_totals()).unwrap();

        let columns = store.table_columns(SALES_TABLE).unwrap();
        let names: Vec<&str> = columns.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["fecha", "producto", "cantidad", "precio_unitario", "total"]);
        assert_eq!(columns[0].1, "VARCHAR");
        assert_eq!(columns[4].1, "DOUBLE");
    }

    #[test]
    fn test_empty_frame_without_columns_is_storage_error() {
        let temp = TempDir::new().unwrap();
        let store = DuckDbStore::new(temp.path().join("ventas.duckdb"));
        let err = store.replace_sales(&SalesFrame::default()).unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }

    #[test]
    fn test_open_in_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let store = DuckDbStore::new(temp.path().join("missing").join("ventas.duckdb"));
        let err = store.replace_monthly_revenue(&monthly()).unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }
}
