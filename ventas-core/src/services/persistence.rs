//! Persistence service - writes cleaned sales and monthly revenue to a store

use std::path::Path;

use crate::adapters::duckdb::DuckDbStore;
use crate::domain::result::Result;
use crate::domain::{MonthlyRevenue, SalesFrame};
use crate::ports::{SalesStore, MONTHLY_TABLE, SALES_TABLE};

/// Replace both tables in `store`
pub fn try_persist<S: SalesStore + ?Sized>(
    store: &S,
    frame: &SalesFrame,
    monthly: &MonthlyRevenue,
) -> Result<()> {
    store.replace_all(frame, monthly)?;
    tracing::info!(
        destination = %store.destination(),
        sales_rows = frame.len(),
        months = monthly.len(),
        "Stored tables {} and {}",
        SALES_TABLE,
        MONTHLY_TABLE
    );
    Ok(())
}

/// Store results in the DuckDB file at `destination`, logging any failure
pub fn persist(frame: &SalesFrame, monthly: &MonthlyRevenue, destination: &Path) {
    let store = DuckDbStore::new(destination);
    if let Err(e) = try_persist(&store, frame, monthly) {
        tracing::error!("Failed to store results in {}: {}", destination.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::domain::result::Error;
    use crate::domain::{Sale, YearMonth};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingStore {
        calls: RefCell<Vec<&'static str>>,
        fail: bool,
    }

    impl SalesStore for RecordingStore {
        fn replace_sales(&self, _frame: &SalesFrame) -> Result<()> {
            self.calls.borrow_mut().push("sales");
            if self.fail {
                return Err(Error::storage("disk full"));
            }
            Ok(())
        }

        fn replace_monthly_revenue(&self, _monthly: &MonthlyRevenue) -> Result<()> {
            self.calls.borrow_mut().push("monthly");
            Ok(())
        }

        fn destination(&self) -> String {
            "memory".to_string()
        }
    }

    fn inputs() -> (SalesFrame, MonthlyRevenue) {
        let date = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
        let frame = crate::services::with_total(SalesFrame::from_sales(vec![Sale::new(
            date, "A", 2.0, 5.0,
        )]));
        let monthly = vec![(YearMonth::of(date), 10.0)].into_iter().collect();
        (frame, monthly)
    }

    #[test]
    fn test_try_persist_writes_both_tables() {
        let (frame, monthly) = inputs();
        let store = RecordingStore::default();

        try_persist(&store, &frame, &monthly).unwrap();
        assert_eq!(*store.calls.borrow(), vec!["sales", "monthly"]);
    }

    #[test]
    fn test_try_persist_stops_on_first_failure() {
        let (frame, monthly) = inputs();
        let store = RecordingStore {
            fail: true,
            ..Default::default()
        };

        let err = try_persist(&store, &frame, &monthly).unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
        assert_eq!(*store.calls.borrow(), vec!["sales"]);
    }

    #[test]
    fn test_persist_swallows_unreachable_destination() {
        let (frame, monthly) = inputs();
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join("ventas.duckdb");

        persist(&frame, &monthly, &path);
        assert!(!path.exists());
    }

    #[test]
    fn test_persist_writes_database() {
        let (frame, monthly) = inputs();
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ventas.duckdb");

        persist(&frame, &monthly, &path);

        let store = DuckDbStore::new(&path);
        assert_eq!(store.sales_count().unwrap(), 1);
        assert_eq!(store.monthly_revenue().unwrap(), vec![("2023-05".to_string(), 10.0)]);
    }
}
