//! Sales store port - relational persistence of pipeline results

use crate::domain::result::Result;
use crate::domain::{MonthlyRevenue, SalesFrame};

/// Table holding the cleaned dataset with line totals
pub const SALES_TABLE: &str = "ventas_limpias";

/// Table holding revenue per month
pub const MONTHLY_TABLE: &str = "facturacion_mensual";

/// Storage for cleaned sales and the monthly aggregate.
///
/// Every write fully replaces the previous contents of its table.
/// Implementations acquire their connection inside each call and release it
/// before returning.
pub trait SalesStore {
    /// Replace the cleaned sales table
    fn replace_sales(&self, frame: &SalesFrame) -> Result<()>;

    /// Replace the monthly revenue table
    fn replace_monthly_revenue(&self, monthly: &MonthlyRevenue) -> Result<()>;

    /// Replace both tables.
    ///
    /// The default writes them one after the other; adapters with
    /// transactions should override this to make the pair atomic.
    fn replace_all(&self, frame: &SalesFrame, monthly: &MonthlyRevenue) -> Result<()> {
        self.replace_sales(frame)?;
        self.replace_monthly_revenue(monthly)
    }

    /// Human-readable destination, for logs
    fn destination(&self) -> String;
}
