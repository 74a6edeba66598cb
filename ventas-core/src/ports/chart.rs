//! Chart renderer port

use std::path::Path;

use crate::domain::result::Result;
use crate::domain::MonthlyRevenue;

/// Renders the monthly revenue aggregate to an image file
pub trait ChartRenderer {
    /// Draw `monthly` (non-empty) and write it to `path`, overwriting it
    fn render(&self, monthly: &MonthlyRevenue, path: &Path) -> Result<()>;
}
