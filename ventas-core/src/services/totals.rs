//! Line-item totals (`total = cantidad * precio_unitario`)

use crate::domain::result::{Error, Result};
use crate::domain::{Column, SalesFrame};

/// Compute the total column without touching the frame.
///
/// Fails when either input column is structurally absent.
pub fn try_line_totals(frame: &SalesFrame) -> Result<Vec<f64>> {
    match (frame.quantities(), frame.unit_prices()) {
        (Some(quantities), Some(prices)) => Ok(quantities
            .iter()
            .zip(prices)
            .map(|(quantity, price)| quantity * price)
            .collect()),
        _ => Err(Error::missing_columns(
            frame
                .missing(&[Column::Quantity, Column::UnitPrice])
                .into_iter()
                .map(Column::name),
        )),
    }
}

/// Return `frame` with a `total` column attached.
///
/// If the inputs are missing the error is logged and the frame comes back
/// unchanged.
pub fn with_total(mut frame: SalesFrame) -> SalesFrame {
    let attached = try_line_totals(&frame).and_then(|totals| frame.set_totals(totals));
    if let Err(e) = attached {
        tracing::error!("Cannot compute line totals: {}", e);
    }
    frame
}
