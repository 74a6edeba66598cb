//! Sale records and the columnar sales frame

use chrono::NaiveDate;

use super::result::{Error, Result};

/// A single cleaned sale
#[derive(Debug, Clone, PartialEq)]
pub struct Sale {
    pub date: NaiveDate,
    pub product: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl Sale {
    pub fn new(date: NaiveDate, product: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        Self {
            date,
            product: product.into(),
            quantity,
            unit_price,
        }
    }
}

/// Columns a sales frame can carry.
///
/// `name()` is the wire name used in the input header and in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Date,
    Product,
    Quantity,
    UnitPrice,
    Total,
}

impl Column {
    /// Columns the input file must provide
    pub const REQUIRED: [Column; 4] = [
        Column::Date,
        Column::Product,
        Column::Quantity,
        Column::UnitPrice,
    ];

    /// All columns in storage order
    pub const ALL: [Column; 5] = [
        Column::Date,
        Column::Product,
        Column::Quantity,
        Column::UnitPrice,
        Column::Total,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Column::Date => "fecha",
            Column::Product => "producto",
            Column::Quantity => "cantidad",
            Column::UnitPrice => "precio_unitario",
            Column::Total => "total",
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Column-oriented sales dataset.
///
/// Each column is either structurally present (a vector with one value per
/// row) or absent. All present columns have the same length, and `total` is
/// attached in one step for every row or not at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesFrame {
    len: usize,
    dates: Option<Vec<NaiveDate>>,
    products: Option<Vec<String>>,
    quantities: Option<Vec<f64>>,
    unit_prices: Option<Vec<f64>>,
    totals: Option<Vec<f64>>,
}

impl SalesFrame {
    /// Frame with the four sale columns and one row per sale
    pub fn from_sales(sales: Vec<Sale>) -> Self {
        let len = sales.len();
        let mut dates = Vec::with_capacity(len);
        let mut products = Vec::with_capacity(len);
        let mut quantities = Vec::with_capacity(len);
        let mut unit_prices = Vec::with_capacity(len);

        for sale in sales {
            dates.push(sale.date);
            products.push(sale.product);
            quantities.push(sale.quantity);
            unit_prices.push(sale.unit_price);
        }

        Self {
            len,
            dates: Some(dates),
            products: Some(products),
            quantities: Some(quantities),
            unit_prices: Some(unit_prices),
            totals: None,
        }
    }

    /// Build a frame from individually optional columns.
    ///
    /// Fails when the present columns disagree on length.
    pub fn from_columns(
        dates: Option<Vec<NaiveDate>>,
        products: Option<Vec<String>>,
        quantities: Option<Vec<f64>>,
        unit_prices: Option<Vec<f64>>,
    ) -> Result<Self> {
        let lengths = [
            (Column::Date, dates.as_ref().map(Vec::len)),
            (Column::Product, products.as_ref().map(Vec::len)),
            (Column::Quantity, quantities.as_ref().map(Vec::len)),
            (Column::UnitPrice, unit_prices.as_ref().map(Vec::len)),
        ];

        let mut len = None;
        for (column, column_len) in lengths {
            let Some(column_len) = column_len else { continue };
            match len {
                None => len = Some(column_len),
                Some(expected) if expected != column_len => {
                    return Err(Error::shape(format!(
                        "column '{}' has {} rows, expected {}",
                        column, column_len, expected
                    )));
                }
                Some(_) => {}
            }
        }

        Ok(Self {
            len: len.unwrap_or(0),
            dates,
            products,
            quantities,
            unit_prices,
            totals: None,
        })
    }

    /// Zero-row frame carrying exactly the given columns
    pub fn empty_with(columns: &[Column]) -> Self {
        let has = |c: Column| columns.contains(&c);
        Self {
            len: 0,
            dates: has(Column::Date).then(Vec::new),
            products: has(Column::Product).then(Vec::new),
            quantities: has(Column::Quantity).then(Vec::new),
            unit_prices: has(Column::UnitPrice).then(Vec::new),
            totals: has(Column::Total).then(Vec::new),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `column` is structurally present
    pub fn has(&self, column: Column) -> bool {
        match column {
            Column::Date => self.dates.is_some(),
            Column::Product => self.products.is_some(),
            Column::Quantity => self.quantities.is_some(),
            Column::UnitPrice => self.unit_prices.is_some(),
            Column::Total => self.totals.is_some(),
        }
    }

    /// Present columns in storage order
    pub fn columns(&self) -> Vec<Column> {
        Column::ALL.into_iter().filter(|c| self.has(*c)).collect()
    }

    /// Which of `required` are absent
    pub fn missing(&self, required: &[Column]) -> Vec<Column> {
        required.iter().copied().filter(|c| !self.has(*c)).collect()
    }

    pub fn dates(&self) -> Option<&[NaiveDate]> {
        self.dates.as_deref()
    }

    pub fn products(&self) -> Option<&[String]> {
        self.products.as_deref()
    }

    pub fn quantities(&self) -> Option<&[f64]> {
        self.quantities.as_deref()
    }

    pub fn unit_prices(&self) -> Option<&[f64]> {
        self.unit_prices.as_deref()
    }

    pub fn totals(&self) -> Option<&[f64]> {
        self.totals.as_deref()
    }

    /// Attach (or replace) the `total` column
    pub fn set_totals(&mut self, totals: Vec<f64>) -> Result<()> {
        if totals.len() != self.len {
            return Err(Error::shape(format!(
                "total column has {} rows, expected {}",
                totals.len(),
                self.len
            )));
        }
        self.totals = Some(totals);
        Ok(())
    }

    /// Rows as [`Sale`] values, if all four sale columns are present
    pub fn sales(&self) -> Option<Vec<Sale>> {
        let dates = self.dates.as_ref()?;
        let products = self.products.as_ref()?;
        let quantities = self.quantities.as_ref()?;
        let unit_prices = self.unit_prices.as_ref()?;

        Some(
            (0..self.len)
                .map(|i| Sale::new(dates[i], products[i].clone(), quantities[i], unit_prices[i]))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_from_sales_has_all_sale_columns() {
        let frame = SalesFrame::from_sales(vec![
            Sale::new(date(2023, 5, 1), "A", 10.0, 100.0),
            Sale::new(date(2023, 5, 2), "B", 5.0, 20.0),
        ]);

        assert_eq!(frame.len(), 2);
        assert_eq!(frame.columns(), Column::REQUIRED.to_vec());
        assert!(!frame.has(Column::Total));
        assert_eq!(frame.products().unwrap(), ["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_default_frame_has_no_columns() {
        let frame = SalesFrame::default();
        assert!(frame.is_empty());
        assert!(frame.columns().is_empty());
        assert_eq!(frame.missing(&Column::REQUIRED).len(), 4);
    }

    #[test]
    fn test_from_columns_rejects_length_mismatch() {
        let result = SalesFrame::from_columns(
            None,
            Some(vec!["A".to_string()]),
            Some(vec![1.0, 2.0]),
            None,
        );
        assert!(matches!(result, Err(Error::Shape(_))));
    }

    #[test]
    fn test_from_columns_allows_absent_columns() {
        let frame = SalesFrame::from_columns(None, None, Some(vec![1.0, 2.0]), None).unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.missing(&[Column::Quantity, Column::UnitPrice]), vec![Column::UnitPrice]);
    }

    #[test]
    fn test_set_totals_requires_one_value_per_row() {
        let mut frame = SalesFrame::from_sales(vec![Sale::new(date(2023, 1, 1), "A", 1.0, 2.0)]);
        assert!(frame.set_totals(vec![]).is_err());
        assert!(!frame.has(Column::Total));

        frame.set_totals(vec![2.0]).unwrap();
        assert_eq!(frame.totals().unwrap(), [2.0]);
    }

    #[test]
    fn test_empty_with_selected_columns() {
        let frame = SalesFrame::empty_with(&[Column::Quantity, Column::UnitPrice]);
        assert!(frame.is_empty());
        assert_eq!(frame.columns(), vec![Column::Quantity, Column::UnitPrice]);
        assert!(frame.sales().is_none());
    }

    #[test]
    fn test_sales_round_trip_preserves_order() {
        let sales = vec![
            Sale::new(date(2023, 6, 1), "Z", 1.0, 3.0),
            Sale::new(date(2023, 5, 1), "A", 2.0, 4.0),
        ];
        let frame = SalesFrame::from_sales(sales.clone());
        assert_eq!(frame.sales().unwrap(), sales);
    }
}
