use super::holding::HoldingRecord;

/// Header labels of the per-group sub-table, in column order.
pub const COLUMN_HEADERS: [&str; 7] = [
    "Name Of the Holdings",
    "Ticker",
    "Asset Class",
    "Average Price",
    "Market Price",
    "Latest Change Percentage",
    "Market Value (Base CCY)",
];

impl HoldingRecord {
    /// Cell text for each column of `COLUMN_HEADERS`.
    ///
    /// Values are shown as received: no rounding, no currency symbol.
    /// A missing number or a null / missing asset class yields an empty cell.
    #[must_use]
    pub fn cells(&self) -> [String; 7] {
        [
            self.name.clone(),
            self.ticker.clone(),
            self.asset_class.as_str().unwrap_or_default().to_string(),
            number_cell(self.avg_price),
            number_cell(self.market_price),
            number_cell(self.latest_change_pct),
            number_cell(self.market_value_base_ccy),
        ]
    }
}

fn number_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
