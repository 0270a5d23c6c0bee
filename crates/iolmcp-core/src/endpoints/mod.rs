//! Thin wrappers over individual InvertirOnline endpoints.
//!
//! Each submodule adds methods to `IolClient` for one area of the API.
//! Every method maps to exactly one HTTP call and returns the JSON body
//! untouched; none of them interpret the brokerage's payloads.

pub mod account;
pub mod advisor_trading;
pub mod advisors;
pub mod notifications;
pub mod portfolio;
pub mod profile;
pub mod securities;
pub mod simplified;
pub mod trading;

use chrono::NaiveDate;
use serde::Serialize;

use crate::api::QueryParams;

pub use account::{MovementFilter, Withdrawal};
pub use advisors::AdvisorMovementsRequest;
pub use portfolio::OperationsFilter;
pub use simplified::{MepReferenceRequest, SimplifiedPurchase};

/// Format used by the API for date query parameters
pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Optional `fechaDesde`/`fechaHasta` pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub(crate) fn apply(self, params: QueryParams) -> QueryParams {
        params
            .with_opt("fechaDesde", self.from.map(format_date))
            .with_opt("fechaHasta", self.to.map(format_date))
    }
}

/// Buy or sell order, shared by own and advised-client trading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    #[serde(rename = "simbolo")]
    pub symbol: String,
    #[serde(rename = "cantidad")]
    pub quantity: u64,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "validez")]
    pub valid_until: String,
    #[serde(rename = "mercado")]
    pub market: String,
    #[serde(rename = "plazo")]
    pub settlement: String,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_range_params() {
        let range = DateRange::new(NaiveDate::from_ymd_opt(2024, 1, 5), None);
        let params = range.apply(QueryParams::new());
        assert_eq!(params.get("fechaDesde"), Some("2024-01-05"));
        assert_eq!(params.get("fechaHasta"), None);
    }

    #[test]
    fn test_order_wire_names() {
        let order = Order {
            symbol: "GGAL".into(),
            quantity: 10,
            price: 1234.5,
            valid_until: "2024-03-01".into(),
            market: "bCBA".into(),
            settlement: "t1".into(),
        };
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "simbolo": "GGAL",
                "cantidad": 10,
                "precio": 1234.5,
                "validez": "2024-03-01",
                "mercado": "bCBA",
                "plazo": "t1",
            })
        );
    }
}
