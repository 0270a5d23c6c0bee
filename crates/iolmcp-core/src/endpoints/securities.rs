//! Quotes, panels, instrument search and mutual funds (`Titulos`).

use chrono::NaiveDate;
use serde_json::Value;

use crate::api::{ApiError, IolClient, QueryParams};

use super::format_date;

/// Append an optional settlement term (t0, t1, t2) as a trailing segment
fn with_term(endpoint: String, term: Option<&str>) -> String {
    match term {
        Some(term) => format!("{}/{}", endpoint, term),
        None => endpoint,
    }
}

impl IolClient {
    pub async fn quote(&self, market: &str, symbol: &str, term: Option<&str>) -> Result<Value, ApiError> {
        let endpoint = with_term(
            format!("/api/v2/{}/Titulos/{}/Cotizacion", market, symbol),
            term,
        );
        self.get(&endpoint, None).await
    }

    /// Quote panel for an instrument type (Acciones, Bonos, Opciones, ...)
    pub async fn panel(&self, country: &str, instrument: &str) -> Result<Value, ApiError> {
        self.get(
            &format!("/api/v2/{}/Titulos/Cotizacion/Paneles/{}", country, instrument),
            None,
        )
        .await
    }

    pub async fn options(&self, market: &str, symbol: &str) -> Result<Value, ApiError> {
        self.get(&format!("/api/v2/{}/Titulos/{}/Opciones", market, symbol), None)
            .await
    }

    /// Best bid/ask levels ("puntas")
    pub async fn bid_ask(&self, market: &str, symbol: &str, term: Option<&str>) -> Result<Value, ApiError> {
        let endpoint = with_term(format!("/api/v2/{}/Titulos/{}/Puntas", market, symbol), term);
        self.get(&endpoint, None).await
    }

    pub async fn price_history(
        &self,
        market: &str,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
        adjusted: bool,
    ) -> Result<Value, ApiError> {
        let params = QueryParams::new()
            .with("fechaDesde", format_date(from))
            .with("fechaHasta", format_date(to))
            .with("ajustado", adjusted);
        self.get(
            &format!("/api/v2/{}/Titulos/{}/Cotizacion/Historico", market, symbol),
            Some(&params),
        )
        .await
    }

    pub async fn search_securities(&self, filter: &str, market: Option<&str>) -> Result<Value, ApiError> {
        let params = QueryParams::new()
            .with("filtro", filter)
            .with_opt("mercado", market);
        self.get("/api/v2/Titulos/Buscar", Some(&params)).await
    }

    pub async fn security_detail(&self, market: &str, symbol: &str) -> Result<Value, ApiError> {
        self.get(&format!("/api/v2/{}/Titulos/{}/Detalle", market, symbol), None)
            .await
    }

    pub async fn instruments(&self, country: &str) -> Result<Value, ApiError> {
        self.get(
            &format!("/api/v2/{}/Titulos/Cotizacion/Instrumentos", country),
            None,
        )
        .await
    }

    /// All mutual funds, or a single one when `symbol` is given
    pub async fn funds(&self, symbol: Option<&str>) -> Result<Value, ApiError> {
        match symbol {
            Some(symbol) => self.get(&format!("/api/v2/Titulos/FCI/{}", symbol), None).await,
            None => self.get("/api/v2/Titulos/FCI", None).await,
        }
    }

    pub async fn fund_types(&self) -> Result<Value, ApiError> {
        self.get("/api/v2/Titulos/FCI/TipoFondos", None).await
    }

    pub async fn fund_managers(&self) -> Result<Value, ApiError> {
        self.get("/api/v2/Titulos/FCI/Administradoras", None).await
    }

    pub async fn fund_types_by_manager(&self, manager: &str) -> Result<Value, ApiError> {
        self.get(
            &format!("/api/v2/Titulos/FCI/Administradoras/{}/TipoFondos", manager),
            None,
        )
        .await
    }

    pub async fn funds_by_manager_and_type(&self, manager: &str, fund_type: &str) -> Result<Value, ApiError> {
        self.get(
            &format!(
                "/api/v2/Titulos/FCI/Administradoras/{}/TipoFondos/{}",
                manager, fund_type
            ),
            None,
        )
        .await
    }
}
