//! Account state, balances and movements (`/api/v2/MiCuenta`).

use serde::Serialize;
use serde_json::Value;

use crate::api::{ApiError, IolClient, QueryParams};

use super::DateRange;

/// Filters shared by the movement listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovementFilter {
    pub country: Option<String>,
    pub movement_type: Option<String>,
    pub dates: DateRange,
}

impl MovementFilter {
    fn params(&self) -> QueryParams {
        let params = QueryParams::new()
            .with_opt("pais", self.country.as_deref())
            .with_opt("tipoMovimiento", self.movement_type.as_deref());
        self.dates.apply(params)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Withdrawal {
    #[serde(rename = "monto")]
    pub amount: f64,
    #[serde(rename = "idCuentaBancaria")]
    pub bank_account_id: i64,
    /// ARS, USD, ...
    #[serde(rename = "moneda")]
    pub currency: String,
}

impl IolClient {
    pub async fn account_statement(&self) -> Result<Value, ApiError> {
        self.get("/api/v2/MiCuenta/EstadoCuenta", None).await
    }

    pub async fn balances(&self) -> Result<Value, ApiError> {
        self.get("/api/v2/MiCuenta/Saldos", None).await
    }

    pub async fn movements(&self, filter: &MovementFilter) -> Result<Value, ApiError> {
        self.get("/api/v2/MiCuenta/Movimientos", Some(&filter.params()))
            .await
    }

    pub async fn fund_movements(&self, filter: &MovementFilter) -> Result<Value, ApiError> {
        self.get("/api/v2/MiCuenta/Movimientos/Fondos", Some(&filter.params()))
            .await
    }

    pub async fn fci_movements(&self, filter: &MovementFilter) -> Result<Value, ApiError> {
        self.get("/api/v2/MiCuenta/Movimientos/FCI", Some(&filter.params()))
            .await
    }

    pub async fn bank_accounts(&self) -> Result<Value, ApiError> {
        self.get("/api/v2/MiCuenta/CuentasBancarias", None).await
    }

    pub async fn custody_accounts(&self) -> Result<Value, ApiError> {
        self.get("/api/v2/MiCuenta/CuentasComitentes", None).await
    }

    pub async fn account_summary(&self, country: Option<&str>) -> Result<Value, ApiError> {
        let params = QueryParams::new().with_opt("pais", country);
        self.get("/api/v2/MiCuenta/ResumenCuenta", Some(&params)).await
    }

    pub async fn movement_detail(&self, movement_id: i64) -> Result<Value, ApiError> {
        self.get(&format!("/api/v2/MiCuenta/Movimientos/{}", movement_id), None)
            .await
    }

    pub async fn request_withdrawal(&self, withdrawal: &Withdrawal) -> Result<Value, ApiError> {
        self.post("/api/v2/MiCuenta/SolicitarExtraccion", withdrawal)
            .await
    }
}
