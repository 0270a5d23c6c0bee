//! Historical movements of advised clients (`/api/v2/Asesor`).

use serde::Serialize;
use serde_json::Value;

use crate::api::{ApiError, IolClient};

/// Body of the advisor movements query. Dates are ISO strings as the
/// API accepts full timestamps here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdvisorMovementsRequest {
    #[serde(skip_serializing_if = "Vec::is_empty", rename = "clientes")]
    pub clients: Vec<i64>,
    pub from: String,
    pub to: String,
    #[serde(rename = "dateType")]
    pub date_type: String,
    pub status: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(rename = "cuentaComitente", skip_serializing_if = "Option::is_none")]
    pub custody_account: Option<String>,
}

impl IolClient {
    pub async fn advisor_movements(&self, request: &AdvisorMovementsRequest) -> Result<Value, ApiError> {
        self.post("/api/v2/Asesor/Movimientos", request).await
    }
}
