//! Simplified trading (`OperatoriaSimplificada`) and MEP dollar helpers.

use serde::Serialize;
use serde_json::Value;

use crate::api::{ApiError, IolClient};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MepReferenceRequest {
    #[serde(rename = "simbolo")]
    pub symbol: String,
    #[serde(rename = "idPlazoOperatoriaCompra")]
    pub buy_term_id: i64,
    #[serde(rename = "idPlazoOperatoriaVenta")]
    pub sell_term_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimplifiedPurchase {
    #[serde(rename = "monto")]
    pub amount: f64,
    #[serde(rename = "idTipoOperatoriaSimplificada")]
    pub operation_type_id: i64,
    #[serde(rename = "idCuentaBancaria")]
    pub bank_account_id: i64,
}

impl IolClient {
    pub async fn estimated_amounts(&self, amount: f64) -> Result<Value, ApiError> {
        self.get(
            &format!("/api/v2/OperatoriaSimplificada/MontosEstimados/{}", amount),
            None,
        )
        .await
    }

    pub async fn simplified_parameters(&self, operation_type_id: i64) -> Result<Value, ApiError> {
        self.get(
            &format!("/api/v2/OperatoriaSimplificada/{}/Parametros", operation_type_id),
            None,
        )
        .await
    }

    pub async fn validate_simplified(&self, amount: f64, operation_type_id: i64) -> Result<Value, ApiError> {
        self.get(
            &format!(
                "/api/v2/OperatoriaSimplificada/Validar/{}/{}",
                amount, operation_type_id
            ),
            None,
        )
        .await
    }

    pub async fn mep_sale_estimates(&self, amount: f64) -> Result<Value, ApiError> {
        self.get(
            &format!(
                "/api/v2/OperatoriaSimplificada/VentaMepSimple/MontosEstimados/{}",
                amount
            ),
            None,
        )
        .await
    }

    /// Reference MEP rate; the API answers with a bare number
    pub async fn mep_reference(&self, request: &MepReferenceRequest) -> Result<Value, ApiError> {
        self.post("/api/v2/Cotizaciones/MEP", request).await
    }

    pub async fn simplified_buy(&self, purchase: &SimplifiedPurchase) -> Result<Value, ApiError> {
        self.post("/api/v2/OperatoriaSimplificada/Comprar", purchase)
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, ResponseTemplate};

    use super::*;
    use crate::endpoints::test_support::mock_client;

    #[tokio::test]
    async fn test_mep_reference_returns_number() {
        let (server, client) = mock_client().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/Cotizaciones/MEP"))
            .and(body_json(json!({
                "simbolo": "AL30",
                "idPlazoOperatoriaCompra": 1,
                "idPlazoOperatoriaVenta": 2,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("1187.5"))
            .expect(1)
            .mount(&server)
            .await;

        let request = MepReferenceRequest {
            symbol: "AL30".into(),
            buy_term_id: 1,
            sell_term_id: 2,
        };
        assert_eq!(client.mep_reference(&request).await.unwrap(), json!(1187.5));
    }

    #[tokio::test]
    async fn test_validate_path() {
        let (server, client) = mock_client().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/OperatoriaSimplificada/Validar/2500/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        client.validate_simplified(2500.0, 3).await.unwrap();
    }
}
