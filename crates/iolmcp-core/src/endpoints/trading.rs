//! Own orders (`/api/v2/Operar`).

use serde_json::Value;

use crate::api::{ApiError, IolClient, QueryParams};

use super::{DateRange, Order};

impl IolClient {
    pub async fn pending_orders(&self, dates: DateRange) -> Result<Value, ApiError> {
        let params = dates.apply(QueryParams::new());
        self.get("/api/v2/Operar/OrdenesPendientes", Some(&params)).await
    }

    pub async fn finished_orders(&self, dates: DateRange) -> Result<Value, ApiError> {
        let params = dates.apply(QueryParams::new());
        self.get("/api/v2/Operar/OrdenesFinalizadas", Some(&params)).await
    }

    pub async fn buy(&self, order: &Order) -> Result<Value, ApiError> {
        self.post("/api/v2/Operar/Comprar", order).await
    }

    pub async fn sell(&self, order: &Order) -> Result<Value, ApiError> {
        self.post("/api/v2/Operar/Vender", order).await
    }

    pub async fn cancel_order(&self, number: &str) -> Result<Value, ApiError> {
        self.delete(&format!("/api/v2/Operar/CancelarOrden/{}", number), None)
            .await
    }

    pub async fn order_status(&self, number: &str) -> Result<Value, ApiError> {
        self.get(&format!("/api/v2/Operar/EstadoOrden/{}", number), None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, ResponseTemplate};

    use super::*;
    use crate::endpoints::test_support::mock_client;

    #[tokio::test]
    async fn test_sell_posts_order() {
        let (server, client) = mock_client().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/Operar/Vender"))
            .and(body_json(json!({
                "simbolo": "AL30",
                "cantidad": 100,
                "precio": 55.5,
                "validez": "2024-05-10",
                "mercado": "bCBA",
                "plazo": "t0",
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"numeroOperacion": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let order = Order {
            symbol: "AL30".into(),
            quantity: 100,
            price: 55.5,
            valid_until: "2024-05-10".into(),
            market: "bCBA".into(),
            settlement: "t0".into(),
        };
        assert_eq!(client.sell(&order).await.unwrap()["numeroOperacion"], 1);
    }

    #[tokio::test]
    async fn test_pending_orders_dates() {
        let (server, client) = mock_client().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/Operar/OrdenesPendientes"))
            .and(query_param("fechaHasta", "2024-02-29"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let dates = DateRange::new(None, NaiveDate::from_ymd_opt(2024, 2, 29));
        client.pending_orders(dates).await.unwrap();
    }

    #[tokio::test]
    async fn test_cancel_order_uses_delete() {
        let (server, client) = mock_client().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v2/Operar/CancelarOrden/5551"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        client.cancel_order("5551").await.unwrap();
    }
}
