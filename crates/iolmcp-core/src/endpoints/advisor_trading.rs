//! Orders placed by an advisor on behalf of a client
//! (`/AsesoresOperar/Clientes/{id}`).

use serde_json::Value;

use crate::api::{ApiError, IolClient, QueryParams};

use super::{DateRange, Order};

fn client_path(client_id: i64, action: &str) -> String {
    format!("/AsesoresOperar/Clientes/{}/{}", client_id, action)
}

impl IolClient {
    pub async fn client_pending_orders(&self, client_id: i64, dates: DateRange) -> Result<Value, ApiError> {
        let params = dates.apply(QueryParams::new());
        self.get(&client_path(client_id, "OrdenesPendientes"), Some(&params))
            .await
    }

    pub async fn client_finished_orders(&self, client_id: i64, dates: DateRange) -> Result<Value, ApiError> {
        let params = dates.apply(QueryParams::new());
        self.get(&client_path(client_id, "OrdenesFinalizadas"), Some(&params))
            .await
    }

    pub async fn client_buy(&self, client_id: i64, order: &Order) -> Result<Value, ApiError> {
        self.post(&client_path(client_id, "Comprar"), order).await
    }

    pub async fn client_sell(&self, client_id: i64, order: &Order) -> Result<Value, ApiError> {
        self.post(&client_path(client_id, "Vender"), order).await
    }

    pub async fn client_cancel_order(&self, client_id: i64, number: &str) -> Result<Value, ApiError> {
        let action = format!("CancelarOrden/{}", number);
        self.delete(&client_path(client_id, &action), None).await
    }
}
