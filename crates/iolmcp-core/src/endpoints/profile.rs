use serde_json::Value;

use crate::api::{ApiError, IolClient};

impl IolClient {
    pub async fn profile(&self) -> Result<Value, ApiError> {
        self.get("/api/v2/datos-perfil", None).await
    }
}
