use serde_json::{json, Value};

use crate::api::{ApiError, IolClient, QueryParams};

use super::DateRange;

impl IolClient {
    pub async fn notifications(&self, dates: DateRange) -> Result<Value, ApiError> {
        let params = dates.apply(QueryParams::new());
        self.get("/api/v2/Notificacion", Some(&params)).await
    }

    pub async fn mark_notification_read(&self, notification_id: i64) -> Result<Value, ApiError> {
        self.post(
            &format!("/api/v2/Notificacion/{}/Leida", notification_id),
            &json!({}),
        )
        .await
    }
}
