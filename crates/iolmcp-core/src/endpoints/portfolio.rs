//! Portfolio (`/api/v2/Portafolio`) and own operations.

use serde_json::Value;

use crate::api::{ApiError, IolClient, QueryParams};

use super::DateRange;

/// Filters for the operations listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationsFilter {
    pub country: Option<String>,
    /// todas, pendientes, terminadas, canceladas
    pub state: Option<String>,
    pub dates: DateRange,
}

impl OperationsFilter {
    fn params(&self) -> QueryParams {
        let params = QueryParams::new()
            .with_opt("pais", self.country.as_deref())
            .with_opt("estado", self.state.as_deref());
        self.dates.apply(params)
    }
}

fn country_params(country: Option<&str>) -> QueryParams {
    QueryParams::new().with_opt("pais", country)
}

impl IolClient {
    pub async fn portfolio(&self, country: Option<&str>) -> Result<Value, ApiError> {
        self.get("/api/v2/Portafolio", Some(&country_params(country))).await
    }

    pub async fn operations(&self, filter: &OperationsFilter) -> Result<Value, ApiError> {
        self.get("/api/v2/Operaciones", Some(&filter.params())).await
    }

    pub async fn valued_portfolio(&self, country: Option<&str>) -> Result<Value, ApiError> {
        self.get("/api/v2/Portafolio/Valorizado", Some(&country_params(country)))
            .await
    }

    pub async fn portfolio_performance(&self, country: Option<&str>) -> Result<Value, ApiError> {
        self.get("/api/v2/Portafolio/Rendimiento", Some(&country_params(country)))
            .await
    }

    /// Composition by instrument type
    pub async fn portfolio_composition(&self, country: Option<&str>) -> Result<Value, ApiError> {
        self.get("/api/v2/Portafolio/Composicion", Some(&country_params(country)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, ResponseTemplate};

    use super::*;
    use crate::endpoints::test_support::mock_client;

    #[tokio::test]
    async fn test_portfolio_with_country() {
        let (server, client) = mock_client().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/Portafolio"))
            .and(query_param("pais", "argentina"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"pais": "argentina"})))
            .expect(1)
            .mount(&server)
            .await;

        let result = client.portfolio(Some("argentina")).await.unwrap();
        assert_eq!(result["pais"], "argentina");
    }

    #[tokio::test]
    async fn test_operations_filter_to_query() {
        let (server, client) = mock_client().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/Operaciones"))
            .and(query_param("estado", "terminadas"))
            .and(query_param("fechaDesde", "2024-01-01"))
            .and(query_param("fechaHasta", "2024-01-31"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let filter = OperationsFilter {
            country: None,
            state: Some("terminadas".into()),
            dates: DateRange::new(
                NaiveDate::from_ymd_opt(2024, 1, 1),
                NaiveDate::from_ymd_opt(2024, 1, 31),
            ),
        };
        assert_eq!(filter.params().get("pais"), None);
        client.operations(&filter).await.unwrap();
    }
}
