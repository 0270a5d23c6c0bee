//! MCP tool registry backed by a single shared `IolClient`.

use std::future::Future;

use iolmcp_core::{ApiError, IolClient};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData, ServerHandler,
};
use serde_json::Value;
use tracing::debug;

use crate::params::*;
use crate::response::ToolOutcome;

const INSTRUCTIONS: &str = "Herramientas para la API de InvertirOnline: portafolio, \
cuenta, títulos, operaciones, notificaciones, asesores y operatoria simplificada. \
Las fechas se expresan en formato YYYY-MM-DD.";

#[derive(Debug, Clone)]
pub struct IolMcpServer {
    client: IolClient,
    tool_router: ToolRouter<IolMcpServer>,
}

impl IolMcpServer {
    pub fn new(client: IolClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    /// Run `call` on validated input and wrap the result in the envelope.
    async fn respond<T, F, Fut>(
        &self,
        context: &str,
        input: Result<T, ValidationError>,
        call: F,
    ) -> Result<CallToolResult, ErrorData>
    where
        F: FnOnce(IolClient, T) -> Fut,
        Fut: Future<Output = Result<Value, ApiError>>,
    {
        let outcome = match input {
            Ok(input) => {
                debug!(context, "Dispatching tool call");
                ToolOutcome::from_api(context, call(self.client.clone(), input).await)
            }
            Err(err) => ToolOutcome::invalid(context, err),
        };
        Ok(outcome.into_call_result())
    }
}

#[tool_router]
impl IolMcpServer {
    // ===== Portfolio =====

    #[tool(name = "obtener_portafolio", description = "Obtener el portafolio del usuario")]
    async fn obtener_portafolio(
        &self,
        Parameters(input): Parameters<CountryInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo portafolio", Ok(input.country()), |client, country| async move {
            client.portfolio(country).await
        })
        .await
    }

    #[tool(
        name = "obtener_operaciones",
        description = "Obtener operaciones filtradas por país, estado y rango de fechas"
    )]
    async fn obtener_operaciones(
        &self,
        Parameters(input): Parameters<OperationsInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo operaciones", input.filter(), |client, filter| async move {
            client.operations(&filter).await
        })
        .await
    }

    #[tool(
        name = "obtener_portafolio_valorizado",
        description = "Obtener el portafolio valorizado a precios de mercado"
    )]
    async fn obtener_portafolio_valorizado(
        &self,
        Parameters(input): Parameters<CountryInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo portafolio valorizado", Ok(input.country()), |client, country| async move {
            client.valued_portfolio(country).await
        })
        .await
    }

    #[tool(
        name = "obtener_rendimiento_historico",
        description = "Obtener el rendimiento histórico del portafolio"
    )]
    async fn obtener_rendimiento_historico(
        &self,
        Parameters(input): Parameters<CountryInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo rendimiento", Ok(input.country()), |client, country| async move {
            client.portfolio_performance(country).await
        })
        .await
    }

    #[tool(
        name = "obtener_composicion_portafolio",
        description = "Obtener la composición del portafolio por tipo de instrumento"
    )]
    async fn obtener_composicion_portafolio(
        &self,
        Parameters(input): Parameters<CountryInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo composición", Ok(input.country()), |client, country| async move {
            client.portfolio_composition(country).await
        })
        .await
    }

    // ===== Account =====

    #[tool(name = "obtener_estado_cuenta", description = "Obtener el estado de cuenta del usuario")]
    async fn obtener_estado_cuenta(&self) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo estado de cuenta", Ok(()), |client, ()| async move {
            client.account_statement().await
        })
        .await
    }

    #[tool(name = "obtener_saldos", description = "Obtener los saldos disponibles por moneda")]
    async fn obtener_saldos(&self) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo saldos", Ok(()), |client, ()| async move {
            client.balances().await
        })
        .await
    }

    #[tool(name = "obtener_movimientos", description = "Obtener los movimientos de la cuenta")]
    async fn obtener_movimientos(
        &self,
        Parameters(input): Parameters<MovementsInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo movimientos", input.filter(), |client, filter| async move {
            client.movements(&filter).await
        })
        .await
    }

    #[tool(name = "obtener_movimientos_fondos", description = "Obtener los movimientos de fondos")]
    async fn obtener_movimientos_fondos(
        &self,
        Parameters(input): Parameters<MovementsInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo movimientos de fondos", input.filter(), |client, filter| async move {
            client.fund_movements(&filter).await
        })
        .await
    }

    #[tool(name = "obtener_movimientos_fci", description = "Obtener los movimientos de FCI")]
    async fn obtener_movimientos_fci(
        &self,
        Parameters(input): Parameters<MovementsInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo movimientos de FCI", input.filter(), |client, filter| async move {
            client.fci_movements(&filter).await
        })
        .await
    }

    #[tool(name = "obtener_cuentas_bancarias", description = "Obtener las cuentas bancarias asociadas")]
    async fn obtener_cuentas_bancarias(&self) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo cuentas bancarias", Ok(()), |client, ()| async move {
            client.bank_accounts().await
        })
        .await
    }

    #[tool(name = "obtener_cuentas_comitentes", description = "Obtener las cuentas comitentes")]
    async fn obtener_cuentas_comitentes(&self) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo cuentas comitentes", Ok(()), |client, ()| async move {
            client.custody_accounts().await
        })
        .await
    }

    #[tool(name = "obtener_resumen_cuenta", description = "Obtener el resumen de la cuenta")]
    async fn obtener_resumen_cuenta(
        &self,
        Parameters(input): Parameters<CountryInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo resumen de cuenta", Ok(input.country()), |client, country| async move {
            client.account_summary(country).await
        })
        .await
    }

    #[tool(name = "obtener_detalle_movimiento", description = "Obtener el detalle de un movimiento")]
    async fn obtener_detalle_movimiento(
        &self,
        Parameters(input): Parameters<MovementIdInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo detalle de movimiento", Ok(input.id_movimiento), |client, id| async move {
            client.movement_detail(id).await
        })
        .await
    }

    #[tool(name = "solicitar_extraccion", description = "Solicitar una extracción de fondos a una cuenta bancaria")]
    async fn solicitar_extraccion(
        &self,
        Parameters(input): Parameters<WithdrawalInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error solicitando extracción", input.withdrawal(), |client, withdrawal| async move {
            client.request_withdrawal(&withdrawal).await
        })
        .await
    }

    // ===== Securities =====

    #[tool(
        name = "titulos_obtener_cotizacion",
        description = "Obtener la cotización de un título en un mercado"
    )]
    async fn titulos_obtener_cotizacion(
        &self,
        Parameters(input): Parameters<QuoteInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo cotización", input.target(), |client, (market, symbol, term)| async move {
            client.quote(market, symbol, term).await
        })
        .await
    }

    #[tool(name = "obtener_panel", description = "Obtener el panel de cotizaciones de un tipo de instrumento")]
    async fn obtener_panel(
        &self,
        Parameters(input): Parameters<PanelInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo panel", input.target(), |client, (country, instrument)| async move {
            client.panel(country, instrument).await
        })
        .await
    }

    #[tool(name = "obtener_opciones", description = "Obtener las opciones de un título")]
    async fn obtener_opciones(
        &self,
        Parameters(input): Parameters<SecurityInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo opciones", input.target(), |client, (market, symbol)| async move {
            client.options(market, symbol).await
        })
        .await
    }

    #[tool(name = "obtener_puntas", description = "Obtener las puntas de compra y venta de un título")]
    async fn obtener_puntas(
        &self,
        Parameters(input): Parameters<QuoteInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo puntas", input.target(), |client, (market, symbol, term)| async move {
            client.bid_ask(market, symbol, term).await
        })
        .await
    }

    #[tool(name = "obtener_datos_historicos", description = "Obtener la serie histórica de cotizaciones de un título")]
    async fn obtener_datos_historicos(
        &self,
        Parameters(input): Parameters<HistoryInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo datos históricos", input.query(), |client, q| async move {
            client
                .price_history(q.market, q.symbol, q.from, q.to, q.adjusted)
                .await
        })
        .await
    }

    #[tool(name = "buscar_titulos", description = "Buscar títulos por nombre o símbolo")]
    async fn buscar_titulos(
        &self,
        Parameters(input): Parameters<SearchInput>,
    ) -> Result<CallToolResult, ErrorData> {
        let filter = input.filtro.trim();
        let validated = if filter.is_empty() {
            Err(ValidationError("filtro must not be empty".to_string()))
        } else {
            Ok((filter, input.mercado.as_deref()))
        };
        self.respond("Error buscando títulos", validated, |client, (filter, market)| async move {
            client.search_securities(filter, market).await
        })
        .await
    }

    #[tool(name = "obtener_detalle_titulo", description = "Obtener el detalle de un título")]
    async fn obtener_detalle_titulo(
        &self,
        Parameters(input): Parameters<SecurityInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo detalle del título", input.target(), |client, (market, symbol)| async move {
            client.security_detail(market, symbol).await
        })
        .await
    }

    #[tool(name = "obtener_instrumentos", description = "Obtener los instrumentos disponibles en un país")]
    async fn obtener_instrumentos(
        &self,
        Parameters(input): Parameters<CountryRequiredInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo instrumentos", path_segment("pais", &input.pais), |client, country| async move {
            client.instruments(country).await
        })
        .await
    }

    #[tool(name = "obtener_fci", description = "Obtener información de fondos comunes de inversión")]
    async fn obtener_fci(
        &self,
        Parameters(input): Parameters<FundInput>,
    ) -> Result<CallToolResult, ErrorData> {
        let validated = optional_path_segment("simbolo", input.simbolo.as_deref());
        self.respond("Error obteniendo información de FCI", validated, |client, symbol| async move {
            client.funds(symbol).await
        })
        .await
    }

    #[tool(name = "obtener_tipos_fondos", description = "Obtener los tipos de fondos disponibles")]
    async fn obtener_tipos_fondos(&self) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo tipos de fondos", Ok(()), |client, ()| async move {
            client.fund_types().await
        })
        .await
    }

    #[tool(name = "obtener_administradoras", description = "Obtener las administradoras de fondos")]
    async fn obtener_administradoras(&self) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo administradoras", Ok(()), |client, ()| async move {
            client.fund_managers().await
        })
        .await
    }

    #[tool(
        name = "obtener_tipos_fondos_por_administradora",
        description = "Obtener los tipos de fondos de una administradora"
    )]
    async fn obtener_tipos_fondos_por_administradora(
        &self,
        Parameters(input): Parameters<ManagerInput>,
    ) -> Result<CallToolResult, ErrorData> {
        let validated = path_segment("administradora", &input.administradora);
        self.respond("Error obteniendo tipos de fondos por administradora", validated, |client, manager| async move {
            client.fund_types_by_manager(manager).await
        })
        .await
    }

    #[tool(
        name = "obtener_fondos_por_administradora_y_tipo",
        description = "Obtener los fondos de una administradora filtrados por tipo"
    )]
    async fn obtener_fondos_por_administradora_y_tipo(
        &self,
        Parameters(input): Parameters<ManagerFundTypeInput>,
    ) -> Result<CallToolResult, ErrorData> {
        let validated = path_segment("administradora", &input.administradora).and_then(|manager| {
            Ok((manager, path_segment("tipo_fondo", &input.tipo_fondo)?))
        });
        self.respond("Error obteniendo fondos por administradora y tipo", validated, |client, (manager, kind)| async move {
            client.funds_by_manager_and_type(manager, kind).await
        })
        .await
    }

    // ===== Trading =====

    #[tool(name = "obtener_ordenes_pendientes", description = "Obtener las órdenes pendientes")]
    async fn obtener_ordenes_pendientes(
        &self,
        Parameters(input): Parameters<DateRangeInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo órdenes pendientes", input.range(), |client, dates| async move {
            client.pending_orders(dates).await
        })
        .await
    }

    #[tool(name = "obtener_ordenes_finalizadas", description = "Obtener las órdenes finalizadas")]
    async fn obtener_ordenes_finalizadas(
        &self,
        Parameters(input): Parameters<DateRangeInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo órdenes finalizadas", input.range(), |client, dates| async move {
            client.finished_orders(dates).await
        })
        .await
    }

    #[tool(name = "comprar", description = "Crear una orden de compra")]
    async fn comprar(
        &self,
        Parameters(input): Parameters<OrderInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error creando orden de compra", input.order(), |client, order| async move {
            client.buy(&order).await
        })
        .await
    }

    #[tool(name = "vender", description = "Crear una orden de venta")]
    async fn vender(
        &self,
        Parameters(input): Parameters<OrderInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error creando orden de venta", input.order(), |client, order| async move {
            client.sell(&order).await
        })
        .await
    }

    #[tool(name = "cancelar_orden", description = "Cancelar una orden")]
    async fn cancelar_orden(
        &self,
        Parameters(input): Parameters<OrderNumberInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error cancelando orden", input.number(), |client, number| async move {
            client.cancel_order(number).await
        })
        .await
    }

    #[tool(name = "obtener_estado_orden", description = "Obtener el estado de una orden")]
    async fn obtener_estado_orden(
        &self,
        Parameters(input): Parameters<OrderNumberInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo estado de orden", input.number(), |client, number| async move {
            client.order_status(number).await
        })
        .await
    }

    // ===== Notifications =====

    #[tool(
        name = "notificacion_obtener_notificaciones",
        description = "Obtener las notificaciones del usuario"
    )]
    async fn notificacion_obtener_notificaciones(
        &self,
        Parameters(input): Parameters<DateRangeInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo notificaciones", input.range(), |client, dates| async move {
            client.notifications(dates).await
        })
        .await
    }

    #[tool(name = "marcar_notificacion_leida", description = "Marcar una notificación como leída")]
    async fn marcar_notificacion_leida(
        &self,
        Parameters(input): Parameters<NotificationIdInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error marcando notificación como leída", Ok(input.id_notificacion), |client, id| async move {
            client.mark_notification_read(id).await
        })
        .await
    }

    // ===== Profile =====

    #[tool(name = "obtener_datos_perfil", description = "Obtener los datos del perfil del usuario")]
    async fn obtener_datos_perfil(&self) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo datos del perfil", Ok(()), |client, ()| async move {
            client.profile().await
        })
        .await
    }

    // ===== Advisors =====

    #[tool(
        name = "asesores_movimientos_historicos",
        description = "Obtener los movimientos históricos de los clientes asesorados"
    )]
    async fn asesores_movimientos_historicos(
        &self,
        Parameters(input): Parameters<AdvisorMovementsInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo movimientos históricos", input.request(), |client, request| async move {
            client.advisor_movements(&request).await
        })
        .await
    }

    #[tool(
        name = "asesores_obtener_ordenes_pendientes",
        description = "Obtener las órdenes pendientes de un cliente asesorado"
    )]
    async fn asesores_obtener_ordenes_pendientes(
        &self,
        Parameters(input): Parameters<ClientDateRangeInput>,
    ) -> Result<CallToolResult, ErrorData> {
        let validated = input.range().map(|dates| (input.id_cliente, dates));
        self.respond("Error obteniendo órdenes pendientes del cliente", validated, |client, (id, dates)| async move {
            client.client_pending_orders(id, dates).await
        })
        .await
    }

    #[tool(
        name = "asesores_obtener_ordenes_finalizadas",
        description = "Obtener las órdenes finalizadas de un cliente asesorado"
    )]
    async fn asesores_obtener_ordenes_finalizadas(
        &self,
        Parameters(input): Parameters<ClientDateRangeInput>,
    ) -> Result<CallToolResult, ErrorData> {
        let validated = input.range().map(|dates| (input.id_cliente, dates));
        self.respond("Error obteniendo órdenes finalizadas del cliente", validated, |client, (id, dates)| async move {
            client.client_finished_orders(id, dates).await
        })
        .await
    }

    #[tool(name = "asesores_comprar", description = "Crear una orden de compra para un cliente asesorado")]
    async fn asesores_comprar(
        &self,
        Parameters(input): Parameters<ClientOrderInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error creando orden de compra del cliente", input.order(), |client, (id, order)| async move {
            client.client_buy(id, &order).await
        })
        .await
    }

    #[tool(name = "asesores_vender", description = "Crear una orden de venta para un cliente asesorado")]
    async fn asesores_vender(
        &self,
        Parameters(input): Parameters<ClientOrderInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error creando orden de venta del cliente", input.order(), |client, (id, order)| async move {
            client.client_sell(id, &order).await
        })
        .await
    }

    #[tool(name = "asesores_cancelar_orden", description = "Cancelar una orden de un cliente asesorado")]
    async fn asesores_cancelar_orden(
        &self,
        Parameters(input): Parameters<ClientOrderNumberInput>,
    ) -> Result<CallToolResult, ErrorData> {
        let validated = path_segment("numero", &input.numero).map(|number| (input.id_cliente, number));
        self.respond("Error cancelando orden del cliente", validated, |client, (id, number)| async move {
            client.client_cancel_order(id, number).await
        })
        .await
    }

    #[tool(name = "asesores_obtener_test_inversor", description = "Obtener las preguntas del test de inversor")]
    async fn asesores_obtener_test_inversor(&self) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo test de inversor", Ok(()), |client, ()| async move {
            client.investor_test_questions().await
        })
        .await
    }

    #[tool(
        name = "asesores_calcular_perfil",
        description = "Calcular el perfil de inversor a partir de las respuestas sin guardarlo"
    )]
    async fn asesores_calcular_perfil(
        &self,
        Parameters(input): Parameters<InvestorAnswersInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error calculando perfil de inversor", input.answers(), |client, answers| async move {
            client.preview_investor_profile(&answers).await
        })
        .await
    }

    #[tool(
        name = "asesores_guardar_test_inversor",
        description = "Calcular y guardar el perfil de inversor de un cliente asesorado"
    )]
    async fn asesores_guardar_test_inversor(
        &self,
        Parameters(input): Parameters<ClientInvestorAnswersInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error guardando test de inversor", input.answers(), |client, (id, answers)| async move {
            client.save_investor_profile(id, &answers).await
        })
        .await
    }

    // ===== Simplified trading =====

    #[tool(name = "obtener_montos_estimados", description = "Obtener los montos estimados para un monto dado")]
    async fn obtener_montos_estimados(
        &self,
        Parameters(input): Parameters<AmountInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo montos estimados", input.amount(), |client, amount| async move {
            client.estimated_amounts(amount).await
        })
        .await
    }

    #[tool(
        name = "obtener_parametros_operatoria",
        description = "Obtener los parámetros de un tipo de operatoria simplificada"
    )]
    async fn obtener_parametros_operatoria(
        &self,
        Parameters(input): Parameters<OperationTypeInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo parámetros de operatoria", Ok(input.id_tipo_operatoria), |client, id| async move {
            client.simplified_parameters(id).await
        })
        .await
    }

    #[tool(name = "validar_operatoria", description = "Validar una operatoria simplificada")]
    async fn validar_operatoria(
        &self,
        Parameters(input): Parameters<ValidateSimplifiedInput>,
    ) -> Result<CallToolResult, ErrorData> {
        let validated = AmountInput { monto: input.monto }
            .amount()
            .map(|amount| (amount, input.id_tipo_operatoria));
        self.respond("Error validando operatoria", validated, |client, (amount, id)| async move {
            client.validate_simplified(amount, id).await
        })
        .await
    }

    #[tool(
        name = "obtener_montos_estimados_venta_mep",
        description = "Obtener los montos estimados para una venta MEP"
    )]
    async fn obtener_montos_estimados_venta_mep(
        &self,
        Parameters(input): Parameters<AmountInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo montos estimados de venta MEP", input.amount(), |client, amount| async move {
            client.mep_sale_estimates(amount).await
        })
        .await
    }

    #[tool(name = "obtener_valor_referencia_mep", description = "Obtener el valor de referencia del dólar MEP")]
    async fn obtener_valor_referencia_mep(
        &self,
        Parameters(input): Parameters<MepReferenceInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error obteniendo valor de referencia MEP", input.request(), |client, request| async move {
            client.mep_reference(&request).await
        })
        .await
    }

    #[tool(
        name = "comprar_operatoria_simplificada",
        description = "Comprar mediante operatoria simplificada"
    )]
    async fn comprar_operatoria_simplificada(
        &self,
        Parameters(input): Parameters<SimplifiedBuyInput>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond("Error comprando por operatoria simplificada", input.purchase(), |client, purchase| async move {
            client.simplified_buy(&purchase).await
        })
        .await
    }
}

#[tool_handler]
impl ServerHandler for IolMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use iolmcp_core::{Config, Credentials};
    use rmcp::model::RawContent;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn server_with_mock() -> (MockServer, IolMcpServer) {
        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "abc",
                "expires_in": 3600
            })))
            .mount(&mock)
            .await;
        let config = Config {
            credentials: Credentials::new("user", "secret"),
            base_url: mock.uri(),
            token_margin: Duration::seconds(300),
            request_timeout: std::time::Duration::from_secs(5),
            log_dir: None,
        };
        let client = IolClient::new(&config).unwrap();
        (mock, IolMcpServer::new(client))
    }

    fn envelope(result: &CallToolResult) -> Value {
        let text = match &result.content[0].raw {
            RawContent::Text(text) => text.text.clone(),
            other => panic!("unexpected content: {:?}", other),
        };
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn test_tool_inventory() {
        let router = IolMcpServer::tool_router();
        let mut names: Vec<String> = router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        let total = names.len();
        names.dedup();
        assert_eq!(names.len(), total, "tool names must be unique");

        for expected in [
            "obtener_portafolio",
            "obtener_operaciones",
            "obtener_saldos",
            "solicitar_extraccion",
            "titulos_obtener_cotizacion",
            "obtener_datos_historicos",
            "comprar",
            "vender",
            "cancelar_orden",
            "notificacion_obtener_notificaciones",
            "obtener_datos_perfil",
            "asesores_movimientos_historicos",
            "asesores_comprar",
            "asesores_guardar_test_inversor",
            "obtener_valor_referencia_mep",
            "comprar_operatoria_simplificada",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing tool {}", expected);
        }
    }

    #[test]
    fn test_parameter_schemas_are_objects() {
        let router = IolMcpServer::tool_router();
        for tool in router.list_all() {
            let schema = tool.input_schema.as_ref();
            if let Some(kind) = schema.get("type") {
                assert_eq!(kind, "object", "tool {} schema", tool.name);
            }
        }

        let operations = router
            .list_all()
            .into_iter()
            .find(|tool| tool.name == "obtener_operaciones")
            .unwrap();
        let properties = operations.input_schema.get("properties").unwrap();
        assert!(properties.get("fecha_desde").is_some());
        assert!(properties.get("estado").is_some());
    }

    #[tokio::test]
    async fn test_server_info_enables_tools() {
        let (_mock, server) = server_with_mock().await;
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.unwrap().contains("InvertirOnline"));
    }

    #[tokio::test]
    async fn test_tool_success_envelope() {
        let (mock, server) = server_with_mock().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/MiCuenta/EstadoCuenta"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"cuentas": []})))
            .mount(&mock)
            .await;

        let result = server.obtener_estado_cuenta().await.unwrap();
        assert_eq!(result.is_error, Some(false));
        assert_eq!(
            envelope(&result),
            json!({"success": true, "result": {"cuentas": []}})
        );
    }

    #[tokio::test]
    async fn test_tool_passes_filters() {
        let (mock, server) = server_with_mock().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/Operaciones"))
            .and(query_param("fechaDesde", "2024-01-01"))
            .and(query_param("estado", "terminadas"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&mock)
            .await;

        let input = OperationsInput {
            pais: None,
            estado: Some("terminadas".into()),
            fecha_desde: Some("2024-01-01".into()),
            fecha_hasta: None,
        };
        let result = server.obtener_operaciones(Parameters(input)).await.unwrap();
        assert_eq!(envelope(&result)["success"], true);
    }

    #[tokio::test]
    async fn test_tool_api_error_envelope() {
        let (mock, server) = server_with_mock().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/bCBA/Titulos/XYZ/Cotizacion"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Titulo inexistente"))
            .mount(&mock)
            .await;

        let input = QuoteInput {
            simbolo: "XYZ".into(),
            mercado: "bCBA".into(),
            plazo: None,
        };
        let result = server.titulos_obtener_cotizacion(Parameters(input)).await.unwrap();
        assert_eq!(result.is_error, Some(true));
        let value = envelope(&result);
        assert_eq!(value["kind"], "request");
        assert_eq!(value["status"], 404);
        assert!(value["error"]
            .as_str()
            .unwrap()
            .starts_with("Error obteniendo cotización: "));
    }

    #[tokio::test]
    async fn test_validation_error_skips_http() {
        let (mock, server) = server_with_mock().await;

        let input = OrderInput {
            simbolo: "GGAL".into(),
            cantidad: 0,
            precio: 100.0,
            validez: "2024-03-01".into(),
            mercado: "bCBA".into(),
            plazo: "t1".into(),
        };
        let result = server.comprar(Parameters(input)).await.unwrap();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(envelope(&result)["kind"], "validation");

        let requests = mock.received_requests().await.unwrap();
        assert!(requests.is_empty(), "no request should reach the API");
    }
}
