//! Tool input types.
//!
//! Field names are the ones the tools advertise in their JSON schemas.
//! Each input converts into the typed request the core client expects,
//! rejecting malformed values before any HTTP call is made.

use chrono::NaiveDate;
use iolmcp_core::endpoints::{
    AdvisorMovementsRequest, DateRange, MepReferenceRequest, MovementFilter, OperationsFilter,
    Order, SimplifiedPurchase, Withdrawal,
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Input rejected before reaching the API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

pub type Validated<T> = Result<T, ValidationError>;

fn parse_date(field: &str, value: &str) -> Validated<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError(format!("{} must be a date in YYYY-MM-DD format, got {:?}", field, value))
    })
}

fn parse_opt_date(field: &str, value: Option<&str>) -> Validated<Option<NaiveDate>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => parse_date(field, value).map(Some),
        None => Ok(None),
    }
}

fn date_range(from: Option<&str>, to: Option<&str>) -> Validated<DateRange> {
    let range = DateRange::new(
        parse_opt_date("fecha_desde", from)?,
        parse_opt_date("fecha_hasta", to)?,
    );
    if let (Some(from), Some(to)) = (range.from, range.to) {
        if from > to {
            return Err(ValidationError(
                "fecha_desde must not be after fecha_hasta".to_string(),
            ));
        }
    }
    Ok(range)
}

/// Identifier interpolated into a URL path
pub fn path_segment<'a>(field: &str, value: &'a str) -> Validated<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError(format!("{} must not be empty", field)));
    }
    if value.contains(['/', '?', '#']) || value.chars().any(char::is_whitespace) {
        return Err(ValidationError(format!(
            "{} contains characters not allowed in a path: {:?}",
            field, value
        )));
    }
    Ok(value)
}

pub fn optional_path_segment<'a>(field: &str, value: Option<&'a str>) -> Validated<Option<&'a str>> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| path_segment(field, v))
        .transpose()
}

fn positive(field: &str, value: f64) -> Validated<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError(format!("{} must be greater than zero", field)))
    }
}

fn non_empty(field: &str, value: &str) -> Validated<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError(format!("{} must not be empty", field)))
    } else {
        Ok(value.to_string())
    }
}

fn opt_string(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

// ===== Portfolio / account =====

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CountryInput {
    /// País (argentina, estados_unidos, etc)
    pub pais: Option<String>,
}

impl CountryInput {
    pub fn country(&self) -> Option<&str> {
        self.pais.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct OperationsInput {
    /// País de las operaciones (argentina, estados_unidos, etc)
    pub pais: Option<String>,
    /// Estado de las operaciones (todas, pendientes, terminadas, canceladas)
    pub estado: Option<String>,
    /// Fecha de inicio en formato YYYY-MM-DD
    pub fecha_desde: Option<String>,
    /// Fecha de fin en formato YYYY-MM-DD
    pub fecha_hasta: Option<String>,
}

impl OperationsInput {
    pub fn filter(self) -> Validated<OperationsFilter> {
        Ok(OperationsFilter {
            dates: date_range(self.fecha_desde.as_deref(), self.fecha_hasta.as_deref())?,
            country: opt_string(self.pais),
            state: opt_string(self.estado),
        })
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct MovementsInput {
    /// País de los movimientos (argentina, estados_unidos, etc)
    pub pais: Option<String>,
    /// Tipo de movimiento (deposito, extraccion, suscripcion, rescate, etc)
    pub tipo_movimiento: Option<String>,
    /// Fecha de inicio en formato YYYY-MM-DD
    pub fecha_desde: Option<String>,
    /// Fecha de fin en formato YYYY-MM-DD
    pub fecha_hasta: Option<String>,
}

impl MovementsInput {
    pub fn filter(self) -> Validated<MovementFilter> {
        Ok(MovementFilter {
            dates: date_range(self.fecha_desde.as_deref(), self.fecha_hasta.as_deref())?,
            country: opt_string(self.pais),
            movement_type: opt_string(self.tipo_movimiento),
        })
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct MovementIdInput {
    /// ID del movimiento
    pub id_movimiento: i64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct WithdrawalInput {
    /// Monto a extraer
    pub monto: f64,
    /// ID de la cuenta bancaria destino
    pub id_cuenta_bancaria: i64,
    /// Moneda de la extracción (ARS, USD, etc)
    pub moneda: String,
}

impl WithdrawalInput {
    pub fn withdrawal(self) -> Validated<Withdrawal> {
        Ok(Withdrawal {
            amount: positive("monto", self.monto)?,
            bank_account_id: self.id_cuenta_bancaria,
            currency: non_empty("moneda", &self.moneda)?,
        })
    }
}

// ===== Securities =====

#[derive(Debug, Deserialize, JsonSchema)]
pub struct QuoteInput {
    /// Símbolo del título
    pub simbolo: String,
    /// Mercado del título (bcba, nyse, nasdaq, etc)
    pub mercado: String,
    /// Plazo de la cotización (t0, t1, t2)
    pub plazo: Option<String>,
}

/// (market, symbol, term)
pub type QuoteTarget<'a> = (&'a str, &'a str, Option<&'a str>);

impl QuoteInput {
    pub fn target(&self) -> Validated<QuoteTarget<'_>> {
        Ok((
            path_segment("mercado", &self.mercado)?,
            path_segment("simbolo", &self.simbolo)?,
            optional_path_segment("plazo", self.plazo.as_deref())?,
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SecurityInput {
    /// Símbolo del título
    pub simbolo: String,
    /// Mercado del título (bcba, nyse, nasdaq, etc)
    pub mercado: String,
}

impl SecurityInput {
    /// (market, symbol)
    pub fn target(&self) -> Validated<(&str, &str)> {
        Ok((
            path_segment("mercado", &self.mercado)?,
            path_segment("simbolo", &self.simbolo)?,
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PanelInput {
    /// Tipo de instrumento (Acciones, Bonos, Opciones, etc)
    pub instrumento: String,
    /// País del panel (argentina, estados_unidos, etc)
    pub pais: String,
}

impl PanelInput {
    /// (country, instrument)
    pub fn target(&self) -> Validated<(&str, &str)> {
        Ok((
            path_segment("pais", &self.pais)?,
            path_segment("instrumento", &self.instrumento)?,
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct HistoryInput {
    /// Símbolo del título
    pub simbolo: String,
    /// Mercado del título (bcba, nyse, nasdaq, etc)
    pub mercado: String,
    /// Fecha de inicio en formato YYYY-MM-DD
    pub desde: String,
    /// Fecha de fin en formato YYYY-MM-DD
    pub hasta: String,
    /// Ajustar los datos por dividendos (por defecto true)
    pub ajustado: Option<bool>,
}

pub struct HistoryQuery<'a> {
    pub market: &'a str,
    pub symbol: &'a str,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub adjusted: bool,
}

impl HistoryInput {
    pub fn query(&self) -> Validated<HistoryQuery<'_>> {
        let from = parse_date("desde", &self.desde)?;
        let to = parse_date("hasta", &self.hasta)?;
        if from > to {
            return Err(ValidationError("desde must not be after hasta".to_string()));
        }
        Ok(HistoryQuery {
            market: path_segment("mercado", &self.mercado)?,
            symbol: path_segment("simbolo", &self.simbolo)?,
            from,
            to,
            adjusted: self.ajustado.unwrap_or(true),
        })
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchInput {
    /// Texto a buscar (nombre o símbolo)
    pub filtro: String,
    /// Mercado del título (bcba, nyse, nasdaq, etc)
    pub mercado: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CountryRequiredInput {
    /// País (argentina, estados_unidos, etc)
    pub pais: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct FundInput {
    /// Símbolo del FCI; sin símbolo se listan todos
    pub simbolo: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ManagerInput {
    /// Nombre de la administradora
    pub administradora: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ManagerFundTypeInput {
    /// Nombre de la administradora
    pub administradora: String,
    /// Tipo de fondo
    pub tipo_fondo: String,
}

// ===== Trading =====

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct DateRangeInput {
    /// Fecha desde (YYYY-MM-DD)
    pub fecha_desde: Option<String>,
    /// Fecha hasta (YYYY-MM-DD)
    pub fecha_hasta: Option<String>,
}

impl DateRangeInput {
    pub fn range(&self) -> Validated<DateRange> {
        date_range(self.fecha_desde.as_deref(), self.fecha_hasta.as_deref())
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct OrderInput {
    /// Símbolo del instrumento
    pub simbolo: String,
    /// Cantidad de títulos
    pub cantidad: u64,
    /// Precio límite
    pub precio: f64,
    /// Validez de la orden (fecha)
    pub validez: String,
    /// Mercado donde operar (bCBA, nYSE, etc)
    pub mercado: String,
    /// Plazo de liquidación (t0, t1, t2)
    pub plazo: String,
}

impl OrderInput {
    pub fn order(self) -> Validated<Order> {
        if self.cantidad == 0 {
            return Err(ValidationError("cantidad must be greater than zero".to_string()));
        }
        Ok(Order {
            symbol: non_empty("simbolo", &self.simbolo)?,
            quantity: self.cantidad,
            price: positive("precio", self.precio)?,
            valid_until: non_empty("validez", &self.validez)?,
            market: non_empty("mercado", &self.mercado)?,
            settlement: non_empty("plazo", &self.plazo)?,
        })
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct OrderNumberInput {
    /// Número de orden
    pub numero: String,
}

impl OrderNumberInput {
    pub fn number(&self) -> Validated<&str> {
        path_segment("numero", &self.numero)
    }
}

// ===== Notifications =====

#[derive(Debug, Deserialize, JsonSchema)]
pub struct NotificationIdInput {
    /// ID de la notificación
    pub id_notificacion: i64,
}

// ===== Advisors =====

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AdvisorMovementsInput {
    /// IDs de clientes asesorados
    pub clientes: Option<Vec<i64>>,
    /// Fecha desde en formato ISO
    pub fecha_desde: String,
    /// Fecha hasta en formato ISO
    pub fecha_hasta: String,
    /// Tipo de fecha para filtrar
    pub tipo_fecha: String,
    /// Estado de los movimientos
    pub estado: String,
    /// Tipo de movimiento
    pub tipo: Option<String>,
    /// País de los movimientos
    pub pais: String,
    /// Moneda de los movimientos
    pub moneda: Option<String>,
    /// Cuenta comitente
    pub cuenta_comitente: Option<String>,
}

impl AdvisorMovementsInput {
    pub fn request(self) -> Validated<AdvisorMovementsRequest> {
        Ok(AdvisorMovementsRequest {
            clients: self.clientes.unwrap_or_default(),
            from: non_empty("fecha_desde", &self.fecha_desde)?,
            to: non_empty("fecha_hasta", &self.fecha_hasta)?,
            date_type: non_empty("tipo_fecha", &self.tipo_fecha)?,
            status: non_empty("estado", &self.estado)?,
            kind: opt_string(self.tipo),
            country: non_empty("pais", &self.pais)?,
            currency: opt_string(self.moneda),
            custody_account: opt_string(self.cuenta_comitente),
        })
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ClientDateRangeInput {
    /// ID del cliente asesorado
    pub id_cliente: i64,
    /// Fecha desde (YYYY-MM-DD)
    pub fecha_desde: Option<String>,
    /// Fecha hasta (YYYY-MM-DD)
    pub fecha_hasta: Option<String>,
}

impl ClientDateRangeInput {
    pub fn range(&self) -> Validated<DateRange> {
        date_range(self.fecha_desde.as_deref(), self.fecha_hasta.as_deref())
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ClientOrderInput {
    /// ID del cliente asesorado
    pub id_cliente: i64,
    /// Símbolo del instrumento
    pub simbolo: String,
    /// Cantidad de títulos
    pub cantidad: u64,
    /// Precio límite
    pub precio: f64,
    /// Validez de la orden (fecha)
    pub validez: String,
    /// Mercado donde operar (bCBA, nYSE, etc)
    pub mercado: String,
    /// Plazo de liquidación (t0, t1, t2)
    pub plazo: String,
}

impl ClientOrderInput {
    /// (client id, order)
    pub fn order(self) -> Validated<(i64, Order)> {
        let client_id = self.id_cliente;
        let order = OrderInput {
            simbolo: self.simbolo,
            cantidad: self.cantidad,
            precio: self.precio,
            validez: self.validez,
            mercado: self.mercado,
            plazo: self.plazo,
        }
        .order()?;
        Ok((client_id, order))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ClientOrderNumberInput {
    /// ID del cliente asesorado
    pub id_cliente: i64,
    /// Número de orden
    pub numero: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct InvestorAnswersInput {
    /// Respuestas del test de inversor
    pub respuestas: Value,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ClientInvestorAnswersInput {
    /// ID del cliente asesorado
    pub id_cliente_asesorado: i64,
    /// Respuestas del test de inversor
    pub respuestas: Value,
}

fn answers(value: Value) -> Validated<Value> {
    if value.is_object() {
        Ok(value)
    } else {
        Err(ValidationError("respuestas must be a JSON object".to_string()))
    }
}

impl InvestorAnswersInput {
    pub fn answers(self) -> Validated<Value> {
        answers(self.respuestas)
    }
}

impl ClientInvestorAnswersInput {
    pub fn answers(self) -> Validated<(i64, Value)> {
        Ok((self.id_cliente_asesorado, answers(self.respuestas)?))
    }
}

// ===== Simplified trading =====

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AmountInput {
    /// Monto de la operación
    pub monto: f64,
}

impl AmountInput {
    pub fn amount(&self) -> Validated<f64> {
        positive("monto", self.monto)
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct OperationTypeInput {
    /// ID del tipo de operatoria
    pub id_tipo_operatoria: i64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ValidateSimplifiedInput {
    /// Monto de la operación
    pub monto: f64,
    /// ID del tipo de operatoria
    pub id_tipo_operatoria: i64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct MepReferenceInput {
    /// Símbolo del título
    pub simbolo: String,
    /// ID del plazo de operatoria de compra
    pub id_plazo_operatoria_compra: i64,
    /// ID del plazo de operatoria de venta
    pub id_plazo_operatoria_venta: i64,
}

impl MepReferenceInput {
    pub fn request(self) -> Validated<MepReferenceRequest> {
        Ok(MepReferenceRequest {
            symbol: non_empty("simbolo", &self.simbolo)?,
            buy_term_id: self.id_plazo_operatoria_compra,
            sell_term_id: self.id_plazo_operatoria_venta,
        })
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SimplifiedBuyInput {
    /// Monto de la operación
    pub monto: f64,
    /// ID del tipo de operatoria simplificada
    pub id_tipo_operatoria_simplificada: i64,
    /// ID de la cuenta bancaria
    pub id_cuenta_bancaria: i64,
}

impl SimplifiedBuyInput {
    pub fn purchase(self) -> Validated<SimplifiedPurchase> {
        Ok(SimplifiedPurchase {
            amount: positive("monto", self.monto)?,
            operation_type_id: self.id_tipo_operatoria_simplificada,
            bank_account_id: self.id_cuenta_bancaria,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_range_validation() {
        let range = date_range(Some("2024-01-01"), Some(" 2024-01-31 ")).unwrap();
        assert_eq!(range.from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(range.to, NaiveDate::from_ymd_opt(2024, 1, 31));

        // Blank means unset
        assert_eq!(date_range(Some(""), None).unwrap(), DateRange::default());

        let err = date_range(Some("01/02/2024"), None).unwrap_err();
        assert!(err.0.contains("fecha_desde"));

        let err = date_range(Some("2024-02-01"), Some("2024-01-01")).unwrap_err();
        assert!(err.0.contains("must not be after"));
    }

    #[test]
    fn test_validation_error_displays_message() {
        let err = ValidationError("monto must be greater than zero".to_string());
        assert_eq!(err.to_string(), "monto must be greater than zero");
        let source: &dyn std::error::Error = &err;
        assert!(source.source().is_none());
    }

    #[test]
    fn test_segment_rejects_path_characters() {
        assert_eq!(path_segment("simbolo", " GGAL ").unwrap(), "GGAL");
        assert!(path_segment("simbolo", "").is_err());
        assert!(path_segment("simbolo", "GG/AL").is_err());
        assert!(path_segment("simbolo", "GGAL?x=1").is_err());
        assert!(path_segment("simbolo", "GG AL").is_err());
        assert_eq!(optional_path_segment("plazo", Some("  ")).unwrap(), None);
    }

    #[test]
    fn test_order_validation() {
        let input = OrderInput {
            simbolo: "GGAL".into(),
            cantidad: 10,
            precio: 1500.0,
            validez: "2024-03-01".into(),
            mercado: "bCBA".into(),
            plazo: "t1".into(),
        };
        let order = input.order().unwrap();
        assert_eq!(order.symbol, "GGAL");
        assert_eq!(order.quantity, 10);

        let zero_qty = OrderInput {
            simbolo: "GGAL".into(),
            cantidad: 0,
            precio: 1500.0,
            validez: "2024-03-01".into(),
            mercado: "bCBA".into(),
            plazo: "t1".into(),
        };
        assert!(zero_qty.order().is_err());

        let bad_price = OrderInput {
            simbolo: "GGAL".into(),
            cantidad: 1,
            precio: f64::NAN,
            validez: "2024-03-01".into(),
            mercado: "bCBA".into(),
            plazo: "t1".into(),
        };
        assert!(bad_price.order().unwrap_err().0.contains("precio"));
    }

    #[test]
    fn test_history_defaults_to_adjusted() {
        let input = HistoryInput {
            simbolo: "GGAL".into(),
            mercado: "bCBA".into(),
            desde: "2024-01-01".into(),
            hasta: "2024-02-01".into(),
            ajustado: None,
        };
        let query = input.query().unwrap();
        assert!(query.adjusted);
        assert_eq!(query.market, "bCBA");
    }

    #[test]
    fn test_investor_answers_must_be_object() {
        let input = InvestorAnswersInput {
            respuestas: serde_json::json!([1, 2]),
        };
        assert!(input.answers().is_err());
    }

    #[test]
    fn test_advisor_request_drops_blank_optionals() {
        let input = AdvisorMovementsInput {
            clientes: None,
            fecha_desde: "2024-01-01".into(),
            fecha_hasta: "2024-01-31".into(),
            tipo_fecha: "fechaOperacion".into(),
            estado: "terminadas".into(),
            tipo: Some("  ".into()),
            pais: "argentina".into(),
            moneda: None,
            cuenta_comitente: None,
        };
        let request = input.request().unwrap();
        assert!(request.clients.is_empty());
        assert_eq!(request.kind, None);
    }
}
