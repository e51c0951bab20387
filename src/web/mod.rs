use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::advisor::{Advisor, Recommendation};
use crate::cards::{Hand, parse_cards};
use crate::config::EngineConfig;
use crate::equity::{EquityReport, EquitySimulator, SimulationOptions};
use crate::error::Error;
use crate::ev::{EvCalculator, EvOutcome, Valuation};
use crate::game::Action;
use crate::icm::checked_icm_value;
use crate::range::parse_range;
use crate::scenario::{HERO_NAME, ScenarioSpec};

#[derive(Clone)]
struct AppState {
    config: Arc<EngineConfig>,
    simulator: EquitySimulator,
}

impl AppState {
    fn new(config: EngineConfig) -> Result<Self> {
        let simulator = config.simulator()?;
        Ok(Self {
            config: Arc::new(config),
            simulator,
        })
    }

    fn options(&self, overrides: &SimulationOverrides) -> SimulationOptions {
        let mut options = self.config.options();
        if let Some(simulations) = overrides.simulations {
            options.simulations = simulations;
        }
        if overrides.seed.is_some() {
            options.seed = overrides.seed;
        }
        options
    }

    fn calculator(&self, overrides: &SimulationOverrides) -> EvCalculator {
        EvCalculator::new(self.simulator.clone(), self.options(overrides))
    }
}

#[derive(Debug, Default, Deserialize)]
struct SimulationOverrides {
    simulations: Option<u32>,
    seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RangeRequest {
    range: String,
}

#[derive(Debug, Serialize)]
struct RangeResponse {
    combos: usize,
    hands: Vec<Hand>,
}

#[derive(Debug, Deserialize)]
struct EquityRequest {
    hero: String,
    #[serde(default)]
    board: String,
    range: String,
    #[serde(flatten)]
    overrides: SimulationOverrides,
}

#[derive(Debug, Serialize)]
struct EquityResponse {
    equity: f64,
    report: EquityReport,
}

#[derive(Debug, Deserialize)]
struct EvRequest {
    #[serde(flatten)]
    scenario: ScenarioSpec,
    range: String,
    action: Action,
    #[serde(default)]
    bet_size: f64,
    #[serde(default)]
    use_icm: bool,
    payouts: Option<Vec<f64>>,
    #[serde(flatten)]
    overrides: SimulationOverrides,
}

#[derive(Debug, Deserialize)]
struct OptimalRequest {
    #[serde(flatten)]
    scenario: ScenarioSpec,
    range: String,
    amount_to_call: f64,
    #[serde(default)]
    use_icm: bool,
    payouts: Option<Vec<f64>>,
    #[serde(flatten)]
    overrides: SimulationOverrides,
}

#[derive(Debug, Deserialize)]
struct IcmRequest {
    stacks: Vec<f64>,
    payouts: Vec<f64>,
}

#[derive(Debug, Serialize)]
struct IcmResponse {
    values: Vec<f64>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error(transparent)]
    BadRequest(#[from] Error),
    #[error("worker failed: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub async fn serve(addr: SocketAddr, config: EngineConfig) -> Result<()> {
    let app = router_with(config)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/range", post(expand_range))
        .route("/equity", post(compute_equity))
        .route("/ev", post(compute_ev))
        .route("/optimal", post(find_optimal))
        .route("/icm", post(compute_icm));

    Router::new()
        .route("/healthz", get(health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Router with the default engine configuration.
pub fn router() -> Router {
    build_router(AppState {
        config: Arc::new(EngineConfig::default()),
        simulator: EquitySimulator::default(),
    })
}

pub fn router_with(config: EngineConfig) -> Result<Router> {
    Ok(build_router(AppState::new(config)?))
}

async fn health() -> &'static str {
    "ok"
}

/// Simulations are CPU-bound; keep them off the async workers.
async fn blocking<T, F>(job: F) -> Result<T, ApiError>
where
    F: FnOnce() -> crate::error::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?
        .map_err(ApiError::from)
}

async fn expand_range(Json(req): Json<RangeRequest>) -> Json<RangeResponse> {
    let hands: Vec<Hand> = parse_range(&req.range).into_iter().collect();
    Json(RangeResponse {
        combos: hands.len(),
        hands,
    })
}

async fn compute_equity(
    State(state): State<AppState>,
    Json(req): Json<EquityRequest>,
) -> Result<Json<EquityResponse>, ApiError> {
    let options = state.options(&req.overrides);
    let simulator = state.simulator.clone();
    let report = blocking(move || {
        let hero: Hand = req.hero.parse()?;
        let board = parse_cards(&req.board)?;
        simulator.simulate(&hero, &parse_range(&req.range), &board, &options)
    })
    .await?;
    Ok(Json(EquityResponse {
        equity: report.equity(),
        report,
    }))
}

async fn compute_ev(
    State(state): State<AppState>,
    Json(req): Json<EvRequest>,
) -> Result<Json<EvOutcome>, ApiError> {
    let calculator = state.calculator(&req.overrides);
    let outcome = blocking(move || {
        let valuation = Valuation::from_flags(req.use_icm, req.payouts.as_deref())?;
        let scenario = req.scenario.build()?;
        calculator.evaluate(&scenario, HERO_NAME, &req.range, req.action, req.bet_size, &valuation)
    })
    .await?;
    Ok(Json(outcome))
}

async fn find_optimal(
    State(state): State<AppState>,
    Json(req): Json<OptimalRequest>,
) -> Result<Json<Recommendation>, ApiError> {
    let advisor = Advisor::new(
        state.calculator(&req.overrides),
        state.config.raise_multipliers.clone(),
    );
    let recommendation = blocking(move || {
        let valuation = Valuation::from_flags(req.use_icm, req.payouts.as_deref())?;
        let scenario = req.scenario.build()?;
        advisor.recommend(&scenario, HERO_NAME, &req.range, req.amount_to_call, &valuation)
    })
    .await?;
    Ok(Json(recommendation))
}

async fn compute_icm(Json(req): Json<IcmRequest>) -> Result<Json<IcmResponse>, ApiError> {
    let values = blocking(move || checked_icm_value(&req.stacks, &req.payouts)).await?;
    Ok(Json(IcmResponse { values }))
}
