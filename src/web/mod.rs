//! Web layer: the single generation route and its orchestration.

use std::num::NonZeroU16;

use axum::extract::State;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::{Credentials, UpstreamEndpoints};
use crate::error::TerraformerError;
use crate::gemini;
use crate::prompt::build_prompt;
use crate::reference::{ReferenceKind, StreetViewPov, fetch_reference_image};

/// Shared state for the web handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    http: reqwest::Client,
    credentials: Credentials,
    endpoints: UpstreamEndpoints,
}

impl AppState {
    /// Builds state pointing at the production upstream endpoints.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self::with_endpoints(credentials, UpstreamEndpoints::default())
    }

    /// Builds state with explicit upstream endpoints.
    #[must_use]
    pub fn with_endpoints(credentials: Credentials, endpoints: UpstreamEndpoints) -> Self {
        Self {
            http: reqwest::Client::new(),
            credentials,
            endpoints,
        }
    }
}

/// Inbound document for the generation route.
///
/// Every field except `street_view_pov` is required; an empty or
/// whitespace-only string counts as missing. The two key fields may be
/// omitted when the server holds defaults.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Latitude in degrees.
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    pub longitude: Option<f64>,
    /// Visual style, free text or one of the frontend presets.
    pub style: Option<String>,
    /// Who or what inhabits the scene.
    pub population: Option<String>,
    /// Time period; "Present Day" suppresses the era clause.
    pub time_period: Option<String>,
    /// Gemini API key.
    pub api_key: Option<String>,
    /// Maps Static / Street View API key.
    pub maps_api_key: Option<String>,
    /// Camera direction for the street-level reference.
    pub street_view_pov: Option<StreetViewPov>,
}

/// Success document for the generation route.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    /// Generated image as a `data:` URL.
    pub image_data: String,
    /// URL of the reference image that seeded the generation, so the caller
    /// can re-view it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_map_url: Option<String>,
    /// Informational note, set when the roadmap fallback was used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

struct ValidatedRequest {
    latitude: f64,
    longitude: f64,
    style: String,
    population: String,
    time_period: String,
    api_key: String,
    maps_api_key: String,
    maps_key_from_request: bool,
    pov: Option<StreetViewPov>,
}

fn present(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn validate(
    request: GenerateRequest,
    credentials: &Credentials,
) -> Result<ValidatedRequest, TerraformerError> {
    let style = present(request.style);
    let population = present(request.population);
    let time_period = present(request.time_period);
    let api_key = present(request.api_key).or_else(|| credentials.gemini_api_key.clone());
    let request_maps_key = present(request.maps_api_key);
    let maps_key_from_request = request_maps_key.is_some();
    let maps_api_key = request_maps_key.or_else(|| credentials.maps_api_key.clone());

    let mut missing = Vec::new();
    if request.latitude.is_none() {
        missing.push("latitude");
    }
    if request.longitude.is_none() {
        missing.push("longitude");
    }
    if style.is_none() {
        missing.push("style");
    }
    if population.is_none() {
        missing.push("population");
    }
    if time_period.is_none() {
        missing.push("timePeriod");
    }
    if api_key.is_none() {
        missing.push("apiKey");
    }
    if maps_api_key.is_none() {
        missing.push("mapsApiKey");
    }

    if let (
        Some(latitude),
        Some(longitude),
        Some(style),
        Some(population),
        Some(time_period),
        Some(api_key),
        Some(maps_api_key),
    ) = (
        request.latitude,
        request.longitude,
        style,
        population,
        time_period,
        api_key,
        maps_api_key,
    ) {
        Ok(ValidatedRequest {
            latitude,
            longitude,
            style,
            population,
            time_period,
            api_key,
            maps_api_key,
            maps_key_from_request,
            pov: request.street_view_pov,
        })
    } else {
        Err(TerraformerError::MissingFields(missing))
    }
}

async fn generate_handler(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, TerraformerError> {
    let request = validate(request, &state.credentials)?;

    let reference = fetch_reference_image(
        &state.http,
        &state.endpoints,
        request.latitude,
        request.longitude,
        request.pov.as_ref(),
        &request.maps_api_key,
    )
    .await?;

    let prompt = build_prompt(
        &request.style,
        &request.population,
        &request.time_period,
        reference.kind,
    );
    info!(
        "Generating a {} image at {},{}",
        request.style, request.latitude, request.longitude
    );

    let image_data = gemini::generate(
        &state.http,
        &state.endpoints.gemini,
        &request.api_key,
        &prompt,
        &reference,
    )
    .await?;

    let message = match reference.kind {
        ReferenceKind::StreetView => None,
        ReferenceKind::Roadmap => Some(
            "No street-level imagery near this point; a map view was used as the reference instead."
                .to_string(),
        ),
    };

    // a caller that supplied the key gets the URL back verbatim; a caller
    // relying on the server-held key must not learn it
    let reference_map_url = if request.maps_key_from_request {
        reference.url
    } else {
        crate::reference::redact_key(&reference.url)
    };

    Ok(Json(GenerateResponse {
        image_data,
        reference_map_url: Some(reference_map_url),
        message,
    }))
}

async fn root_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::get(root_handler))
        .route("/api/generate", axum::routing::post(generate_handler))
}

/// Binds the listener and serves the app until shutdown.
pub async fn setup_server(
    listen_addr: &str,
    port: NonZeroU16,
    state: AppState,
) -> Result<(), anyhow::Error> {
    let app = create_router().with_state(state);

    let addr = format!("{}:{}", listen_addr, port);
    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    if let Err(err) = axum::serve(listener, app).await {
        error!("Server error: {}", err);
    }
    Ok(())
}
