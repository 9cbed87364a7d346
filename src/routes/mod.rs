pub mod admin;
pub mod anomalies;
pub mod clients;
pub mod diagnostics;
pub mod health;
pub mod modules;
pub mod renewals;
pub mod signals;
pub mod sms;
pub mod welcome;

use std::any::Any;
use std::sync::Arc;

use axum::{
    Router, middleware,
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{MethodRouter, get, patch, post},
};
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::common::{AppState, Envelope, EnvelopeSchema, Status};
use crate::config::Config;
use crate::error::AppError;
use crate::services::rate_limit::FallbackIpKeyExtractor;

#[derive(OpenApi)]
#[openapi(
    paths(
        welcome::welcome,
        health::healthz,
        clients::list_clients,
        clients::get_client,
        clients::create_client,
        clients::update_client,
        clients::delete_client,
        modules::list_modules,
        modules::get_module,
        modules::create_module,
        modules::update_module,
        modules::patch_module,
        modules::unassign_module,
        modules::delete_module,
        renewals::list_renewals,
        renewals::list_module_renewals,
        renewals::create_renewal,
        signals::list_signals,
        signals::get_module_signal,
        diagnostics::list_diagnostics,
        diagnostics::get_diagnostics_by_date,
        diagnostics::get_module_diagnostics,
        anomalies::list_anomalies,
        anomalies::get_module_anomalies,
        anomalies::search_anomalies_by_date,
        sms::list_sms,
        sms::list_sms_by_date,
        sms::send_sms,
        admin::login,
        admin::login_status,
        admin::me,
        admin::logout,
    ),
    components(
        schemas(
            EnvelopeSchema,
            Status,
            health::HealthResponse,
            crate::entity::clients::Model,
            crate::entity::modules::Model,
            crate::entity::renewals::Model,
            crate::entity::sms_history::Model,
            crate::repositories::client::ClientSummary,
            crate::repositories::client::ClientFields,
            crate::repositories::module::ModuleWithClient,
            crate::repositories::module::ModuleFields,
            crate::repositories::module::ModulePatch,
            crate::repositories::renewal::RenewalWithClient,
            crate::repositories::signal::SignalWithClient,
            crate::repositories::diagnostics::DiagnosticWithClient,
            crate::repositories::anomaly::AnomalyWithClient,
            crate::repositories::anomaly::AnomalyOnDate,
            crate::repositories::sms::Recipient,
            crate::services::session::AdminIdentity,
            clients::CreateClientRequest,
            modules::CreateModuleRequest,
            renewals::CreateRenewalRequest,
            anomalies::SearchByDateRequest,
            sms::SendSmsRequest,
            admin::LoginRequest,
            admin::LoginResponse,
        )
    ),
    tags(
        (name = "health", description = "Welcome and health check endpoints"),
        (name = "clients", description = "Fleet customers"),
        (name = "modules", description = "GPS tracking modules, keyed by IMEI"),
        (name = "renewals", description = "Subscription renewals"),
        (name = "signals", description = "Loss-of-signal records"),
        (name = "diagnostics", description = "Sensor readings reported by modules"),
        (name = "anomalies", description = "Alert conditions"),
        (name = "sms", description = "SMS notification history"),
        (name = "admin", description = "Admin session login"),
    ),
    info(
        title = "Geo5Lux Admin API",
        description = "Administrative backend for a GPS fleet-tracking operation",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    let config = &state.config;

    let client_routes = Router::new()
        .route("/", get(clients::list_clients).post(clients::create_client))
        .route(
            "/{id}",
            get(clients::get_client)
                .put(clients::update_client)
                .delete(clients::delete_client),
        );

    let module_routes = Router::new()
        .route("/", get(modules::list_modules).post(modules::create_module))
        .route(
            "/{imei}",
            get(modules::get_module)
                .put(modules::update_module)
                .patch(modules::patch_module)
                .delete(modules::delete_module),
        )
        .route("/{imei}/unassign", patch(modules::unassign_module));

    let renewal_routes = Router::new()
        .route("/", get(renewals::list_renewals).post(renewals::create_renewal))
        .route("/{imei}", get(renewals::list_module_renewals));

    let signal_routes = Router::new()
        .route("/", get(signals::list_signals))
        .route("/{imei}", get(signals::get_module_signal));

    let diagnostics_routes = Router::new()
        .route("/", get(diagnostics::list_diagnostics))
        .route("/by-date/{imei}", get(diagnostics::get_diagnostics_by_date))
        .route("/{imei}", get(diagnostics::get_module_diagnostics));

    let anomaly_routes = Router::new()
        .route("/", get(anomalies::list_anomalies))
        .route("/search-by-date", post(anomalies::search_anomalies_by_date))
        .route("/{imei}", get(anomalies::get_module_anomalies));

    let sms_routes = Router::new()
        .route("/", get(sms::list_sms).post(sms::send_sms))
        .route("/by-date/{date}", get(sms::list_sms_by_date));

    let admin_routes = Router::new()
        .route(
            "/login",
            get(admin::login_status).merge(rate_limited_login(config)),
        )
        .route("/me", get(admin::me))
        .route("/logout", post(admin::logout));

    let api_routes = Router::new()
        .nest("/clients", client_routes)
        .nest("/modules", module_routes)
        .nest("/renewals", renewal_routes)
        .nest("/signals", signal_routes)
        .nest("/diagnostics", diagnostics_routes)
        .nest("/anomalies", anomaly_routes)
        .nest("/sms", sms_routes)
        .nest("/admin", admin_routes)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(RequestBodyLimitLayer::new(1024 * 1024)); // 1MB body limit

    // Welcome and health routes (NO rate limiting)
    let root_routes = Router::new()
        .route("/", get(welcome::welcome))
        .route("/healthz", get(health::healthz));

    // OpenAPI documentation
    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    Router::new()
        .nest("/api", api_routes)
        .merge(root_routes)
        .merge(docs_routes)
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CompressionLayer::new())
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `POST /login`, throttled per client IP unless disabled. Other admin
/// routes are not limited.
fn rate_limited_login(config: &Config) -> MethodRouter<AppState> {
    let login = post(admin::login);
    if config.disable_rate_limiting {
        tracing::warn!("Login rate limiting DISABLED");
        return login;
    }

    let Some(limiter) = GovernorConfigBuilder::default()
        .key_extractor(FallbackIpKeyExtractor)
        .per_second(config.rate_limit_login_per_second)
        .burst_size(config.rate_limit_login_burst)
        .finish()
    else {
        tracing::error!(
            per_second = config.rate_limit_login_per_second,
            burst = config.rate_limit_login_burst,
            "Invalid login rate limit, serving login unthrottled"
        );
        return login;
    };

    tracing::info!(
        login_rate = %format!(
            "1 per {}s, burst {}",
            config.rate_limit_login_per_second, config.rate_limit_login_burst
        ),
        "Login rate limiting configured"
    );
    login
        .layer(GovernorLayer {
            config: Arc::new(limiter),
        })
        .layer(middleware::map_response(envelope_rate_limited))
}

/// Wrap the limiter's plain-text 429 in the error envelope, keeping its
/// retry headers.
async fn envelope_rate_limited(response: Response) -> Response {
    if response.status() != StatusCode::TOO_MANY_REQUESTS {
        return response;
    }

    let (parts, _) = response.into_parts();
    let mut enveloped = Envelope::<()>::error(
        StatusCode::TOO_MANY_REQUESTS,
        "Too many login attempts, try again later",
    )
    .into_response();
    for (name, value) in &parts.headers {
        if name != header::CONTENT_TYPE && name != header::CONTENT_LENGTH {
            enveloped.headers_mut().insert(name.clone(), value.clone());
        }
    }
    enveloped
}

/// Credentialed CORS for the configured front-end origins.
fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
}

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(panic = %details, "Handler panicked");

    Envelope::<()>::error(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong!")
        .into_response()
}
