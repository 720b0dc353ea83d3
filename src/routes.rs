use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::access::ScopeResolver;
use crate::database::models::{Barangay, Household, Municipality, Resident, Zone};
use crate::database::store::{EntityStore, Table};
use crate::handlers::{entities, health, reports, residents, statistics};
use crate::services::{Managed, RegistryService};

/// Shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RegistryService>,
    pub resolver: ScopeResolver,
}

impl AppState {
    pub fn new(service: RegistryService, resolver: ScopeResolver) -> Self {
        Self {
            service: Arc::new(service),
            resolver,
        }
    }
}

pub fn app(state: AppState) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health::health))
        // Scoped API
        .merge(api_routes(state.clone()))
        .layer(CorsLayer::permissive());

    let router = if crate::config::config().api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };
    router.with_state(state)
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(entity_routes::<Municipality>("municipalities"))
        .merge(entity_routes::<Barangay>("barangays"))
        .merge(entity_routes::<Zone>("zones"))
        .merge(entity_routes::<Household>("households"))
        .merge(entity_routes::<Resident>("residents"))
        // Children of one parent
        .route(
            "/api/municipalities/:id/barangays",
            get(entities::list_children::<Barangay>),
        )
        .route("/api/barangays/:id/zones", get(entities::list_children::<Zone>))
        .route(
            "/api/zones/:id/households",
            get(entities::list_children::<Household>),
        )
        .route(
            "/api/households/:id/residents",
            get(entities::list_children::<Resident>),
        )
        .merge(statistics_routes())
        // Resident location cache
        .route("/api/residents/location-audit", get(residents::location_audit))
        .route(
            "/api/residents/:id/resync-location",
            post(residents::resync_location),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::scope_middleware,
        ))
}

fn entity_routes<T>(collection: &str) -> Router<AppState>
where
    T: Managed,
    dyn EntityStore: Table<T>,
{
    Router::new()
        .route(
            &format!("/api/{}", collection),
            get(entities::list::<T>).post(entities::create::<T>),
        )
        .route(
            &format!("/api/{}/:id", collection),
            get(entities::show::<T>)
                .put(entities::update::<T>)
                .delete(entities::delete::<T>),
        )
}

fn statistics_routes() -> Router<AppState> {
    Router::new()
        .route("/api/statistics/system", get(statistics::system))
        .route(
            "/api/statistics/municipalities/:id",
            get(statistics::municipality),
        )
        .route("/api/statistics/barangays/:id", get(statistics::barangay))
        .route("/api/statistics/zones/:id", get(statistics::zone))
        .route(
            "/api/reports/municipalities/:id",
            get(reports::municipality_report),
        )
}

async fn root() -> axum::response::Json<Value> {
    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Barangay Registry API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "health": "/health (public)",
                "entities": "/api/{municipalities|barangays|zones|households|residents}[/:id] (scoped)",
                "children": "/api/{parent}/:id/{children} (scoped)",
                "statistics": "/api/statistics/{system|municipalities/:id|barangays/:id|zones/:id} (scoped)",
                "reports": "/api/reports/municipalities/:id (scoped)",
                "locations": "/api/residents/location-audit, /api/residents/:id/resync-location (scoped)",
            }
        }
    }))
}
