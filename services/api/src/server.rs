use crate::cli::ServeArgs;
use crate::infra::{seed_demo_data, AppState};
use crate::routes::with_api_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use vendorhub::accounts::{AccountService, AccountsApi};
use vendorhub::auth::TokenManager;
use vendorhub::config::AppConfig;
use vendorhub::error::AppError;
use vendorhub::telemetry;
use vendorhub::workflows::procurement::{MemoryStore, ProcurementApi, ProcurementService};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(MemoryStore::default());
    if args.seed_demo_data {
        let summary = seed_demo_data(&store)?;
        info!(
            vendors = summary.vendors,
            equipment = summary.equipment,
            "demo fixtures seeded"
        );
    }

    let tokens = Arc::new(TokenManager::from_config(&config.auth));
    let procurement = ProcurementApi {
        service: Arc::new(ProcurementService::new(store.clone())),
        tokens: tokens.clone(),
    };
    let accounts = AccountsApi {
        service: Arc::new(AccountService::new(store, tokens.clone())),
        tokens,
    };

    let app = with_api_routes(procurement, accounts)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "vendorhub marketplace api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
