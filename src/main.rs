use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use payment_gateway::adapters::http::{payment_router, PaymentAppState};
use payment_gateway::adapters::{InMemoryPendingPaymentStore, VnpayGateway};
use payment_gateway::config::{AppConfig, ServerConfig};
use payment_gateway::ports::PaymentGateway;

#[tokio::main]
async fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    initialize_logging(&config.server);

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let gateway: Option<Arc<dyn PaymentGateway>> = match config.payment.clone() {
        Some(payment) => {
            info!(
                merchant_code = %payment.merchant_code,
                sandbox = payment.is_sandbox(),
                "Payment gateway configured"
            );
            Some(Arc::new(VnpayGateway::new(payment)))
        }
        None => {
            warn!("Payment gateway not configured; payment endpoints will be rejected");
            None
        }
    };

    if !config.server.trust_proxy_headers {
        info!("Ignoring forwarded headers; client IP taken from the socket peer");
    }

    let state = PaymentAppState::new(gateway, Arc::new(InMemoryPendingPaymentStore::new()))
        .with_trusted_proxy_headers(config.server.trust_proxy_headers);
    let app = payment_router()
        .with_state(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Server listening on {}", addr);

    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

fn initialize_logging(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if server.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
