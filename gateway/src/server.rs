//! Axum HTTP server for the payment gateway.
//!
//! All routes are `POST` with JSON bodies. CORS is permissive and every
//! request gets a tracing span.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use remit_ledger::{AuroraClient, LedgerNetwork};
use remit_types::{Clock, SystemClock};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::payments::{create_payment_xdr_handler, submit_signed_transaction_handler};
use crate::test_signing::make_payment_handler;

/// What every handler shares: the ledger, a clock and the fixed transaction
/// parameters. Nothing in it changes after startup.
pub struct AppState<L> {
    pub ledger: L,
    pub clock: Arc<dyn Clock>,
    pub passphrase: String,
    pub base_fee: u32,
    pub tx_timeout_secs: u64,
    pub memo: String,
}

impl<L> AppState<L> {
    pub fn new(ledger: L, config: &GatewayConfig) -> Self {
        Self {
            ledger,
            clock: Arc::new(SystemClock),
            passphrase: config.effective_passphrase(),
            base_fee: config.base_fee,
            tx_timeout_secs: config.tx_timeout_secs,
            memo: config.memo.clone(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// Build the gateway's router. `/make-payment` is mounted only when
/// `enable_test_signing` is set.
pub fn router<L: LedgerNetwork + 'static>(state: AppState<L>, enable_test_signing: bool) -> Router {
    let mut router = Router::new()
        .route("/create-payment-xdr", post(create_payment_xdr_handler::<L>))
        .route(
            "/submit-signed-transaction",
            post(submit_signed_transaction_handler::<L>),
        );
    if enable_test_signing {
        router = router.route("/make-payment", post(make_payment_handler::<L>));
    }
    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

pub struct GatewayServer<L> {
    config: GatewayConfig,
    state: AppState<L>,
}

impl GatewayServer<AuroraClient> {
    /// A server talking to the Aurora endpoint named by `config`.
    pub fn from_config(config: GatewayConfig) -> Result<Self, GatewayError> {
        config.validate()?;
        let ledger = AuroraClient::new(config.effective_aurora_url());
        Ok(Self::new(config, ledger))
    }
}

impl<L: LedgerNetwork + 'static> GatewayServer<L> {
    pub fn new(config: GatewayConfig, ledger: L) -> Self {
        let state = AppState::new(ledger, &config);
        Self { config, state }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.state = self.state.with_clock(clock);
        self
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Bind the listen address without serving yet.
    pub async fn bind(self) -> Result<BoundGateway, GatewayError> {
        let addr = self.config.listen_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| GatewayError::Server(format!("failed to bind {addr}: {e}")))?;
        let app = router(self.state, self.config.enable_test_signing);
        Ok(BoundGateway { listener, app })
    }
}

/// A gateway with its socket bound, ready to serve.
pub struct BoundGateway {
    listener: TcpListener,
    app: Router,
}

impl BoundGateway {
    pub fn local_addr(&self) -> Result<SocketAddr, GatewayError> {
        self.listener
            .local_addr()
            .map_err(|e| GatewayError::Server(e.to_string()))
    }

    /// Serve until `shutdown` resolves, then let in-flight requests finish.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.local_addr()?;
        info!(%addr, "payment gateway listening");
        axum::serve(self.listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| GatewayError::Server(e.to_string()))?;
        info!("payment gateway stopped");
        Ok(())
    }
}
