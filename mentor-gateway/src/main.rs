//! Entry point for the `mentor-gateway` HTTP server.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use mentor_auth::{AccountService, ApiKeyManager, MemoryStore, TokenService};
use mentor_gateway::config::Config;
use mentor_gateway::genai::GeminiClient;
use mentor_gateway::routes::{create_router, AppState};
use mentor_sandbox::{SandboxConfig, ScriptRunner};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env();

    let store = Arc::new(MemoryStore::new());
    let tokens = TokenService::new(&config.access_secret, &config.refresh_secret);
    let accounts = Arc::new(AccountService::new(
        store.clone(),
        tokens,
        config.rotate_refresh,
    ));
    let api_keys = Arc::new(ApiKeyManager::new(
        store.clone(),
        config.default_api_key.clone(),
        config.allow_key_fallback,
    ));

    let runner = Arc::new(ScriptRunner::new(
        SandboxConfig::new(config.sandbox_dir.clone())
            .with_interpreter(config.python_bin.clone(), vec!["-u".to_owned()])
            .with_timeout(config.exec_timeout),
    ));
    if let Err(e) = runner.init_workdir().await {
        tracing::error!(dir = %config.sandbox_dir.display(), error = %e, "failed to create sandbox dir");
        std::process::exit(1);
    }

    let model = Arc::new(GeminiClient::new(
        config.genai_url.clone(),
        config.genai_model.clone(),
    ));

    let app = create_router(AppState {
        accounts,
        store,
        api_keys,
        runner,
        model,
    });

    let listener = match tokio::net::TcpListener::bind(&config.listen_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %config.listen_addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    info!(addr = %config.listen_addr, "mentor-gateway listening");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
