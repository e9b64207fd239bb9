use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::sync::Notify;

mod config;
mod handler;
mod http;
mod logger;
mod rules;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;

    logger::init(&cfg)?;

    // Build the runtime, honoring the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    // A missing or malformed rule file is fatal at startup
    let state = Arc::new(config::AppState::new(cfg).await?);

    let listener = server::create_listener(addr)?;
    let active_connections = Arc::new(AtomicUsize::new(0));
    let shutdown = Arc::new(Notify::new());

    server::start_signal_handler(Arc::clone(&state), Arc::clone(&shutdown));

    let table = state.rules.table().await?;
    if table.is_empty() {
        logger::log_warning(
            "Rule file contains no rules; all requests fall through to static content",
        );
    }
    logger::log_server_start(&addr, &state.config, table.len());

    server::start_server_loop(listener, state, active_connections, shutdown).await;

    Ok(())
}
