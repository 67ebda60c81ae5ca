use std::sync::Arc;
use tokio::sync::Notify;

mod chat;
mod config;
mod handler;
mod http;
mod logger;
mod processor;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg.logging)?;

    // Worker threads default to CPU cores
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    let result = runtime.block_on(async_main(cfg));
    if let Err(ref e) = result {
        logger::log_error(&format!("Gateway stopped with error: {e}"));
    }
    logger::flush();
    result
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let processor = processor::UpstreamProcessor::new(&cfg.processor.upstream_url)?;
    logger::log_debug(&format!("Chat processor upstream: {}", processor.uri()));

    let listener = server::create_reusable_listener(addr)?;
    let state = Arc::new(config::AppState::new(cfg, Arc::new(processor)));
    logger::log_server_start(&addr, &state.config);

    let shutdown = Arc::new(Notify::new());
    server::start_signal_handler(Arc::clone(&shutdown));

    // Connections are served with spawn_local
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(listener, state, shutdown))
        .await;
    Ok(())
}
