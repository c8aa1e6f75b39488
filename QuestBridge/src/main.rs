use qbconfig::get_config;
use qbosc::{OscListener, OscSender};
use qbserver::{create_router, AppState, PageCache, Server};
use qbstate::{spawn_elapsed_clock, StateStore};
use qbtube::TubeClient;
use qbutils::{guess_local_ip, local_addresses};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = get_config();

    // ========== Phase 1: shared state and background tasks ==========

    let store = StateStore::default();
    spawn_elapsed_clock(store.clone());

    let tube = Arc::new(TubeClient::new()?);

    info!("📄 Initializing player page cache...");
    let pages = PageCache::new(config.get_player_page_url());
    pages.spawn_refresh(config.get_page_refresh_secs());

    // ========== Phase 2: OSC plumbing ==========

    info!("🎮 Connecting OSC output...");
    match config.osc_target().and_then(|t| Ok(OscSender::new(t)?)) {
        Ok(sender) => {
            info!("✅ OSC output targeting {}", sender.target());
            if let Err(e) = sender.send_typing(false) {
                warn!("⚠️ Initial OSC send failed: {}", e);
            }
        }
        Err(e) => warn!("⚠️ OSC output unavailable: {}", e),
    }

    // Inbound OSC is informational only; messages are drained and logged
    let (osc_tx, osc_rx) = crossbeam_channel::unbounded();
    let _listener = match OscListener::start(config.get_osc_listen_port(), osc_tx) {
        Ok(listener) => {
            info!("✅ OSC listener on port {}", listener.port());
            Some(listener)
        }
        Err(e) => {
            warn!("⚠️ OSC listener disabled: {}", e);
            None
        }
    };
    std::thread::spawn(move || {
        for message in osc_rx {
            debug!(address = %message.address, args = ?message.args, "OSC received");
        }
    });

    // ========== Phase 3: HTTP server ==========

    info!("🌐 Starting HTTP server...");
    let state = AppState::new(store, tube, pages);
    let router = create_router(state);

    let port = config.get_http_port();
    let mut server = Server::new("QuestBridge", port);
    match server.start(router).await {
        Ok(()) => {
            info!("✅ QuestBridge is ready!");
            info!("  Local:   http://{}:{}", guess_local_ip(), port);
            for (interface, addresses) in local_addresses() {
                for address in addresses {
                    info!("  Network: http://{}:{} ({})", address, port, interface);
                }
            }
            info!("Press Ctrl+C to stop...");
            server.wait().await;
        }
        Err(e) => {
            // The OSC side keeps running even without the sync API
            warn!("⚠️ HTTP server disabled: {}", e);
            info!("Press Ctrl+C to stop...");
            let _ = tokio::signal::ctrl_c().await;
        }
    }

    Ok(())
}
