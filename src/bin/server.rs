//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Entry point for the matching engine server. Wires configuration, logging,
// the engine, the event fanout and the HTTP transport together, then serves
// until shutdown.
//--------------------------------------------------------------------------------------------------

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::{Level, info};

use matchbook::{Api, BusForwarder, Config, EventBus, EventDispatcher, EventLogger, MatchingEngine};

/// Matching engine API server.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Address to bind, overriding the environment configuration.
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let args = Args::parse();
    let config = Config::from_env();
    let addr = args.bind.unwrap_or(config.bind_addr);

    info!("starting matching engine server");

    let engine = Arc::new(MatchingEngine::new());
    for symbol in &config.symbols {
        engine.ensure_symbol(symbol);
        info!(symbol = %symbol, "symbol listed");
    }

    // Engine events flow through the broadcast bus to async consumers.
    let bus = EventBus::new(config.event_capacity);
    let forwarder = BusForwarder::new(bus.clone());
    engine.register_trade_sink(forwarder.clone());
    engine.register_bbo_sink(forwarder);

    let dispatcher = EventDispatcher::new(bus.clone());
    dispatcher.register_handler(Arc::new(EventLogger)).await;
    let _dispatch_task = dispatcher.start().await;

    let api = Api::new(addr, engine, config.depth_limit);
    api.serve().await?;

    Ok(())
}
