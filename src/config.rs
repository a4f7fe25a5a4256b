use dotenv::dotenv;
use std::env;
use std::net::SocketAddr;

const BIND_ADDR: &str = "BIND_ADDR";
const SYMBOLS: &str = "SYMBOLS";
const DEPTH_LIMIT: &str = "DEPTH_LIMIT";
const EVENT_CAPACITY: &str = "EVENT_CAPACITY";

/// Process configuration, loaded from the environment (a `.env` file is
/// honored when present). Every variable has a default so the server starts
/// with no configuration at all.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Symbols whose books are created at startup. Further symbols are
    /// created lazily on first submission.
    pub symbols: Vec<String>,
    /// Depth level cap for snapshot requests that do not specify one.
    pub depth_limit: usize,
    /// Capacity of the market event broadcast channel.
    pub event_capacity: usize,
}

impl Config {
    pub fn from_env() -> Config {
        dotenv().ok();

        let bind_addr = env::var(BIND_ADDR)
            .unwrap_or_else(|_| "127.0.0.1:3001".to_string())
            .parse()
            .expect("failed to parse BIND_ADDR");
        let symbols = env::var(SYMBOLS)
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        let depth_limit = env::var(DEPTH_LIMIT)
            .map(|raw| raw.parse().expect("failed to parse DEPTH_LIMIT"))
            .unwrap_or(10);
        let event_capacity = env::var(EVENT_CAPACITY)
            .map(|raw| raw.parse().expect("failed to parse EVENT_CAPACITY"))
            .unwrap_or(1024);

        Config {
            bind_addr,
            symbols,
            depth_limit,
            event_capacity,
        }
    }
}
