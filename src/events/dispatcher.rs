//--------------------------------------------------------------------------------------------------
// STRUCTS
//--------------------------------------------------------------------------------------------------
// | Name            | Description                                    | Key Methods              |
// |-----------------|------------------------------------------------|--------------------------|
// | EventDispatcher | Routes bus events to registered handlers       | register_handler, start  |
//--------------------------------------------------------------------------------------------------

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};

use super::bus::EventBus;
use super::handlers::EventHandler;

/// Dispatches bus events to registered handlers, each on its own task so a
/// slow handler cannot hold up the others.
pub struct EventDispatcher {
    bus: EventBus,
    handlers: Arc<RwLock<HashMap<&'static str, Vec<Arc<dyn EventHandler>>>>>,
}

impl EventDispatcher {
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            handlers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registers a handler for every event kind it declares.
    pub async fn register_handler(&self, handler: Arc<dyn EventHandler>) {
        let mut handlers = self.handlers.write().await;
        for kind in handler.event_kinds() {
            handlers
                .entry(kind)
                .or_insert_with(Vec::new)
                .push(Arc::clone(&handler));
        }
        debug!(kinds = ?handler.event_kinds(), "registered event handler");
    }

    /// Consumes the bus until it closes. Lagged receivers skip the dropped
    /// events and keep going.
    pub async fn start(self) -> tokio::task::JoinHandle<()> {
        let handlers = Arc::clone(&self.handlers);
        let mut receiver = self.bus.subscribe();

        tokio::spawn(async move {
            info!("event dispatcher started");

            loop {
                match receiver.recv().await {
                    Ok(event) => {
                        let handlers_lock = handlers.read().await;
                        if let Some(matched) = handlers_lock.get(event.kind()) {
                            for handler in matched {
                                let handler = Arc::clone(handler);
                                let event = event.clone();
                                tokio::spawn(async move {
                                    if let Err(e) = handler.handle_event(event).await {
                                        error!("handler failed to process event: {}", e);
                                    }
                                });
                            }
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("event dispatcher lagged, {} events dropped", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            info!("event dispatcher stopped");
        })
    }
}
