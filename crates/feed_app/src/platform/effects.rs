use feed_core::{Effect, Msg};
use feed_engine::{EngineConfig, EngineError, EngineEvent, EngineHandle};
use feed_logging::{feed_info, feed_warn};

/// Executes core effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Ok(Self {
            engine: EngineHandle::new(config)?,
        })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchPage { epoch, key } => self.engine.fetch(epoch, key),
                Effect::Debounce { generation, text } => self.engine.debounce(generation, text),
                Effect::CancelDebounce => self.engine.cancel_debounce(),
            }
        }
    }

    pub fn check_health(&self) {
        self.engine.check_health();
    }

    /// Drains everything the engine reported since the last call.
    pub fn drain_messages(&self) -> Vec<Msg> {
        let mut inbox = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            if let Some(msg) = map_event(event) {
                inbox.push(msg);
            }
        }
        inbox
    }

    pub fn shutdown(&mut self) {
        self.engine.shutdown();
    }
}

// Page failures are not logged here: only the core knows whether they are stale.
fn map_event(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::PageFetched { epoch, result } => Some(Msg::PageLoaded {
            epoch,
            result: result.map_err(|err| err.to_string()),
        }),
        EngineEvent::SearchSettled { generation, text } => {
            Some(Msg::SearchSettled { generation, text })
        }
        EngineEvent::Health(Ok(())) => {
            feed_info!("API health probe ok");
            None
        }
        EngineEvent::Health(Err(err)) => {
            feed_warn!("API health probe failed: {} ({})", err, err.message);
            None
        }
    }
}
