use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use feed_core::QueryKey;
use feed_logging::{feed_debug, feed_info};
use thiserror::Error;
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::api::{FetchSettings, ItemsApi, ReqwestItemsApi};
use crate::debounce::Debouncer;
use crate::{EngineEvent, FetchError};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub fetch: FetchSettings,
    pub debounce_window: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fetch: FetchSettings::default(),
            debounce_window: Duration::from_millis(350),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] io::Error),
    #[error("failed to build http client: {0}")]
    Client(#[from] FetchError),
}

enum EngineCommand {
    Fetch { epoch: u64, key: QueryKey },
    Debounce { generation: u64, text: String },
    CancelDebounce,
    CheckHealth,
}

/// Runs requests and debounce timers on a background tokio runtime.
///
/// Commands are fire-and-forget; outcomes come back as [`EngineEvent`]s via
/// [`EngineHandle::try_recv`].
pub struct EngineHandle {
    cmd_tx: Option<mpsc::Sender<EngineCommand>>,
    event_rx: mpsc::Receiver<EngineEvent>,
    shutdown: CancellationToken,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let api = Arc::new(ReqwestItemsApi::new(config.fetch)?);
        Self::with_api(api, config.debounce_window)
    }

    pub fn with_api(
        api: Arc<dyn ItemsApi>,
        debounce_window: Duration,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let shutdown = CancellationToken::new();

        let worker_shutdown = shutdown.clone();
        let worker = thread::spawn(move || {
            run_worker(runtime, api, debounce_window, cmd_rx, event_tx, worker_shutdown);
        });

        Ok(Self {
            cmd_tx: Some(cmd_tx),
            event_rx,
            shutdown,
            worker: Some(worker),
        })
    }

    pub fn fetch(&self, epoch: u64, key: QueryKey) {
        self.send(EngineCommand::Fetch { epoch, key });
    }

    pub fn debounce(&self, generation: u64, text: impl Into<String>) {
        self.send(EngineCommand::Debounce {
            generation,
            text: text.into(),
        });
    }

    pub fn cancel_debounce(&self) {
        self.send(EngineCommand::CancelDebounce);
    }

    pub fn check_health(&self) {
        self.send(EngineCommand::CheckHealth);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Stops the worker: pending timers and in-flight requests are dropped
    /// without reporting.
    pub fn shutdown(&mut self) {
        self.shutdown.cancel();
        // Closing the command channel wakes the worker out of `recv`.
        self.cmd_tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }

    fn send(&self, command: EngineCommand) {
        if let Some(tx) = &self.cmd_tx {
            let _ = tx.send(command);
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker(
    runtime: Runtime,
    api: Arc<dyn ItemsApi>,
    debounce_window: Duration,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
    shutdown: CancellationToken,
) {
    let (mut debouncer, mut settled) =
        Debouncer::<(u64, String)>::new(debounce_window, runtime.handle().clone());

    let settled_tx = event_tx.clone();
    let settled_shutdown = shutdown.clone();
    runtime.spawn(async move {
        loop {
            let next = tokio::select! {
                _ = settled_shutdown.cancelled() => break,
                next = settled.recv() => next,
            };
            let Some((generation, text)) = next else { break };
            if settled_tx
                .send(EngineEvent::SearchSettled { generation, text })
                .is_err()
            {
                break;
            }
        }
    });

    let mut in_flight: Option<JoinHandle<()>> = None;
    while let Ok(command) = cmd_rx.recv() {
        if shutdown.is_cancelled() {
            break;
        }
        match command {
            EngineCommand::Fetch { epoch, key } => {
                // Only the latest epoch matters; stop paying for the previous one.
                if let Some(previous) = in_flight.take() {
                    previous.abort();
                }
                feed_debug!("Fetching epoch={} {:?}", epoch, key);
                let api = api.clone();
                let event_tx = event_tx.clone();
                in_flight = Some(runtime.spawn(async move {
                    let result = api.fetch_page(&key).await;
                    let _ = event_tx.send(EngineEvent::PageFetched { epoch, result });
                }));
            }
            EngineCommand::Debounce { generation, text } => {
                debouncer.observe((generation, text));
            }
            EngineCommand::CancelDebounce => debouncer.cancel(),
            EngineCommand::CheckHealth => {
                let api = api.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let result = api.health().await;
                    let _ = event_tx.send(EngineEvent::Health(result));
                });
            }
        }
    }

    debouncer.cancel();
    if let Some(handle) = in_flight.take() {
        handle.abort();
    }
    runtime.shutdown_background();
    feed_info!("Engine worker stopped");
}
