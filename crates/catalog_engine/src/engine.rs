use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use catalog_logging::{catalog_debug, catalog_error, catalog_info};

use crate::fetch::{CatalogClient, ClientSettings, ReqwestCatalogClient};
use crate::registry::{Admission, RequestRegistry};
use crate::{CachePolicy, EngineEvent, FailureKind, FetchError, PageRequest};

enum EngineCommand {
    Fetch {
        request: PageRequest,
        policy: CachePolicy,
    },
    Shutdown,
}

/// Runs catalog requests on a background tokio runtime and reports their
/// outcome as [`EngineEvent`]s. Superseded requests report nothing.
///
/// The engine thread stops once [`EngineHandle::shutdown`] is called or the
/// last handle is dropped; its event channel disconnects after that.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    events: EngineEvents,
}

/// Receiving side of an engine. Holding it does not keep the engine running.
#[derive(Clone)]
pub struct EngineEvents {
    rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineEvents {
    /// `Err(Disconnected)` means the engine has stopped and no event will follow.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, RecvTimeoutError> {
        self.rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .recv_timeout(timeout)
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .try_recv()
            .ok()
    }
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, FetchError> {
        let client = ReqwestCatalogClient::new(settings)?;
        Ok(Self::with_client(Arc::new(client)))
    }

    pub fn with_client(client: Arc<dyn CatalogClient>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let registry = Arc::new(Mutex::new(RequestRegistry::new()));

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    catalog_error!("failed to start engine runtime: {}", err);
                    drop(cmd_rx);
                    return;
                }
            };
            catalog_info!("catalog engine started");
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Fetch { request, policy } => {
                        handle_fetch(&runtime, &client, &registry, request, policy, &event_tx);
                    }
                    EngineCommand::Shutdown => break,
                }
            }
            // Commands must fail before the event channel reports the stop.
            drop(cmd_rx);
            // Pending requests hold event senders until the runtime is gone.
            drop(runtime);
            catalog_info!("catalog engine stopped");
        });

        Self {
            cmd_tx,
            events: EngineEvents {
                rx: Arc::new(Mutex::new(event_rx)),
            },
        }
    }

    /// Stops the engine for every clone of this handle. In-flight requests
    /// are dropped without reporting.
    pub fn shutdown(&self) {
        if self.cmd_tx.send(EngineCommand::Shutdown).is_err() {
            catalog_debug!("catalog engine already stopped");
        }
    }

    pub fn events(&self) -> EngineEvents {
        self.events.clone()
    }

    /// Requests a page. Fails only when the engine thread is gone.
    pub fn fetch(&self, request: PageRequest, policy: CachePolicy) -> Result<(), FetchError> {
        self.cmd_tx
            .send(EngineCommand::Fetch { request, policy })
            .map_err(|_| {
                FetchError::new(
                    FailureKind::EngineUnavailable,
                    "catalog engine is not running",
                )
            })
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.events.try_recv()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.events.recv_timeout(timeout).ok()
    }
}

fn handle_fetch(
    runtime: &tokio::runtime::Runtime,
    client: &Arc<dyn CatalogClient>,
    registry: &Arc<Mutex<RequestRegistry>>,
    request: PageRequest,
    policy: CachePolicy,
    event_tx: &mpsc::Sender<EngineEvent>,
) {
    let admission = registry
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .admit(&request, policy);

    match admission {
        Admission::Cached(page) => {
            catalog_debug!("{} served from memory", request);
            let _ = event_tx.send(EngineEvent::PageFetched {
                request,
                page,
                from_cache: true,
            });
        }
        Admission::Joined => {
            catalog_debug!("{} already in flight", request);
        }
        Admission::Issue { generation, token } => {
            let client = client.clone();
            let registry = registry.clone();
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                let result = tokio::select! {
                    _ = token.cancelled() => {
                        catalog_debug!("{} superseded", request);
                        return;
                    }
                    result = client.fetch_page(&request) => result,
                };

                let current = registry
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .complete(&request, generation, &result);
                if !current {
                    catalog_debug!("{} finished after being superseded", request);
                    return;
                }

                let event = match result {
                    Ok(page) => EngineEvent::PageFetched {
                        request,
                        page,
                        from_cache: false,
                    },
                    Err(error) => EngineEvent::PageFailed { request, error },
                };
                let _ = event_tx.send(event);
            });
        }
    }
}
