use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use medmax_core::{ApiRequest, ApiResult, ReplyTo, RequestError};
use medmax_logging::{medmax_debug, medmax_warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::client::{ApiClient, ReqwestApiClient};
use crate::settings::ClientSettings;

/// A finished request, ready to be fed back to the router.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub reply: ReplyTo,
    pub request: ApiRequest,
    pub result: ApiResult,
}

#[derive(Debug, Error)]
pub enum StartError {
    #[error("client setup failed: {0}")]
    Client(#[from] RequestError),
    #[error("could not start the async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

enum ClientCommand {
    Send { request: ApiRequest, reply: ReplyTo },
    SetSession(Option<String>),
}

/// Owns the worker thread that runs requests on a tokio runtime.
///
/// Requests are independent: completions arrive in the order they finish.
pub struct ApiHandle {
    cmd_tx: Option<mpsc::Sender<ClientCommand>>,
    completion_rx: mpsc::Receiver<Completion>,
    cancel: CancellationToken,
    worker: Option<JoinHandle<()>>,
}

impl ApiHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, StartError> {
        let client = ReqwestApiClient::new(settings)?;
        Self::with_client(Arc::new(client))
    }

    pub fn with_client(client: Arc<dyn ApiClient>) -> Result<Self, StartError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (completion_tx, completion_rx) = mpsc::channel();
        let cancel = CancellationToken::new();
        let worker_cancel = cancel.clone();

        let worker = thread::spawn(move || {
            let mut session: Option<String> = None;
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    ClientCommand::SetSession(token) => session = token,
                    ClientCommand::Send { request, reply } => {
                        let client = client.clone();
                        let session = session.clone();
                        let completion_tx = completion_tx.clone();
                        let cancel = worker_cancel.clone();
                        runtime.spawn(async move {
                            let label = request.label();
                            let sent = client.send(&request, session.as_deref());
                            let Some(result) = cancel.run_until_cancelled(sent).await else {
                                medmax_debug!("{label} cancelled at shutdown");
                                return;
                            };
                            if let Err(err) = &result {
                                medmax_debug!("{label} failed: {err}");
                            }
                            let _ = completion_tx.send(Completion {
                                reply,
                                request,
                                result,
                            });
                        });
                    }
                }
            }
            runtime.shutdown_timeout(Duration::from_secs(1));
        });

        Ok(Self {
            cmd_tx: Some(cmd_tx),
            completion_rx,
            cancel,
            worker: Some(worker),
        })
    }

    pub fn submit(&self, request: ApiRequest, reply: ReplyTo) {
        self.send_command(ClientCommand::Send { request, reply });
    }

    /// Token attached as the session cookie to every request submitted after this call.
    pub fn set_session_token(&self, token: Option<String>) {
        self.send_command(ClientCommand::SetSession(token));
    }

    pub fn try_recv(&self) -> Option<Completion> {
        self.completion_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<Completion> {
        self.completion_rx.recv_timeout(timeout).ok()
    }

    fn send_command(&self, command: ClientCommand) {
        let delivered = self
            .cmd_tx
            .as_ref()
            .is_some_and(|tx| tx.send(command).is_ok());
        if !delivered {
            medmax_warn!("api worker is gone; command dropped");
        }
    }
}

impl Drop for ApiHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.cmd_tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
