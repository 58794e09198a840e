use crate::client::{GenerationClient, ServiceInfo};
use crate::request::{Attachment, GenerationForm, GenerationRequest};
use crate::result::GenerationResult;
use crate::{ClientConfig, Error, Result};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use tokio::sync::oneshot;

enum Command {
    Submit(GenerationRequest, oneshot::Sender<GenerationResult>),
    Download(String, String, PathBuf, oneshot::Sender<Result<PathBuf>>),
    UploadBackground(Attachment, oneshot::Sender<Result<String>>),
    ListBackgrounds(oneshot::Sender<Result<Vec<String>>>),
    Health(oneshot::Sender<Result<ServiceInfo>>),
    Close(oneshot::Sender<()>),
}

/// An async-friendly client backed by a dedicated worker thread.
///
/// The worker owns the blocking [`GenerationClient`] and runs commands one at
/// a time, so async callers never block an executor thread on network I/O.
#[derive(Clone)]
pub struct AsyncClient {
    cmd_tx: Sender<Command>,
}

impl AsyncClient {
    /// Spawn the worker thread and build the HTTP client on it.
    pub async fn new(config: Option<ClientConfig>) -> Result<Self> {
        let config = config.unwrap_or_default();

        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx) = oneshot::channel::<Result<()>>();

        thread::spawn(move || {
            // The blocking reqwest client must live outside the async runtime
            let client = match GenerationClient::new(config) {
                Ok(c) => c,
                Err(err) => {
                    let _ = init_tx.send(Err(err));
                    return;
                }
            };
            let _ = init_tx.send(Ok(()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Submit(request, resp) => {
                        let _ = resp.send(client.submit_request(&request));
                    }
                    Command::Download(url, name, dest, resp) => {
                        let _ = resp.send(client.trigger_download(&url, &name, dest));
                    }
                    Command::UploadBackground(file, resp) => {
                        let _ = resp.send(client.upload_background(file));
                    }
                    Command::ListBackgrounds(resp) => {
                        let _ = resp.send(client.list_backgrounds());
                    }
                    Command::Health(resp) => {
                        let _ = resp.send(client.health());
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(());
                        break;
                    }
                }
            }
        });

        init_rx
            .await
            .map_err(|e| Error::TransportError(format!("Worker init canceled: {}", e)))??;

        Ok(Self { cmd_tx })
    }

    /// Build and submit `form`. Validation happens on the caller's side, so
    /// invalid input never reaches the worker.
    pub async fn submit<F: GenerationForm + ?Sized>(&self, form: &F) -> GenerationResult {
        let endpoint = form.endpoint();
        match form.build_request() {
            Ok(request) => self.submit_request(request).await,
            Err(err) => GenerationResult::from_error(&err, endpoint.fallback_message()),
        }
    }

    pub async fn submit_request(&self, request: GenerationRequest) -> GenerationResult {
        if let Err(err) = request.validate() {
            return GenerationResult::from_error(&err, request.endpoint().fallback_message());
        }
        let fallback = request.endpoint().fallback_message();
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Submit(request, tx));
        match rx.await {
            Ok(result) => result,
            Err(e) => GenerationResult::from_error(
                &Error::TransportError(format!("Submit canceled: {}", e)),
                fallback,
            ),
        }
    }

    pub async fn trigger_download(
        &self,
        artifact_url: &str,
        suggested_file_name: &str,
        dest_dir: impl Into<PathBuf>,
    ) -> Result<PathBuf> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Download(
            artifact_url.to_string(),
            suggested_file_name.to_string(),
            dest_dir.into(),
            tx,
        ));
        rx.await
            .map_err(|e| Error::TransportError(format!("Download canceled: {}", e)))?
    }

    pub async fn upload_background(&self, file: Attachment) -> Result<String> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::UploadBackground(file, tx));
        rx.await
            .map_err(|e| Error::TransportError(format!("Upload canceled: {}", e)))?
    }

    pub async fn list_backgrounds(&self) -> Result<Vec<String>> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::ListBackgrounds(tx));
        rx.await
            .map_err(|e| Error::TransportError(format!("ListBackgrounds canceled: {}", e)))?
    }

    pub async fn health(&self) -> Result<ServiceInfo> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Health(tx));
        rx.await
            .map_err(|e| Error::TransportError(format!("Health canceled: {}", e)))?
    }

    /// Stop the worker thread. Other clones become unusable.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Close(tx));
        rx.await
            .map_err(|e| Error::TransportError(format!("Close canceled: {}", e)))
    }
}

/// Single result slot with an explicit in-flight guard.
///
/// At most one submission per session is outstanding; a second `submit`
/// while the first is pending returns [`Error::Busy`] without touching the
/// slot.
#[derive(Clone)]
pub struct AsyncSession {
    client: AsyncClient,
    in_flight: Arc<AtomicBool>,
    result: Arc<Mutex<GenerationResult>>,
}

struct InFlightGuard {
    in_flight: Arc<AtomicBool>,
    result: Arc<Mutex<GenerationResult>>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        // Abandoned submissions must not leave the slot stuck in flight
        let mut slot = self.result.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_in_flight() {
            *slot = GenerationResult::Idle;
        }
        drop(slot);
        self.in_flight.store(false, Ordering::Release);
    }
}

impl AsyncSession {
    pub fn new(client: AsyncClient) -> Self {
        Self {
            client,
            in_flight: Arc::new(AtomicBool::new(false)),
            result: Arc::new(Mutex::new(GenerationResult::Idle)),
        }
    }

    fn slot(&self) -> MutexGuard<'_, GenerationResult> {
        self.result.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current result
    pub fn result(&self) -> GenerationResult {
        self.slot().clone()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn submit<F: GenerationForm + ?Sized>(&self, form: &F) -> Result<GenerationResult> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::Busy);
        }
        let _guard = InFlightGuard {
            in_flight: self.in_flight.clone(),
            result: self.result.clone(),
        };

        *self.slot() = GenerationResult::InFlight;
        let result = self.client.submit(form).await;
        *self.slot() = result.clone();
        Ok(result)
    }

    /// Save the current artifact; `file_name` is usually the endpoint's default.
    pub async fn download(&self, file_name: &str, dest_dir: impl Into<PathBuf>) -> Result<PathBuf> {
        let url = self
            .result()
            .artifact_url()
            .map(str::to_string)
            .ok_or_else(|| Error::ValidationError("No generated image to download".to_string()))?;
        self.client.trigger_download(&url, file_name, dest_dir).await
    }
}
