//! IPC server for the tray timer daemon.
//!
//! This module provides Unix Domain Socket IPC functionality:
//! - Server that listens on a Unix socket
//! - Per-connection tasks that forward requests to the event loop
//! - Request handling against the timer engine and config store
//!
//! One connection carries one JSON request and one JSON response.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

use crate::config::{ConfigStore, SettingsForm};
use crate::menubar::MenuAction;
use crate::types::{Activity, IpcRequest, IpcResponse, ResponseData, SettingsParams};

use super::event_loop::EngineCommand;
use super::ticker::TickSource;
use super::timer::TimerEngine;

// ============================================================================
// Constants
// ============================================================================

/// Environment variable overriding the socket path
pub const SOCKET_ENV: &str = "POMOTRAY_SOCKET";

/// Socket path relative to the runtime (or data) directory
const SOCKET_FILE: &str = "pomotray/pomotray.sock";

/// Maximum request size in bytes (4KB)
const MAX_REQUEST_SIZE: usize = 4096;

/// Read timeout in seconds
const READ_TIMEOUT_SECS: u64 = 5;

/// Returns the socket path shared by the daemon and the CLI.
///
/// `$POMOTRAY_SOCKET` wins; otherwise the user's runtime directory, then the
/// data directory, then the temp directory.
pub fn default_socket_path() -> PathBuf {
    if let Some(path) = std::env::var_os(SOCKET_ENV) {
        return PathBuf::from(path);
    }
    dirs::runtime_dir()
        .or_else(dirs::data_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join(SOCKET_FILE)
}

// ============================================================================
// IpcError
// ============================================================================

/// IPC-specific error types.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    /// Another daemon owns the socket
    #[error("A daemon is already listening on {0}")]
    AlreadyRunning(String),

    /// Read error
    #[error("Failed to read request: {0}")]
    ReadError(String),

    /// Timeout error
    #[error("Operation timed out")]
    Timeout,

    /// Request too large
    #[error("Request too large (max {MAX_REQUEST_SIZE} bytes)")]
    RequestTooLarge,

    /// The event loop is gone
    #[error("Daemon is shutting down")]
    EngineGone,
}

// ============================================================================
// IpcServer
// ============================================================================

/// Unix Domain Socket IPC server.
pub struct IpcServer {
    /// Unix socket listener
    listener: UnixListener,
    /// Socket path (for cleanup)
    socket_path: PathBuf,
}

impl IpcServer {
    /// Creates a new IPC server bound to the specified socket path.
    ///
    /// A stale socket file is removed before binding. A socket that still
    /// accepts connections belongs to a running daemon and is left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if a daemon is already running or the socket cannot
    /// be bound.
    pub fn new(socket_path: &Path) -> Result<Self> {
        if socket_path.exists() {
            if std::os::unix::net::UnixStream::connect(socket_path).is_ok() {
                return Err(IpcError::AlreadyRunning(socket_path.display().to_string()).into());
            }
            std::fs::remove_file(socket_path)
                .with_context(|| format!("Failed to remove stale socket: {:?}", socket_path))?;
        }

        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create socket directory: {:?}", parent))?;
        }

        let listener = UnixListener::bind(socket_path)
            .with_context(|| format!("Failed to bind Unix socket: {:?}", socket_path))?;

        info!(path = %socket_path.display(), "IPC server listening");
        Ok(Self {
            listener,
            socket_path: socket_path.to_path_buf(),
        })
    }

    /// Accepts an incoming client connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be accepted.
    pub async fn accept(&self) -> Result<UnixStream> {
        let (stream, _addr) = self
            .listener
            .accept()
            .await
            .context("Failed to accept connection")?;
        Ok(stream)
    }

    /// Receives and deserializes an IPC request from the stream.
    ///
    /// Applies a read timeout to prevent blocking indefinitely.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or deserialization fails.
    pub async fn receive_request(stream: &mut UnixStream) -> Result<IpcRequest> {
        let mut buffer = vec![0u8; MAX_REQUEST_SIZE + 1];

        let read_result = timeout(
            Duration::from_secs(READ_TIMEOUT_SECS),
            stream.read(&mut buffer),
        )
        .await;

        let n = match read_result {
            Ok(Ok(n)) => n,
            Ok(Err(e)) => return Err(IpcError::ReadError(e.to_string()).into()),
            Err(_) => return Err(IpcError::Timeout.into()),
        };

        if n == 0 {
            anyhow::bail!("Connection closed by client");
        }
        if n > MAX_REQUEST_SIZE {
            return Err(IpcError::RequestTooLarge.into());
        }

        let request: IpcRequest = serde_json::from_slice(&buffer[..n])
            .with_context(|| "Failed to deserialize IPC request")?;

        Ok(request)
    }

    /// Serializes and sends an IPC response to the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub async fn send_response(stream: &mut UnixStream, response: &IpcResponse) -> Result<()> {
        let json = serde_json::to_vec(response).context("Failed to serialize IPC response")?;

        stream
            .write_all(&json)
            .await
            .context("Failed to write response")?;
        stream.flush().await.context("Failed to flush response")?;

        Ok(())
    }

    /// Returns the socket path.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Accepts connections forever, one task per connection.
    pub async fn serve(self, command_tx: mpsc::UnboundedSender<EngineCommand>) {
        loop {
            match self.accept().await {
                Ok(stream) => {
                    let tx = command_tx.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, tx).await {
                            debug!(error = %e, "IPC connection failed");
                        }
                    });
                }
                Err(e) => warn!(error = %e, "accept failed"),
            }
        }
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

/// Reads one request, forwards it to the event loop and writes the reply.
///
/// # Errors
///
/// Returns an error if the response cannot be written.
pub async fn handle_connection(
    mut stream: UnixStream,
    command_tx: mpsc::UnboundedSender<EngineCommand>,
) -> Result<()> {
    let response = match IpcServer::receive_request(&mut stream).await {
        Ok(request) => {
            debug!(?request, "IPC request");
            forward(request, &command_tx).await
        }
        Err(e) => IpcResponse::error(e.to_string()),
    };
    IpcServer::send_response(&mut stream, &response).await
}

async fn forward(
    request: IpcRequest,
    command_tx: &mpsc::UnboundedSender<EngineCommand>,
) -> IpcResponse {
    let (reply, rx) = oneshot::channel();
    if command_tx
        .send(EngineCommand::Request { request, reply })
        .is_err()
    {
        return IpcResponse::error(IpcError::EngineGone.to_string());
    }
    rx.await
        .unwrap_or_else(|_| IpcResponse::error(IpcError::EngineGone.to_string()))
}

// ============================================================================
// RequestHandler
// ============================================================================

/// Applies IPC requests and menu actions to the engine.
pub struct RequestHandler<T: TickSource> {
    /// The timer engine
    engine: TimerEngine<T>,
    /// Where configure requests persist settings
    store: ConfigStore,
}

impl<T: TickSource> RequestHandler<T> {
    /// Creates a new request handler.
    pub fn new(engine: TimerEngine<T>, store: ConfigStore) -> Self {
        Self { engine, store }
    }

    pub fn engine(&self) -> &TimerEngine<T> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut TimerEngine<T> {
        &mut self.engine
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Handles an IPC request and returns the appropriate response.
    pub fn handle(&mut self, request: IpcRequest) -> IpcResponse {
        match request {
            IpcRequest::Start => match self.engine.start() {
                Ok(()) => self.success("Timer started"),
                Err(e) => IpcResponse::error(e.to_string()),
            },
            IpcRequest::Toggle => {
                let before = self.engine.state().activity;
                let message = match (before, self.engine.toggle_play_pause()) {
                    (Activity::Idle, _) => "Timer started",
                    (_, Activity::Paused) => "Timer paused",
                    _ => "Timer resumed",
                };
                self.success(message)
            }
            IpcRequest::Pause => {
                if self.engine.pause() {
                    self.success("Timer paused")
                } else {
                    IpcResponse::error("timer is not running")
                }
            }
            IpcRequest::Resume => {
                if self.engine.resume() {
                    self.success("Timer resumed")
                } else {
                    IpcResponse::error("timer is not paused")
                }
            }
            IpcRequest::Stop => match self.engine.stop() {
                Ok(()) => self.success("Timer stopped"),
                Err(e) => IpcResponse::error(e.to_string()),
            },
            IpcRequest::Status => self.success(""),
            IpcRequest::ToggleFloating => {
                if self.engine.toggle_floating() {
                    self.success("Chronometer shown")
                } else {
                    self.success("Chronometer hidden")
                }
            }
            IpcRequest::Configure { settings } => self.handle_configure(&settings),
            IpcRequest::Quit => {
                self.engine.quit();
                IpcResponse::success("Daemon shutting down", None)
            }
        }
    }

    /// Validates, applies and saves new settings.
    ///
    /// Invalid input changes nothing. A failed save keeps the new settings
    /// in memory and reports the failure.
    fn handle_configure(&mut self, params: &SettingsParams) -> IpcResponse {
        if params.is_empty() {
            return self.settings_response("Current settings");
        }

        let mut form = SettingsForm::from(&self.engine.state().settings);
        form.apply(params);
        let settings = match form.validate() {
            Ok(settings) => settings,
            Err(e) => return IpcResponse::error(e.to_string()),
        };

        self.engine.apply_settings(settings.clone());
        match self.store.save(&settings) {
            Ok(()) => self.settings_response("Settings saved"),
            Err(e) => {
                warn!(error = %e, "settings applied but not saved");
                IpcResponse::error(format!("Settings applied but not saved: {e}"))
            }
        }
    }

    /// Handles a click in the tray menu.
    pub fn handle_menu(&mut self, action: MenuAction) {
        match action {
            MenuAction::Toggle => {
                self.engine.toggle_play_pause();
            }
            MenuAction::Stop => {
                if let Err(e) = self.engine.stop() {
                    debug!(error = %e, "stop ignored");
                }
            }
            MenuAction::ToggleFloating => {
                self.engine.toggle_floating();
            }
            MenuAction::Configure => {
                let message = format!(
                    "Run `pomotray configure` to change settings ({})",
                    self.store.path().display()
                );
                self.engine.notify(&message);
            }
            MenuAction::Quit => self.engine.quit(),
        }
    }

    fn success(&self, message: &str) -> IpcResponse {
        let data = ResponseData::from_timer_state(self.engine.state())
            .with_floating(self.engine.floating_visible());
        IpcResponse::success(message, Some(data))
    }

    /// A success response that also names the daemon's config file.
    fn settings_response(&self, message: &str) -> IpcResponse {
        let data = ResponseData::from_timer_state(self.engine.state())
            .with_floating(self.engine.floating_visible())
            .with_config_path(self.store.path());
        IpcResponse::success(message, Some(data))
    }
}

// ============================================================================
// Tests
// ============================================================================
