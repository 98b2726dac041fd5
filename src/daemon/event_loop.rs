//! Single-consumer event loop driving the timer engine.
//!
//! Every mutation of the timer state goes through this loop: ticks, IPC
//! requests and tray clicks are all [`EngineCommand`]s on one channel, so
//! they are applied one at a time in arrival order.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::menubar::MenuAction;
use crate::types::{IpcRequest, IpcResponse};

use super::ipc::RequestHandler;
use super::ticker::TickSource;

/// Commands consumed by the event loop.
#[derive(Debug)]
pub enum EngineCommand {
    /// One second elapsed on the tick source of `generation`
    Tick {
        /// Generation of the schedule that produced the tick
        generation: u64,
    },
    /// A request from an IPC client
    Request {
        /// The decoded request
        request: IpcRequest,
        /// Where to send the response
        reply: oneshot::Sender<IpcResponse>,
    },
    /// A click in the tray menu
    Menu(MenuAction),
    /// Shut down (signal or lost tray)
    Shutdown,
}

/// Runs until the engine quits or every sender is dropped.
///
/// Returns the handler so callers can inspect the final state.
pub async fn run_event_loop<T: TickSource>(
    mut handler: RequestHandler<T>,
    mut rx: mpsc::UnboundedReceiver<EngineCommand>,
) -> RequestHandler<T> {
    info!("event loop started");

    while let Some(command) = rx.recv().await {
        dispatch(&mut handler, command);
        if handler.engine().is_quitting() {
            break;
        }
    }

    info!("event loop stopped");
    handler
}

/// Applies one command to the handler.
pub fn dispatch<T: TickSource>(handler: &mut RequestHandler<T>, command: EngineCommand) {
    match command {
        EngineCommand::Tick { generation } => {
            let engine = handler.engine_mut();
            // a tick queued before its source was cancelled must not count
            if engine.ticker().is_scheduled() && generation == engine.tick_generation() {
                engine.tick();
            } else {
                debug!(generation, current = engine.tick_generation(), "dropping stale tick");
            }
        }
        EngineCommand::Request { request, reply } => {
            let response = handler.handle(request);
            if reply.send(response).is_err() {
                debug!("client went away before the response was ready");
            }
        }
        EngineCommand::Menu(action) => handler.handle_menu(action),
        EngineCommand::Shutdown => handler.engine_mut().quit(),
    }
}

// ============================================================================
// Tests
// ============================================================================
