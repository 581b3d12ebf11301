//! Terminal event loop.
//!
//! The [`TerminalLoop`] drives the UI half of the client, coordinating
//! between:
//! - [`App`]: input buffer and scrollback
//! - [`Driver`]: key polling and rendering
//! - the hand-off queues to and from the network loop
//!
//! Each tick polls one key with a bounded wait, then drains whatever the
//! network loop has queued without blocking. The key wait is the only
//! suspension point, so typing and incoming lines interleave without either
//! side starving the other.

use std::time::Duration;

use linewire_client::{
    HandoffReceiver, HandoffSender, InboundMessage, OutboundMessage, PopError,
};

use crate::{App, AppAction, AppEvent, ConnectionState, Driver, Pane};

/// Default bound on the per-tick key wait.
pub const DEFAULT_TICK: Duration = Duration::from_millis(25);

/// Inbound messages handled per tick before keys get another turn.
const MAX_INBOUND_PER_TICK: usize = 256;

/// Why the terminal loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The user pressed a kill key or quit without a live connection.
    UserQuit,
    /// The network loop ended the session.
    ConnectionClosed,
}

/// Panes waiting to be redrawn after a batch of actions.
#[derive(Debug, Default)]
struct Dirty {
    input: bool,
    output: bool,
    all: bool,
}

/// UI half of the client.
pub struct TerminalLoop<D: Driver> {
    driver: D,
    app: App,
    outbound: HandoffSender<OutboundMessage>,
    inbound: HandoffReceiver<InboundMessage>,
    tick: Duration,
    quit_sent: bool,
}

impl<D: Driver> TerminalLoop<D> {
    /// Create a loop that feeds `outbound` and drains `inbound`.
    pub fn new(
        driver: D,
        app: App,
        outbound: HandoffSender<OutboundMessage>,
        inbound: HandoffReceiver<InboundMessage>,
    ) -> Self {
        Self { driver, app, outbound, inbound, tick: DEFAULT_TICK, quit_sent: false }
    }

    /// Change the per-tick key wait.
    #[must_use]
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Run until the user quits or the connection ends.
    ///
    /// Whatever the outcome, exactly one [`OutboundMessage::Quit`] has been
    /// pushed when this returns, so the network loop can unwind.
    ///
    /// # Errors
    ///
    /// Returns the driver's error if rendering or key polling fails.
    pub async fn run(&mut self) -> Result<ExitReason, D::Error> {
        let result = self.run_until_exit().await;

        match &result {
            Ok(reason) => tracing::info!("Terminal loop exited: {:?}", reason),
            Err(e) => tracing::error!("Terminal loop failed: {}", e),
        }

        self.send_quit();
        result
    }

    async fn run_until_exit(&mut self) -> Result<ExitReason, D::Error> {
        self.driver.redraw(&self.app)?;

        loop {
            if let Some(key) = self.driver.poll_key(self.tick).await? {
                let actions = self.app.handle(AppEvent::Key(key));
                if let Some(reason) = self.process_actions(actions)? {
                    return Ok(reason);
                }
            }

            if let Some(reason) = self.drain_inbound()? {
                return Ok(reason);
            }
        }
    }

    /// Feed queued network messages to the App without waiting.
    fn drain_inbound(&mut self) -> Result<Option<ExitReason>, D::Error> {
        let mut actions = Vec::new();

        for _ in 0..MAX_INBOUND_PER_TICK {
            let message = match self.inbound.try_pop() {
                Ok(message) => message,
                Err(PopError::Empty) => break,
                Err(PopError::Closed) => {
                    if !self.app.connection_state().is_live() {
                        break;
                    }
                    // Network task is gone without saying goodbye
                    tracing::warn!("Inbound queue closed without Quit");
                    InboundMessage::Quit
                },
            };

            let quit = message == InboundMessage::Quit;
            actions.extend(self.app.handle(AppEvent::Inbound(message)));
            if quit {
                break;
            }
        }

        self.process_actions(actions)
    }

    /// Execute actions, coalescing redraws into one pass per pane.
    fn process_actions(&mut self, actions: Vec<AppAction>) -> Result<Option<ExitReason>, D::Error> {
        let mut dirty = Dirty::default();

        for action in actions {
            match action {
                AppAction::RenderInput => dirty.input = true,
                AppAction::RenderOutput => dirty.output = true,
                AppAction::Redraw => dirty.all = true,
                AppAction::Send(OutboundMessage::Quit) => self.send_quit(),
                AppAction::Send(message) => self.outbound.push(message),
                AppAction::Quit => return Ok(Some(self.exit_reason())),
            }
        }

        if dirty.all {
            self.driver.redraw(&self.app)?;
            return Ok(None);
        }
        if dirty.output {
            self.driver.render(&self.app, Pane::Output)?;
        }
        if dirty.input {
            self.driver.render(&self.app, Pane::Input)?;
        }
        Ok(None)
    }

    fn exit_reason(&self) -> ExitReason {
        match self.app.connection_state() {
            ConnectionState::Closed => ExitReason::ConnectionClosed,
            _ => ExitReason::UserQuit,
        }
    }

    /// Push the outbound `Quit` unless it already went out.
    fn send_quit(&mut self) {
        if !self.quit_sent {
            self.quit_sent = true;
            self.outbound.push(OutboundMessage::Quit);
        }
    }

    /// Application state.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// The driver, e.g. to inspect what a test driver recorded.
    pub fn driver(&self) -> &D {
        &self.driver
    }
}
