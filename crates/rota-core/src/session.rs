//! Optimization session: the state machine around one image and its routes.
//!
//! ```text
//! Idle ──select_image──▶ ImageSelected ──begin──▶ Requesting ──finish──▶ Succeeded
//!                              ▲                                   └──▶ Failed
//!                              └──────────── select_image ◀────────────────┘
//! Succeeded | Failed ──reset──▶ Idle
//! ```
//!
//! A session allows one request at a time. [`OptimizationSession::run`] holds
//! `&mut self` across the network call; callers driving their own event loop
//! use [`begin`](OptimizationSession::begin) and
//! [`finish`](OptimizationSession::finish), and `begin` refuses while a
//! request is in flight.

use crate::error::{OptimizeError, OptimizeResult};
use crate::input::ImageInput;
use crate::optimizer::RouteOptimizer;
use crate::types::{Citation, DriverRoute, OptimizationResult};

pub const NO_IMAGE_MESSAGE: &str = "Please select an image first.";
pub const NO_CREDENTIAL_MESSAGE: &str =
    "No API key configured. Set GEMINI_API_KEY or run `rota key set`.";
pub const IN_FLIGHT_MESSAGE: &str = "An optimization is already running.";
pub const RESET_FIRST_MESSAGE: &str = "Routes are already available. Reset to start over.";
pub const EMPTY_RESULT_MESSAGE: &str =
    "Could not generate routes. The AI response was empty or malformed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    ImageSelected,
    Requesting,
    Succeeded,
    Failed,
}

#[derive(Debug)]
pub struct OptimizationSession {
    state: SessionState,
    image: Option<ImageInput>,
    result: Option<OptimizationResult>,
    error: Option<String>,
    failure: Option<OptimizeError>,
    loading: bool,
}

impl Default for OptimizationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl OptimizationSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            image: None,
            result: None,
            error: None,
            failure: None,
            loading: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn image(&self) -> Option<&ImageInput> {
        self.image.as_ref()
    }

    /// The last successful result.
    pub fn result(&self) -> Option<&OptimizationResult> {
        self.result.as_ref()
    }

    pub fn routes(&self) -> &[DriverRoute] {
        self.result.as_ref().map(|r| r.routes()).unwrap_or_default()
    }

    pub fn citations(&self) -> &[Citation] {
        self.result
            .as_ref()
            .map(|r| r.citations.as_slice())
            .unwrap_or_default()
    }

    /// User-facing error message, if the last action failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The error that ended the last request, if it ended with one.
    pub fn failure(&self) -> Option<&OptimizeError> {
        self.failure.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Select a new image, discarding any previous routes or error.
    pub fn select_image(&mut self, image: ImageInput) -> OptimizeResult<()> {
        if self.state == SessionState::Requesting {
            return Err(OptimizeError::Precondition(IN_FLIGHT_MESSAGE.to_string()));
        }
        self.image = Some(image);
        self.result = None;
        self.error = None;
        self.failure = None;
        self.state = SessionState::ImageSelected;
        Ok(())
    }

    /// Move to `Requesting` and hand back the image to send.
    ///
    /// On a failed guard only the error message changes.
    pub fn begin(&mut self, api_key: Option<&str>) -> OptimizeResult<ImageInput> {
        let guard = match (self.state, &self.image) {
            (SessionState::Requesting, _) => Err(IN_FLIGHT_MESSAGE),
            (SessionState::Succeeded, _) => Err(RESET_FIRST_MESSAGE),
            (_, None) => Err(NO_IMAGE_MESSAGE),
            _ if !api_key.is_some_and(|k| !k.trim().is_empty()) => Err(NO_CREDENTIAL_MESSAGE),
            (_, Some(image)) => Ok(image.clone()),
        };

        match guard {
            Ok(image) => {
                self.state = SessionState::Requesting;
                self.loading = true;
                self.result = None;
                self.error = None;
                self.failure = None;
                Ok(image)
            }
            Err(message) => {
                self.error = Some(message.to_string());
                Err(OptimizeError::Precondition(message.to_string()))
            }
        }
    }

    /// Record the outcome of the request started by [`begin`](Self::begin).
    pub fn finish(&mut self, outcome: OptimizeResult<OptimizationResult>) -> SessionState {
        if self.state != SessionState::Requesting {
            tracing::warn!("Ignoring outcome: no request in flight (state {:?})", self.state);
            return self.state;
        }
        self.loading = false;

        match outcome {
            Ok(result) if result.has_routes() => {
                tracing::info!("Generated {} route(s)", result.routes().len());
                self.result = Some(result);
                self.state = SessionState::Succeeded;
            }
            Ok(_) => {
                tracing::warn!("Model produced no routes");
                self.error = Some(EMPTY_RESULT_MESSAGE.to_string());
                self.state = SessionState::Failed;
            }
            Err(e) => {
                tracing::error!("Optimization failed: {e}");
                self.error = Some(e.user_message());
                self.failure = Some(e);
                self.state = SessionState::Failed;
            }
        }
        self.state
    }

    /// Run one optimization end to end.
    ///
    /// Guard failures are returned as `Err`; a completed attempt returns the
    /// resulting state (`Succeeded` or `Failed`).
    pub async fn run(
        &mut self,
        optimizer: &RouteOptimizer,
        api_key: Option<&str>,
        driver_count: u32,
    ) -> OptimizeResult<SessionState> {
        let image = self.begin(api_key)?;
        let key = api_key.unwrap_or_default();
        let outcome = optimizer.optimize(key, image, driver_count).await;
        Ok(self.finish(outcome))
    }

    /// Return to `Idle`, clearing everything. Only from `Succeeded` or `Failed`.
    pub fn reset(&mut self) -> bool {
        if !matches!(self.state, SessionState::Succeeded | SessionState::Failed) {
            return false;
        }
        *self = Self::new();
        true
    }
}
