//! The avatar capture flow state machine.
//!
//! ```text
//! Idle -> Acquiring -> { AcquireFailed | Previewing }
//!      -> Capturing -> Encoding -> Requesting -> { Succeeded | RequestFailed }
//! ```
//!
//! `exit` moves any state to `Exited`, releasing the camera and cancelling
//! an in-flight request. `restart` moves a terminal state back through
//! `Idle` into a fresh acquisition.
//!
//! Every transition is broadcast; call [`AvatarFlow::subscribe`] to
//! receive them.

use std::io;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::camera::{CameraDevice, CameraError, CameraSession};
use crate::capture;
use crate::describe::{DescriptionRequest, DescriptionService};
use crate::encoding::{CapturedFrame, FrameEncoder};
use crate::surface::{DescriptionResult, SurfaceView, REQUEST_FAILED_MESSAGE};

/// Broadcast channel capacity for state transitions.
const EVENT_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum FlowState {
    Idle,
    Acquiring,
    /// The camera could not be opened or stopped delivering frames.
    AcquireFailed(CameraError),
    Previewing,
    Capturing,
    Encoding,
    Requesting,
    Succeeded(String),
    RequestFailed,
    Exited,
}

impl FlowState {
    pub fn name(&self) -> &'static str {
        match self {
            FlowState::Idle => "idle",
            FlowState::Acquiring => "acquiring",
            FlowState::AcquireFailed(_) => "acquire_failed",
            FlowState::Previewing => "previewing",
            FlowState::Capturing => "capturing",
            FlowState::Encoding => "encoding",
            FlowState::Requesting => "requesting",
            FlowState::Succeeded(_) => "succeeded",
            FlowState::RequestFailed => "request_failed",
            FlowState::Exited => "exited",
        }
    }

    /// States that `restart` may leave.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FlowState::AcquireFailed(_) | FlowState::Succeeded(_) | FlowState::RequestFailed
        )
    }

    /// Result of the description request, once one has been issued.
    pub fn description_result(&self) -> Option<DescriptionResult> {
        match self {
            FlowState::Capturing | FlowState::Encoding | FlowState::Requesting => {
                Some(DescriptionResult::Pending)
            }
            FlowState::Succeeded(text) => Some(DescriptionResult::Success(text.clone())),
            FlowState::RequestFailed => Some(DescriptionResult::Failure(REQUEST_FAILED_MESSAGE)),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Capture is disabled in the {state} state")]
    CaptureDisabled { state: &'static str },

    #[error("Cannot restart from the {state} state")]
    NotTerminal { state: &'static str },

    #[error("The avatar flow has been exited")]
    Exited,
}

/// Cloneable trigger for leaving a flow from another task.
#[derive(Debug, Clone)]
pub struct ExitHandle {
    cancel: CancellationToken,
}

impl ExitHandle {
    /// Request exit. An in-flight acquisition or description request is
    /// abandoned and its result discarded.
    ///
    /// This only signals the flow. A camera held while `Previewing` stays
    /// open until the owner's next call on the flow, or until it calls
    /// [`AvatarFlow::exit`] after awaiting [`ExitHandle::requested`].
    pub fn exit(&self) {
        self.cancel.cancel();
    }

    /// Resolves once exit has been requested.
    pub async fn requested(&self) {
        self.cancel.cancelled().await;
    }
}

/// One invocation of the avatar capture flow.
///
/// Owns the camera session exclusively. Dropping the flow releases the
/// camera and cancels any outstanding request.
pub struct AvatarFlow {
    id: Uuid,
    camera: Arc<dyn CameraDevice>,
    describer: Arc<dyn DescriptionService>,
    encoder: FrameEncoder,
    state: FlowState,
    session: Option<CameraSession>,
    frame: Option<Arc<CapturedFrame>>,
    cancel: CancellationToken,
    event_tx: broadcast::Sender<FlowState>,
}

impl AvatarFlow {
    pub fn new(camera: Arc<dyn CameraDevice>, describer: Arc<dyn DescriptionService>) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            id: Uuid::new_v4(),
            camera,
            describer,
            encoder: FrameEncoder::default(),
            state: FlowState::Idle,
            session: None,
            frame: None,
            cancel: CancellationToken::new(),
            event_tx,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// The captured frame, kept for the thumbnail until restart or exit.
    pub fn frame(&self) -> Option<&CapturedFrame> {
        self.frame.as_deref()
    }

    pub fn has_active_session(&self) -> bool {
        self.session.as_ref().is_some_and(CameraSession::is_active)
    }

    pub fn description_result(&self) -> Option<DescriptionResult> {
        self.state.description_result()
    }

    pub fn surface(&self) -> SurfaceView {
        SurfaceView::for_state(&self.state)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FlowState> {
        self.event_tx.subscribe()
    }

    pub fn exit_handle(&self) -> ExitHandle {
        ExitHandle {
            cancel: self.cancel.clone(),
        }
    }

    /// Start the camera preview.
    ///
    /// Only acts from `Idle` with no frame captured; in any other live state
    /// this is a no-op, so a flow never holds more than one session.
    pub async fn enter(&mut self) -> Result<(), FlowError> {
        self.exit_if_requested()?;

        if self.state != FlowState::Idle || self.frame.is_some() {
            tracing::debug!(flow_id = %self.id, state = self.state.name(), "Avatar flow already entered");
            return Ok(());
        }

        self.transition(FlowState::Acquiring);

        let camera = Arc::clone(&self.camera);
        let cancel = self.cancel.clone();
        let opened = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = camera.open() => Some(result),
        };

        match opened {
            None => {
                tracing::info!(flow_id = %self.id, "Avatar flow exited during camera acquisition");
                self.exit();
                Err(FlowError::Exited)
            }
            Some(Ok(stream)) => {
                let session = CameraSession::new(stream);
                let (width, height) = session.resolution();
                tracing::info!(flow_id = %self.id, width, height, "Camera preview started");
                self.session = Some(session);
                self.transition(FlowState::Previewing);
                Ok(())
            }
            Some(Err(e)) => {
                let reason = CameraError::classify(&e);
                tracing::error!(flow_id = %self.id, error = %e, ?reason, "Error accessing camera");
                self.transition(FlowState::AcquireFailed(reason));
                Ok(())
            }
        }
    }

    /// Capture the current frame and request its description.
    ///
    /// Disabled unless the flow is `Previewing`. On return the flow is in
    /// `Succeeded`, `RequestFailed`, `AcquireFailed` (the camera stopped
    /// delivering frames) or `Exited` (exit was requested mid-request).
    pub async fn capture(&mut self) -> Result<(), FlowError> {
        self.exit_if_requested()?;

        if self.state != FlowState::Previewing {
            return Err(FlowError::CaptureDisabled {
                state: self.state.name(),
            });
        }
        let Some(mut session) = self.session.take() else {
            return Err(FlowError::CaptureDisabled {
                state: self.state.name(),
            });
        };

        self.transition(FlowState::Capturing);
        let snapshot = tokio::task::spawn_blocking(move || capture::snapshot(&mut session))
            .await
            .unwrap_or_else(|e| Err(io::Error::other(e)));

        let raster = match snapshot {
            Ok(raster) => raster,
            Err(e) => {
                let reason = CameraError::classify(&e);
                tracing::error!(flow_id = %self.id, error = %e, ?reason, "Failed to read camera frame");
                self.transition(FlowState::AcquireFailed(reason));
                return Ok(());
            }
        };

        self.transition(FlowState::Encoding);
        let encoder = self.encoder;
        let encoded = tokio::task::spawn_blocking(move || encoder.encode(&raster)).await;
        let frame = match encoded {
            Ok(Ok(frame)) => Arc::new(frame),
            Ok(Err(e)) => {
                tracing::error!(flow_id = %self.id, error = %e, "Failed to encode captured frame");
                self.transition(FlowState::RequestFailed);
                return Ok(());
            }
            Err(e) => {
                tracing::error!(flow_id = %self.id, error = %e, "Encoding task failed");
                self.transition(FlowState::RequestFailed);
                return Ok(());
            }
        };
        self.frame = Some(Arc::clone(&frame));

        self.transition(FlowState::Requesting);
        self.request_description(DescriptionRequest::new(frame)).await;
        Ok(())
    }

    /// Leave the flow from any state. Idempotent.
    pub fn exit(&mut self) {
        if self.state == FlowState::Exited {
            return;
        }
        self.cancel.cancel();
        if let Some(mut session) = self.session.take() {
            session.release();
        }
        self.frame = None;
        self.transition(FlowState::Exited);
    }

    /// Discard the previous attempt and acquire the camera again.
    pub async fn restart(&mut self) -> Result<(), FlowError> {
        self.exit_if_requested()?;

        if !self.state.is_terminal() {
            return Err(FlowError::NotTerminal {
                state: self.state.name(),
            });
        }

        tracing::info!(flow_id = %self.id, from = self.state.name(), "Restarting avatar flow");
        self.frame = None;
        self.session = None;
        self.transition(FlowState::Idle);
        self.enter().await
    }

    // ---- private helpers ----

    async fn request_description(&mut self, request: DescriptionRequest) {
        let describer = Arc::clone(&self.describer);
        let cancel = self.cancel.clone();

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = describer.describe(request) => Some(result),
        };

        match outcome {
            None => {
                tracing::info!(flow_id = %self.id, "Avatar flow exited; discarding description request");
                self.exit();
            }
            Some(Ok(text)) => {
                tracing::info!(flow_id = %self.id, chars = text.len(), "Avatar description generated");
                self.transition(FlowState::Succeeded(text));
            }
            Some(Err(e)) => {
                tracing::error!(flow_id = %self.id, error = %format!("{e:#}"), "Avatar description request failed");
                self.transition(FlowState::RequestFailed);
            }
        }
    }

    /// Apply a pending exit request, if any.
    fn exit_if_requested(&mut self) -> Result<(), FlowError> {
        if self.cancel.is_cancelled() || self.state == FlowState::Exited {
            self.exit();
            return Err(FlowError::Exited);
        }
        Ok(())
    }

    fn transition(&mut self, next: FlowState) {
        tracing::debug!(
            flow_id = %self.id,
            from = self.state.name(),
            to = next.name(),
            "Avatar flow transition",
        );
        self.state = next;
        // No subscribers is fine.
        let _ = self.event_tx.send(self.state.clone());
    }
}

impl Drop for AvatarFlow {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
