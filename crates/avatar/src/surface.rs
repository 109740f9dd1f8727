//! What the avatar screen shows for a given flow state.

use std::fmt;

use serde::Serialize;

use crate::flow::FlowState;

/// Shown after a failed description request, whatever the cause.
pub const REQUEST_FAILED_MESSAGE: &str = "Failed to generate avatar description. Please try again.";

pub const GENERATING_MESSAGE: &str = "Generating description...";

/// Outcome of the remote description request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum DescriptionResult {
    Pending,
    Success(String),
    Failure(&'static str),
}

/// Mutually exclusive screens of the avatar flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum SurfaceView {
    /// Live preview. `error` replaces the video when the camera failed.
    Preview {
        error: Option<&'static str>,
        capture_enabled: bool,
    },
    /// Request outstanding.
    Awaiting,
    /// Description received.
    Described { text: String },
    /// Description request failed.
    Failed { message: &'static str },
    /// The user left the flow.
    Closed,
}

impl SurfaceView {
    pub fn for_state(state: &FlowState) -> Self {
        match state {
            FlowState::Idle | FlowState::Acquiring => SurfaceView::Preview {
                error: None,
                capture_enabled: false,
            },
            FlowState::Previewing => SurfaceView::Preview {
                error: None,
                capture_enabled: true,
            },
            FlowState::AcquireFailed(reason) => SurfaceView::Preview {
                error: Some(reason.message()),
                capture_enabled: false,
            },
            FlowState::Exited => SurfaceView::Closed,
            _ => match state.description_result() {
                Some(result) => Self::for_result(result),
                None => SurfaceView::Closed,
            },
        }
    }

    /// The result screen for an issued description request.
    pub fn for_result(result: DescriptionResult) -> Self {
        match result {
            DescriptionResult::Pending => SurfaceView::Awaiting,
            DescriptionResult::Success(text) => SurfaceView::Described { text },
            DescriptionResult::Failure(message) => SurfaceView::Failed { message },
        }
    }

    /// User-facing error text, if this screen shows one.
    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            SurfaceView::Preview { error, .. } => *error,
            SurfaceView::Failed { message } => Some(*message),
            _ => None,
        }
    }
}

impl fmt::Display for SurfaceView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceView::Preview { error: Some(e), .. } => write!(f, "{e}"),
            SurfaceView::Preview {
                error: None,
                capture_enabled: true,
            } => f.write_str("Position your face in the frame and capture."),
            SurfaceView::Preview { .. } => f.write_str("Starting camera..."),
            SurfaceView::Awaiting => f.write_str(GENERATING_MESSAGE),
            SurfaceView::Described { text } => write!(f, "Avatar Description:\n{text}"),
            SurfaceView::Failed { message } => f.write_str(message),
            SurfaceView::Closed => f.write_str("Back to Profile"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraError;

    #[test]
    fn camera_failure_disables_capture() {
        let view = SurfaceView::for_state(&FlowState::AcquireFailed(CameraError::DeviceBusy));
        assert_eq!(
            view,
            SurfaceView::Preview {
                error: Some("The camera is currently in use by another application."),
                capture_enabled: false,
            }
        );
    }

    #[test]
    fn only_previewing_enables_capture() {
        let enabled: Vec<_> = [
            FlowState::Idle,
            FlowState::Acquiring,
            FlowState::Previewing,
            FlowState::Requesting,
            FlowState::RequestFailed,
        ]
        .iter()
        .map(|s| {
            matches!(
                SurfaceView::for_state(s),
                SurfaceView::Preview {
                    capture_enabled: true,
                    ..
                }
            )
        })
        .collect();
        assert_eq!(enabled, vec![false, false, true, false, false]);
    }

    #[test]
    fn in_flight_states_await() {
        for state in [FlowState::Capturing, FlowState::Encoding, FlowState::Requesting] {
            assert_eq!(SurfaceView::for_state(&state), SurfaceView::Awaiting);
        }
        assert_eq!(SurfaceView::Awaiting.to_string(), "Generating description...");
    }

    #[test]
    fn success_text_is_passed_through() {
        let view = SurfaceView::for_state(&FlowState::Succeeded("Round face.\n".into()));
        assert_eq!(
            view,
            SurfaceView::Described {
                text: "Round face.\n".into()
            }
        );
        assert!(view.error_message().is_none());
    }

    #[test]
    fn result_screens_follow_description_result() {
        assert_eq!(
            SurfaceView::for_result(DescriptionResult::Pending),
            SurfaceView::Awaiting
        );
        assert_eq!(
            SurfaceView::for_result(DescriptionResult::Success("Oval face.".into())),
            SurfaceView::Described {
                text: "Oval face.".into()
            }
        );
        assert_eq!(
            SurfaceView::for_result(DescriptionResult::Failure(REQUEST_FAILED_MESSAGE)),
            SurfaceView::Failed {
                message: REQUEST_FAILED_MESSAGE
            }
        );

        for state in [
            FlowState::Requesting,
            FlowState::Succeeded("Oval face.".into()),
            FlowState::RequestFailed,
        ] {
            let result = state.description_result().unwrap();
            assert_eq!(SurfaceView::for_state(&state), SurfaceView::for_result(result));
        }
    }

    #[test]
    fn request_failure_uses_fixed_message() {
        let view = SurfaceView::for_state(&FlowState::RequestFailed);
        assert_eq!(view.error_message(), Some(REQUEST_FAILED_MESSAGE));
    }

    #[test]
    fn result_serializes_with_status_tag() {
        let json = serde_json::to_value(DescriptionResult::Success("hi".into())).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "success", "detail": "hi" }));

        let json = serde_json::to_value(DescriptionResult::Pending).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "pending" }));
    }
}
