use crate::view::ViewState;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Cannot {action} from the {from:?} view")]
    InvalidTransition {
        from: ViewState,
        action: &'static str,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
