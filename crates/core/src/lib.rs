//! Dashboard shell model for the blockDAG wallet.
//!
//! The shell is a tabbed mobile layout (Wallet, DeFi, Games, Profile) with
//! an "X Series" toggle in the bottom bar and a QR modal for opening the
//! dashboard on another device. The avatar capture flow is entered from the
//! Profile tab and is represented as its own [`ViewState`] variant.

pub mod error;
pub mod panel;
pub mod qr;
pub mod view;

pub use error::CoreError;
pub use view::{Shell, Tab, ViewState};
