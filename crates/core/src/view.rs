//! View-state selection for the dashboard shell.
//!
//! The active screen is a single [`ViewState`] value. The avatar capture
//! screen is its own variant rather than a flag on top of the Profile tab,
//! so "capturing an avatar while on the Wallet tab" cannot be represented.

use serde::Serialize;

use crate::error::CoreError;
use crate::qr::QrModal;

/// Entries in the bottom navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Wallet,
    DeFi,
    Games,
    Profile,
}

impl Tab {
    /// Navigation order, left to right.
    pub const ALL: [Tab; 4] = [Tab::Wallet, Tab::DeFi, Tab::Games, Tab::Profile];

    /// Label rendered under the nav icon.
    pub fn label(self) -> &'static str {
        match self {
            Tab::Wallet => "Wallet",
            Tab::DeFi => "DeFi",
            Tab::Games => "Games",
            Tab::Profile => "Profile",
        }
    }
}

/// The screen currently shown in the main content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    #[default]
    Wallet,
    DeFi,
    Games,
    Profile,
    AvatarCapture,
}

impl ViewState {
    /// The nav tab highlighted while this view is shown.
    pub fn tab(self) -> Tab {
        match self {
            ViewState::Wallet => Tab::Wallet,
            ViewState::DeFi => Tab::DeFi,
            ViewState::Games => Tab::Games,
            ViewState::Profile | ViewState::AvatarCapture => Tab::Profile,
        }
    }
}

impl From<Tab> for ViewState {
    fn from(tab: Tab) -> Self {
        match tab {
            Tab::Wallet => ViewState::Wallet,
            Tab::DeFi => ViewState::DeFi,
            Tab::Games => ViewState::Games,
            Tab::Profile => ViewState::Profile,
        }
    }
}

/// Top-level UI state of the dashboard.
#[derive(Debug, Clone, Default)]
pub struct Shell {
    view: ViewState,
    x_series: bool,
    qr_modal: Option<QrModal>,
}

impl Shell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn is_x_series(&self) -> bool {
        self.x_series
    }

    pub fn qr_modal(&self) -> Option<&QrModal> {
        self.qr_modal.as_ref()
    }

    /// Switch to `tab`. Selecting any tab, including Profile, leaves the
    /// avatar capture screen.
    pub fn select_tab(&mut self, tab: Tab) {
        let next = ViewState::from(tab);
        if next != self.view {
            tracing::debug!(from = ?self.view, to = ?next, "Switching dashboard view");
        }
        self.view = next;
    }

    /// Enter the avatar capture screen. Only reachable from Profile.
    pub fn create_avatar(&mut self) -> Result<(), CoreError> {
        if self.view != ViewState::Profile {
            return Err(CoreError::InvalidTransition {
                from: self.view,
                action: "create an avatar",
            });
        }
        self.view = ViewState::AvatarCapture;
        Ok(())
    }

    /// Leave the avatar capture screen and return to Profile.
    pub fn back_to_profile(&mut self) -> Result<(), CoreError> {
        if self.view != ViewState::AvatarCapture {
            return Err(CoreError::InvalidTransition {
                from: self.view,
                action: "go back to profile",
            });
        }
        self.view = ViewState::Profile;
        Ok(())
    }

    /// Flip the "X Series" toggle and return its new value.
    pub fn toggle_x_series(&mut self) -> bool {
        self.x_series = !self.x_series;
        self.x_series
    }

    /// Show the QR modal for `current_url`.
    ///
    /// Returns `Ok(None)` and leaves the modal closed when the URL is empty,
    /// since there is nothing to encode.
    pub fn open_qr_modal(&mut self, current_url: &str) -> Result<Option<&QrModal>, CoreError> {
        self.qr_modal = QrModal::for_page(current_url)?;
        Ok(self.qr_modal.as_ref())
    }

    pub fn close_qr_modal(&mut self) {
        self.qr_modal = None;
    }
}
