//! Static content for the four dashboard panels.

use serde::Serialize;

use crate::view::Tab;

/// Title, blurb and placeholder illustration of one tab panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Panel {
    pub title: &'static str,
    pub blurb: &'static str,
    pub illustration_url: &'static str,
}

const WALLET: Panel = Panel {
    title: "Wallet",
    blurb: "Connect and manage your digital assets securely. View your balances, \
            transaction history, and send/receive tokens with ease.",
    illustration_url: "https://picsum.photos/seed/wallet/400/200",
};

const DEFI: Panel = Panel {
    title: "DeFi Hub",
    blurb: "Explore the world of Decentralized Finance. Swap tokens, provide \
            liquidity, and earn yields on your crypto assets.",
    illustration_url: "https://picsum.photos/seed/defi/400/200",
};

const GAMES: Panel = Panel {
    title: "Game Center",
    blurb: "Dive into blockchain gaming. Discover new titles, manage your \
            in-game assets, and compete for rewards.",
    illustration_url: "https://picsum.photos/seed/games/400/200",
};

const PROFILE: Panel = Panel {
    title: "Profile",
    blurb: "View and edit your profile details, manage your settings, and \
            track your achievements across the platform.",
    illustration_url: "https://picsum.photos/seed/profile/400/200",
};

/// Placeholder avatar shown on the Profile panel.
pub const PROFILE_AVATAR_URL: &str = "https://picsum.photos/seed/avatar/100";

/// Static panel content for `tab`.
pub fn panel(tab: Tab) -> &'static Panel {
    match tab {
        Tab::Wallet => &WALLET,
        Tab::DeFi => &DEFI,
        Tab::Games => &GAMES,
        Tab::Profile => &PROFILE,
    }
}
