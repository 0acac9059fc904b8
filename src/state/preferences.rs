use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Display preferences shared by the connected dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Preferences {
    pub show_history: bool,
    pub show_only_sums: bool,
    pub show_images: bool,
    /// Gate for the first blood and game over overlays.
    pub show_notifications: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            show_history: true,
            show_only_sums: false,
            show_images: true,
            show_notifications: true,
        }
    }
}
