//! Transient overlays shown on the dashboards: first blood banner and game over fireworks.

use serde::Serialize;
use utoipa::ToSchema;

use crate::dao::models::TeamId;

/// First blood banner.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FirstBloodOverlay {
    #[default]
    Idle,
    Visible {
        service: String,
        team: String,
        generation: u64,
    },
}

/// Stage of the game over animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PyroStage {
    #[default]
    Hidden,
    /// Dimmed backdrop, fireworks not started yet.
    Backdrop,
    /// Backdrop and fireworks.
    Effect,
}

/// One of the podium teams shown when the game ends.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PodiumEntry {
    pub team_id: TeamId,
    /// Resolved through the team directory, `None` while it is not loaded.
    pub name: Option<String>,
    pub points: f64,
}

/// Current state of every overlay.
#[derive(Debug, Clone, Default)]
pub struct OverlayState {
    first_blood: FirstBloodOverlay,
    first_blood_generation: u64,
    pyro: PyroStage,
    pyro_generation: u64,
    podium: Vec<PodiumEntry>,
}

impl OverlayState {
    pub fn first_blood(&self) -> &FirstBloodOverlay {
        &self.first_blood
    }

    pub fn pyro(&self) -> PyroStage {
        self.pyro
    }

    pub fn podium(&self) -> &[PodiumEntry] {
        &self.podium
    }

    /// Show the banner for a new first blood, returning the token needed to hide it.
    pub fn show_first_blood(&mut self, service: String, team: String) -> u64 {
        self.first_blood_generation += 1;
        self.first_blood = FirstBloodOverlay::Visible {
            service,
            team,
            generation: self.first_blood_generation,
        };
        self.first_blood_generation
    }

    /// Hide the banner shown under `generation`; a newer banner stays visible.
    pub fn expire_first_blood(&mut self, generation: u64) -> bool {
        match self.first_blood {
            FirstBloodOverlay::Visible { generation: shown, .. } if shown == generation => {
                self.first_blood = FirstBloodOverlay::Idle;
                true
            }
            _ => false,
        }
    }

    /// Hide whatever banner is visible (escape key).
    pub fn dismiss_first_blood(&mut self) -> bool {
        let was_visible = matches!(self.first_blood, FirstBloodOverlay::Visible { .. });
        self.first_blood = FirstBloodOverlay::Idle;
        was_visible
    }

    pub fn set_podium(&mut self, podium: Vec<PodiumEntry>) {
        self.podium = podium;
    }

    /// Start the game over animation with the backdrop only.
    pub fn start_pyro(&mut self) -> u64 {
        self.pyro_generation += 1;
        self.pyro = PyroStage::Backdrop;
        self.pyro_generation
    }

    /// Advance the animation started under `generation` to the fireworks stage.
    pub fn reveal_pyro(&mut self, generation: u64) -> bool {
        if self.pyro_generation == generation && self.pyro == PyroStage::Backdrop {
            self.pyro = PyroStage::Effect;
            true
        } else {
            false
        }
    }

    /// Hide the animation started under `generation`.
    pub fn end_pyro(&mut self, generation: u64) -> bool {
        if self.pyro_generation == generation && self.pyro != PyroStage::Hidden {
            self.pyro = PyroStage::Hidden;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_expiry_keeps_newer_banner() {
        let mut overlay = OverlayState::default();
        let first = overlay.show_first_blood("web".into(), "A".into());
        let second = overlay.show_first_blood("pwn".into(), "B".into());

        assert!(!overlay.expire_first_blood(first));
        assert!(matches!(overlay.first_blood(), FirstBloodOverlay::Visible { team, .. } if team == "B"));
        assert!(overlay.expire_first_blood(second));
        assert_eq!(overlay.first_blood(), &FirstBloodOverlay::Idle);
    }

    #[test]
    fn dismiss_reports_whether_something_was_hidden() {
        let mut overlay = OverlayState::default();
        assert!(!overlay.dismiss_first_blood());
        overlay.show_first_blood("web".into(), "A".into());
        assert!(overlay.dismiss_first_blood());
    }

    #[test]
    fn pyro_runs_backdrop_then_effect_then_hidden() {
        let mut overlay = OverlayState::default();
        let generation = overlay.start_pyro();
        assert_eq!(overlay.pyro(), PyroStage::Backdrop);
        assert!(overlay.reveal_pyro(generation));
        assert_eq!(overlay.pyro(), PyroStage::Effect);
        assert!(overlay.end_pyro(generation));
        assert_eq!(overlay.pyro(), PyroStage::Hidden);
        assert!(!overlay.reveal_pyro(generation));
    }
}
