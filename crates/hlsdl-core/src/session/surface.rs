use crate::manifest::VariantSet;
use crate::scheduler::ProgressStats;

use super::SessionState;

/// The session's view of whoever is watching it (terminal, GUI, test).
pub trait ProgressSurface {
    /// Called once per received segment. Returning `false` cancels the session.
    fn on_progress(&mut self, stats: &ProgressStats) -> bool;

    /// Picks one variant URL from a master playlist, or `None` to dismiss.
    /// Called even when there is a single variant.
    fn choose_variant(&mut self, variants: &VariantSet) -> Option<String>;

    fn on_state(&mut self, _state: SessionState) {}
}
