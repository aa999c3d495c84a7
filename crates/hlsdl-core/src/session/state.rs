/// Where a session is in its lifecycle.
///
/// `FetchingManifest → Classifying → (AwaitingUserChoice) → BuildingSegmentList
/// → Downloading → Finalizing`, ending in one of the terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    FetchingManifest,
    Classifying,
    AwaitingUserChoice,
    BuildingSegmentList,
    Downloading,
    Finalizing,
    Done,
    Cancelled,
    Failed,
    /// The chooser declined every variant.
    Dismissed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::FetchingManifest => "fetching manifest",
            SessionState::Classifying => "classifying",
            SessionState::AwaitingUserChoice => "awaiting choice",
            SessionState::BuildingSegmentList => "building segment list",
            SessionState::Downloading => "downloading",
            SessionState::Finalizing => "finalizing",
            SessionState::Done => "done",
            SessionState::Cancelled => "cancelled",
            SessionState::Failed => "failed",
            SessionState::Dismissed => "dismissed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Done | SessionState::Cancelled | SessionState::Failed | SessionState::Dismissed
        )
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
