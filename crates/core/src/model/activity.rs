/// Foreground/background status of the process, as reported by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ActivityState {
    /// In the foreground and receiving input.
    #[default]
    Active,
    /// Visible but not receiving input (e.g. a system overlay is up).
    Inactive,
    /// Not visible; the host may suspend or kill the process.
    Background,
}

impl ActivityState {
    #[must_use]
    pub fn is_active(self) -> bool {
        self == ActivityState::Active
    }
}
