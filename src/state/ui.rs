//! UI interaction state

/// Transient messages shown in the status bar
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Error message to display in UI (status bar)
    pub error_message: Option<String>,
    /// Short-lived confirmation, e.g. after saving settings
    pub info_message: Option<String>,
}

impl UiState {
    /// Set an error message
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
        self.info_message = None;
    }

    pub fn set_info(&mut self, message: impl Into<String>) {
        self.info_message = Some(message.into());
    }

    /// Clear the current error message
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }
}
