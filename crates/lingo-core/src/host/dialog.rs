/// Visual tone of a status line; hosts map it to colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Neutral,
    Success,
    Error,
}

/// Inline status shown under the activation code input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationStatus {
    MissingCode,
    Verifying,
    Activated,
    Rejected(String),
    NetworkError,
}

impl ActivationStatus {
    pub fn message(&self) -> String {
        match self {
            Self::MissingCode => "Please enter an activation code".to_string(),
            Self::Verifying => "Verifying...".to_string(),
            Self::Activated => "Activation successful".to_string(),
            Self::Rejected(reason) if reason.trim().is_empty() => "Activation failed".to_string(),
            Self::Rejected(reason) => reason.clone(),
            Self::NetworkError => "Network error, please try again".to_string(),
        }
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            Self::Verifying => StatusTone::Neutral,
            Self::Activated => StatusTone::Success,
            Self::MissingCode | Self::Rejected(_) | Self::NetworkError => StatusTone::Error,
        }
    }
}

/// The modal asking for an activation code.
pub trait ActivationDialog: Send + Sync {
    /// Shows the modal, replacing any instance already open.
    fn show(&self);

    fn set_status(&self, status: &ActivationStatus);

    fn close(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_uses_server_message() {
        let status = ActivationStatus::Rejected("code already used".into());
        assert_eq!(status.message(), "code already used");
        assert_eq!(status.tone(), StatusTone::Error);
        assert_eq!(ActivationStatus::Rejected(" ".into()).message(), "Activation failed");
    }
}
