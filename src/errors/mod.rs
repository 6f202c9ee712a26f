use thiserror::Error;

/// Typed error hierarchy for barnacle.
///
/// Use at module boundaries (rule loading, webhook acquisition, message delivery, config
/// validation). Adapter and leaf functions can keep using `anyhow::Result`; the `Internal`
/// variant allows seamless conversion via the `?` operator.
#[derive(Debug, Error)]
pub enum BarnacleError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load automod rules: {0}")]
    RuleLoad(String),

    #[error("Webhook acquisition failed: {0}")]
    Acquisition(String),

    #[error("Delivery failed ({stage}): {message}")]
    Delivery {
        stage: DeliveryStage,
        message: String,
    },

    #[error("Member lookup failed: {0}")]
    Profile(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Which outbound call of a dispatch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStage {
    Republish,
    Warning,
}

impl std::fmt::Display for DeliveryStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Republish => f.write_str("republish"),
            Self::Warning => f.write_str("warning"),
        }
    }
}

impl BarnacleError {
    pub fn delivery(stage: DeliveryStage, err: &anyhow::Error) -> Self {
        Self::Delivery {
            stage,
            message: format!("{:#}", err),
        }
    }

    /// Whether this failure should be visible in operator logs.
    ///
    /// Member lookups degrade to fallback identity fields and stay silent.
    pub fn is_operational(&self) -> bool {
        !matches!(self, Self::Profile(_))
    }
}

/// Convenience alias for results using `BarnacleError`.
pub type BarnacleResult<T> = std::result::Result<T, BarnacleError>;
