use thiserror::Error;

/// Raised when a feature vector does not fit the six-feature student schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputShapeError {
    #[error("expected {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("feature `{feature}` is not a finite number")]
    NonFinite { feature: &'static str },

    #[error("feature `{feature}` must be a whole number, got {value}")]
    NotInteger { feature: &'static str, value: f64 },

    #[error("feature `{feature}` must be 0 or 1, got {value}")]
    NotBoolean { feature: &'static str, value: f64 },

    #[error("feature `{feature}` value {value} is outside [{min}, {max}]")]
    OutOfDomain {
        feature: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}
