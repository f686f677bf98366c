#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid thresholds: critical ({critical}) must be below low ({low}) and both must be non-negative")]
    InvalidThresholds { low: f64, critical: f64 },
}
