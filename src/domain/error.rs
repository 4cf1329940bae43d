//! Domain error types.

/// Top-level error type for rangetrader.
#[derive(Debug, thiserror::Error)]
pub enum RangeTraderError {
    #[error("invalid brick size {value}: must be a finite value greater than zero")]
    InvalidBrickSize { value: f64 },

    #[error("invalid slippage {value}: must be a finite value of zero or more")]
    InvalidSlippage { value: f64 },

    #[error("position already open")]
    PositionAlreadyOpen,

    #[error("no open position to close")]
    NoOpenPosition,

    #[error("no bricks available to price a position")]
    NoBricks,

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("tick data error: {reason}")]
    TickData { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RangeTraderError {
    /// Process exit status for this error category.
    pub fn exit_status(&self) -> u8 {
        match self {
            RangeTraderError::Io(_) => 1,
            RangeTraderError::ConfigParse { .. }
            | RangeTraderError::ConfigMissing { .. }
            | RangeTraderError::ConfigInvalid { .. } => 2,
            RangeTraderError::TickData { .. } => 3,
            RangeTraderError::InvalidBrickSize { .. }
            | RangeTraderError::InvalidSlippage { .. }
            | RangeTraderError::PositionAlreadyOpen
            | RangeTraderError::NoOpenPosition
            | RangeTraderError::NoBricks => 4,
        }
    }
}

impl From<&RangeTraderError> for std::process::ExitCode {
    fn from(err: &RangeTraderError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}

/// Rejects sizes that are zero, negative, or not finite.
pub fn check_brick_size(value: f64) -> Result<f64, RangeTraderError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(RangeTraderError::InvalidBrickSize { value })
    }
}
