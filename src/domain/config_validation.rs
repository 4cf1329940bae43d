//! Configuration validation.
//!
//! Validates all config fields before a run starts.

use crate::domain::error::RangeTraderError;
use crate::ports::config_port::ConfigPort;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), RangeTraderError> {
    validate_brick_size(config)?;
    validate_slippage(config)?;
    validate_close_at_end(config)?;
    validate_unique_bricks(config)?;
    Ok(())
}

/// `[range] brick_size` is required and must be a positive number.
pub fn required_brick_size(config: &dyn ConfigPort) -> Result<f64, RangeTraderError> {
    let raw = config
        .get_string("range", "brick_size")
        .ok_or_else(|| RangeTraderError::ConfigMissing {
            section: "range".to_string(),
            key: "brick_size".to_string(),
        })?;
    let value = parse_number("range", "brick_size", &raw)?;
    if !(value.is_finite() && value > 0.0) {
        return Err(RangeTraderError::ConfigInvalid {
            section: "range".to_string(),
            key: "brick_size".to_string(),
            reason: "brick_size must be positive".to_string(),
        });
    }
    Ok(value)
}

/// `[backtest] slippage` defaults to zero and must not be negative.
pub fn slippage(config: &dyn ConfigPort) -> Result<f64, RangeTraderError> {
    let value = match config.get_string("backtest", "slippage") {
        Some(raw) => parse_number("backtest", "slippage", &raw)?,
        None => 0.0,
    };
    if !(value.is_finite() && value >= 0.0) {
        return Err(RangeTraderError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "slippage".to_string(),
            reason: "slippage must be non-negative".to_string(),
        });
    }
    Ok(value)
}

fn validate_brick_size(config: &dyn ConfigPort) -> Result<(), RangeTraderError> {
    required_brick_size(config).map(|_| ())
}

fn validate_slippage(config: &dyn ConfigPort) -> Result<(), RangeTraderError> {
    slippage(config).map(|_| ())
}

fn validate_close_at_end(config: &dyn ConfigPort) -> Result<(), RangeTraderError> {
    validate_bool(config, "backtest", "close_at_end")
}

fn validate_unique_bricks(config: &dyn ConfigPort) -> Result<(), RangeTraderError> {
    validate_bool(config, "report", "unique_bricks")
}

fn validate_bool(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), RangeTraderError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(());
    };
    // Both defaults agree only when the value parses.
    if config.get_bool(section, key, true) != config.get_bool(section, key, false) {
        return Err(RangeTraderError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("expected a boolean, got {:?}", raw),
        });
    }
    Ok(())
}

fn parse_number(section: &str, key: &str, raw: &str) -> Result<f64, RangeTraderError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| RangeTraderError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("expected a number, got {:?}", raw),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn valid_config_passes() {
        let config = make_config(
            r#"
[range]
brick_size = 15

[backtest]
slippage = 5
ticks = ticks.csv
close_at_end = yes

[report]
unique_bricks = true
"#,
        );
        assert!(validate_config(&config).is_ok());
        assert_eq!(required_brick_size(&config).unwrap(), 15.0);
        assert_eq!(slippage(&config).unwrap(), 5.0);
    }

    #[test]
    fn missing_brick_size_fails() {
        let config = make_config("[backtest]\nslippage = 1\n");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, RangeTraderError::ConfigMissing { key, .. } if key == "brick_size"));
    }

    #[test]
    fn zero_brick_size_fails() {
        let config = make_config("[range]\nbrick_size = 0\n");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, RangeTraderError::ConfigInvalid { key, .. } if key == "brick_size"));
    }

    #[test]
    fn non_numeric_brick_size_fails() {
        let config = make_config("[range]\nbrick_size = wide\n");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, RangeTraderError::ConfigInvalid { key, .. } if key == "brick_size"));
    }

    #[test]
    fn slippage_defaults_to_zero() {
        let config = make_config("[range]\nbrick_size = 1\n");
        assert_eq!(slippage(&config).unwrap(), 0.0);
    }

    #[test]
    fn negative_slippage_fails() {
        let config = make_config("[range]\nbrick_size = 1\n[backtest]\nslippage = -0.5\n");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, RangeTraderError::ConfigInvalid { key, .. } if key == "slippage"));
    }

    #[test]
    fn bad_boolean_fails() {
        let config = make_config("[range]\nbrick_size = 1\n[report]\nunique_bricks = maybe\n");
        let err = validate_config(&config).unwrap_err();
        assert!(
            matches!(err, RangeTraderError::ConfigInvalid { key, .. } if key == "unique_bricks")
        );
    }
}
