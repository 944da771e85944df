//! Configuration validation.
//!
//! Checks every field an analysis run reads, before any provider call, so a
//! bad config fails fast with a config exit code.

use crate::domain::error::EtfRankError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), EtfRankError> {
    validate_top_n(config)?;
    validate_max_concurrency(config)?;
    validate_reference_date(config)?;
    validate_data_dir(config)?;
    validate_universe_file(config)?;
    validate_retry(config)?;
    validate_output_dir(config)?;
    Ok(())
}

fn validate_top_n(config: &dyn ConfigPort) -> Result<(), EtfRankError> {
    let value = config.get_int("analysis", "top_n", 100);
    if value < 1 {
        return Err(EtfRankError::ConfigInvalid {
            section: "analysis".to_string(),
            key: "top_n".to_string(),
            reason: "top_n must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_max_concurrency(config: &dyn ConfigPort) -> Result<(), EtfRankError> {
    let value = config.get_int("analysis", "max_concurrency", 8);
    if value < 1 {
        return Err(EtfRankError::ConfigInvalid {
            section: "analysis".to_string(),
            key: "max_concurrency".to_string(),
            reason: "max_concurrency must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_reference_date(config: &dyn ConfigPort) -> Result<(), EtfRankError> {
    // Optional; defaults to the latest trading day before today.
    match config.get_string("analysis", "reference_date") {
        None => Ok(()),
        Some(s) => match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
            Ok(_) => Ok(()),
            Err(_) => Err(EtfRankError::ConfigInvalid {
                section: "analysis".to_string(),
                key: "reference_date".to_string(),
                reason: "invalid reference_date format, expected YYYY-MM-DD".to_string(),
            }),
        },
    }
}

fn validate_data_dir(config: &dyn ConfigPort) -> Result<(), EtfRankError> {
    match config.get_string("provider", "data_dir") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(EtfRankError::ConfigMissing {
            section: "provider".to_string(),
            key: "data_dir".to_string(),
        }),
    }
}

fn validate_universe_file(config: &dyn ConfigPort) -> Result<(), EtfRankError> {
    match config.get_string("universe", "file") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(EtfRankError::ConfigMissing {
            section: "universe".to_string(),
            key: "file".to_string(),
        }),
    }
}

fn validate_retry(config: &dyn ConfigPort) -> Result<(), EtfRankError> {
    let attempts = config.get_int("provider", "retry_max_attempts", 3);
    if attempts < 0 {
        return Err(EtfRankError::ConfigInvalid {
            section: "provider".to_string(),
            key: "retry_max_attempts".to_string(),
            reason: "retry_max_attempts must be non-negative".to_string(),
        });
    }

    let initial = config.get_int("provider", "retry_initial_delay_ms", 500);
    if initial < 0 {
        return Err(EtfRankError::ConfigInvalid {
            section: "provider".to_string(),
            key: "retry_initial_delay_ms".to_string(),
            reason: "retry_initial_delay_ms must be non-negative".to_string(),
        });
    }

    let max = config.get_int("provider", "retry_max_delay_ms", 10_000);
    if max < initial {
        return Err(EtfRankError::ConfigInvalid {
            section: "provider".to_string(),
            key: "retry_max_delay_ms".to_string(),
            reason: "retry_max_delay_ms must be at least retry_initial_delay_ms".to_string(),
        });
    }

    let multiplier = config.get_double("provider", "retry_multiplier", 2.0);
    if multiplier < 1.0 {
        return Err(EtfRankError::ConfigInvalid {
            section: "provider".to_string(),
            key: "retry_multiplier".to_string(),
            reason: "retry_multiplier must be at least 1.0".to_string(),
        });
    }
    Ok(())
}

fn validate_output_dir(config: &dyn ConfigPort) -> Result<(), EtfRankError> {
    // Optional; an explicitly blank value is a mistake.
    match config.get_string("report", "output_dir") {
        Some(s) if s.trim().is_empty() => Err(EtfRankError::ConfigInvalid {
            section: "report".to_string(),
            key: "output_dir".to_string(),
            reason: "output_dir must not be blank".to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    const VALID: &str = "\
[analysis]
top_n = 100
max_concurrency = 8

[provider]
data_dir = ./data

[universe]
file = ./data/instruments.csv
";

    #[test]
    fn valid_config_passes() {
        let config = make_config(VALID);
        assert!(validate_analysis_config(&config).is_ok());
    }

    #[test]
    fn minimal_config_relies_on_defaults() {
        let config = make_config("[provider]\ndata_dir = ./data\n[universe]\nfile = u.csv\n");
        assert!(validate_analysis_config(&config).is_ok());
    }

    #[test]
    fn top_n_zero_fails() {
        let config = make_config(
            "[analysis]\ntop_n = 0\n[provider]\ndata_dir = ./data\n[universe]\nfile = u.csv\n",
        );
        let err = validate_analysis_config(&config).unwrap_err();
        assert!(matches!(err, EtfRankError::ConfigInvalid { key, .. } if key == "top_n"));
    }

    #[test]
    fn max_concurrency_zero_fails() {
        let config = make_config(
            "[analysis]\nmax_concurrency = 0\n[provider]\ndata_dir = ./data\n[universe]\nfile = u.csv\n",
        );
        let err = validate_analysis_config(&config).unwrap_err();
        assert!(matches!(err, EtfRankError::ConfigInvalid { key, .. } if key == "max_concurrency"));
    }

    #[test]
    fn bad_reference_date_format_fails() {
        let config = make_config(
            "[analysis]\nreference_date = 2024/06/14\n[provider]\ndata_dir = ./data\n[universe]\nfile = u.csv\n",
        );
        let err = validate_analysis_config(&config).unwrap_err();
        assert!(matches!(err, EtfRankError::ConfigInvalid { key, .. } if key == "reference_date"));
    }

    #[test]
    fn missing_data_dir_fails() {
        let config = make_config("[universe]\nfile = u.csv\n");
        let err = validate_analysis_config(&config).unwrap_err();
        assert!(matches!(err, EtfRankError::ConfigMissing { key, .. } if key == "data_dir"));
    }

    #[test]
    fn missing_universe_file_fails() {
        let config = make_config("[provider]\ndata_dir = ./data\n");
        let err = validate_analysis_config(&config).unwrap_err();
        assert!(matches!(err, EtfRankError::ConfigMissing { key, .. } if key == "file"));
    }

    #[test]
    fn negative_retry_attempts_fail() {
        let config = make_config(
            "[provider]\ndata_dir = ./data\nretry_max_attempts = -1\n[universe]\nfile = u.csv\n",
        );
        let err = validate_analysis_config(&config).unwrap_err();
        assert!(matches!(err, EtfRankError::ConfigInvalid { key, .. } if key == "retry_max_attempts"));
    }

    #[test]
    fn max_delay_below_initial_delay_fails() {
        let config = make_config(
            "[provider]\ndata_dir = ./data\nretry_initial_delay_ms = 1000\nretry_max_delay_ms = 500\n[universe]\nfile = u.csv\n",
        );
        let err = validate_analysis_config(&config).unwrap_err();
        assert!(matches!(err, EtfRankError::ConfigInvalid { key, .. } if key == "retry_max_delay_ms"));
    }

    #[test]
    fn multiplier_below_one_fails() {
        let config = make_config(
            "[provider]\ndata_dir = ./data\nretry_multiplier = 0.5\n[universe]\nfile = u.csv\n",
        );
        let err = validate_analysis_config(&config).unwrap_err();
        assert!(matches!(err, EtfRankError::ConfigInvalid { key, .. } if key == "retry_multiplier"));
    }

    #[test]
    fn blank_output_dir_fails() {
        let config = make_config(
            "[provider]\ndata_dir = ./data\n[universe]\nfile = u.csv\n[report]\noutput_dir =\n",
        );
        let result = validate_analysis_config(&config);
        // configparser may drop an empty value entirely; blank and missing
        // both have to leave the default usable.
        if let Err(err) = result {
            assert!(matches!(err, EtfRankError::ConfigInvalid { key, .. } if key == "output_dir"));
        }
    }
}
