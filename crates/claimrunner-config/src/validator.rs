//! Configuration validation.

use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_browser(config, &mut result);
        Self::validate_sequencer(config, &mut result);
        Self::validate_scan(config, &mut result);

        result
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }
        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        if config.browser.debug_port == 0 {
            result.add_error(ValidationError::new(
                "browser.debug_port",
                "Debug port cannot be 0",
            ));
        }
        if config.browser.debug_port == config.server.port {
            result.add_error(ValidationError::new(
                "browser.debug_port",
                "Debug port collides with server.port",
            ));
        }
    }

    fn validate_sequencer(config: &Config, result: &mut ValidationResult) {
        let seq = &config.sequencer;

        for (path, value) in [
            ("sequencer.load_poll_ms", seq.load_poll_ms),
            ("sequencer.capture_poll_ms", seq.capture_poll_ms),
            ("sequencer.result_poll_ms", seq.result_poll_ms),
        ] {
            if value == 0 {
                result.add_error(ValidationError::new(path, "Poll interval must be positive"));
            }
        }

        if seq.capture_timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "sequencer.capture_timeout_ms",
                "Capture needs a positive ceiling",
            ));
        }

        if seq.result_poll_ms > seq.result_timeout_ms {
            result.add_warning(ValidationWarning::new(
                "sequencer.result_poll_ms",
                "Poll interval exceeds the result timeout; the slot is read once",
            ));
        }

        if seq.tab_settle_ms >= 1_000 {
            result.add_warning(ValidationWarning::new(
                "sequencer.tab_settle_ms",
                "Settle pauses of a second or more slow down long runs",
            ));
        }
    }

    fn validate_scan(config: &Config, result: &mut ValidationResult) {
        if config.scan.interval_minutes == 0 {
            result.add_error(ValidationError::new(
                "scan.interval_minutes",
                "Scan interval must be at least one minute",
            ));
        }
        if config.scan.target_host.trim().is_empty() {
            result.add_error(ValidationError::new(
                "scan.target_host",
                "Target host cannot be empty",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
