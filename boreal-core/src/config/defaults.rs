//! Default values for the Boreal core configuration.

/// Default minimum log level.
pub fn default_log_level() -> String {
    "info".to_string()
}

/// Default log output format.
pub fn default_log_format() -> String {
    "text".to_string()
}

/// Default per-namespace cap on pending temporary references.
pub fn default_temporary_reference_limit() -> usize {
    32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_consistent() {
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_log_format(), "text");
        assert_eq!(default_temporary_reference_limit(), 32);
    }
}
