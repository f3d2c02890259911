//! # submission-diff-testkit
//!
//! Test helpers, fixtures, and in-memory adapters.
//! This crate depends on `ports`, `domain`, and `shared`.

pub mod errors;
pub mod fixtures;
pub mod in_memory;

/// Returns the testkit crate version.
#[must_use]
pub const fn testkit_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use submission_diff_ports::ports_crate_version;
    use submission_diff_shared::shared_crate_version;

    #[test]
    fn testkit_crate_compiles() {
        assert!(!testkit_crate_version().is_empty());
    }

    #[test]
    fn testkit_can_use_ports_and_shared() {
        assert_eq!(ports_crate_version(), shared_crate_version());
    }

    #[test]
    fn error_fixtures_are_available() {
        let codes = errors::common_error_codes();
        assert!(!codes.is_empty());
    }

    #[test]
    fn noop_logger_children_accept_events() {
        let logger: Box<dyn submission_diff_ports::LoggerPort> = Box::new(in_memory::NoopLogger);
        logger.info("testkit.noop", "dropped", None);
        let child = logger.child(submission_diff_ports::LogFields::new());
        child.warn("testkit.noop.child", "dropped", None);
    }
}
