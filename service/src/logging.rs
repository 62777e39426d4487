use crate::config::Config;
use log::LevelFilter;
use simplelog::{self, ConfigBuilder};

/// Dependencies whose output is suppressed unless running at Trace.
const NOISY_DEPENDENCIES: &[&str] = &[
    "sqlx",
    "sea_orm",
    "tower",
    "hyper",
    "axum",
    "reqwest",
    "rustls",
    "handlebars",
];

pub struct Logger {}

impl Logger {
    /// Installs the global terminal logger at the configured level.
    pub fn init_logger(config: &Config) {
        let level = config.log_level_filter;

        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();
        for module in Self::ignored_modules(level) {
            builder.add_filter_ignore_str(module);
        }

        simplelog::TermLogger::init(
            level,
            builder.build(),
            simplelog::TerminalMode::Mixed,
            simplelog::ColorChoice::Auto,
        )
        .expect("Failed to start simplelog");
    }

    fn ignored_modules(level: LevelFilter) -> &'static [&'static str] {
        match level {
            LevelFilter::Trace => &[],
            _ => NOISY_DEPENDENCIES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_level_keeps_dependency_logs() {
        assert!(Logger::ignored_modules(LevelFilter::Trace).is_empty());
    }

    #[test]
    fn other_levels_silence_http_and_db_dependencies() {
        for level in [
            LevelFilter::Off,
            LevelFilter::Error,
            LevelFilter::Warn,
            LevelFilter::Info,
            LevelFilter::Debug,
        ] {
            let ignored = Logger::ignored_modules(level);
            assert!(ignored.contains(&"sea_orm"), "{level} should drop sea_orm");
            assert!(ignored.contains(&"reqwest"), "{level} should drop reqwest");
        }
    }

    #[test]
    fn workspace_crates_are_never_silenced() {
        // The ignore filter is a prefix match on the module path.
        for module in ["provider_auth", "domain", "web", "service", "entity_api"] {
            assert!(
                !NOISY_DEPENDENCIES
                    .iter()
                    .any(|ignored| module.starts_with(ignored)),
                "{module} would be filtered"
            );
        }
    }
}
