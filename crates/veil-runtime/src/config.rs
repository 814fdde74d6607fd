//! Runtime configuration

use crate::{InstanceToken, TieBreak};

/// Console sink configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Install the console sink at startup
    pub enabled: bool,
    /// `EnvFilter` directive selecting which events reach the console
    pub directive: String,
    /// Terminal emphasis on rendered diagnostics
    pub styled: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        ConsoleConfig {
            enabled: true,
            directive: "veil=warn".to_string(),
            styled: true,
        }
    }
}

impl ConsoleConfig {
    /// No console sink; the host application owns the subscriber
    pub fn disabled() -> Self {
        ConsoleConfig {
            enabled: false,
            ..ConsoleConfig::default()
        }
    }

    /// Every VEIL event, unstyled
    pub fn verbose() -> Self {
        ConsoleConfig {
            enabled: true,
            directive: "veil=trace".to_string(),
            styled: false,
        }
    }
}

/// Runtime configuration
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Version announced during negotiation, `major.minor.patch`
    pub version: String,
    /// Fixed instance token; generated at startup when `None`
    pub token: Option<InstanceToken>,
    /// Token comparison between instances of equal version
    pub tie_break: TieBreak,
    pub console: ConsoleConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            version: env!("CARGO_PKG_VERSION").to_string(),
            token: None,
            tie_break: TieBreak::default(),
            console: ConsoleConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Embedded in a host that installs its own subscriber
    pub fn quiet() -> Self {
        RuntimeConfig {
            console: ConsoleConfig::disabled(),
            ..RuntimeConfig::default()
        }
    }

    /// Development setup tracing every VEIL event
    pub fn verbose() -> Self {
        RuntimeConfig {
            console: ConsoleConfig::verbose(),
            ..RuntimeConfig::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_token(mut self, token: InstanceToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_console(mut self, console: ConsoleConfig) -> Self {
        self.console = console;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Version;

    #[test]
    fn test_default_version_parses() {
        let config = RuntimeConfig::default();
        assert!(config.version.parse::<Version>().is_ok());
        assert!(config.console.enabled);
        assert!(config.token.is_none());
    }

    #[test]
    fn test_presets() {
        assert!(!RuntimeConfig::quiet().console.enabled);
        assert_eq!(RuntimeConfig::verbose().console.directive, "veil=trace");
    }

    #[test]
    fn test_builders() {
        let config = RuntimeConfig::quiet()
            .with_version("3.1.4")
            .with_token(InstanceToken(7))
            .with_tie_break(TieBreak::SmallerToken);
        assert_eq!(config.version, "3.1.4");
        assert_eq!(config.token, Some(InstanceToken(7)));
        assert_eq!(config.tie_break, TieBreak::SmallerToken);
        assert!(!config.console.enabled);
    }
}
