//! Runtime startup

use parking_lot::Mutex;
use veil_core::{Builtins, VeilError};

use crate::{
    console, Announcement, Decision, InstanceToken, Negotiator, RuntimeConfig, RuntimeResult,
    Version,
};

/// A started VEIL instance
#[derive(Debug)]
pub struct Runtime {
    config: RuntimeConfig,
    builtins: &'static Builtins,
    negotiator: Mutex<Negotiator>,
    console: bool,
}

impl Runtime {
    /// Start an instance.
    ///
    /// Parses the configured version, installs the console sink when enabled
    /// and builds the built-in enums.
    pub fn start(config: RuntimeConfig) -> RuntimeResult<Runtime> {
        let version: Version = config.version.parse()?;
        let console = console::init(&config.console)?;
        let builtins = Builtins::init()?;

        let token = config.token.unwrap_or_else(InstanceToken::generate);
        let negotiator = Negotiator::new(Announcement::new(version, token), config.tie_break);

        tracing::info!(
            target: "veil::runtime",
            %version,
            %token,
            console,
            "runtime started"
        );

        Ok(Runtime {
            config,
            builtins,
            negotiator: Mutex::new(negotiator),
            console,
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn builtins(&self) -> &'static Builtins {
        self.builtins
    }

    /// Whether this instance's console sink is the global subscriber
    pub fn console_installed(&self) -> bool {
        self.console
    }

    /// What this instance broadcasts to other instances
    pub fn announcement(&self) -> Announcement {
        self.negotiator.lock().announcement()
    }

    /// Process another instance's announcement
    pub fn receive(&self, remote: Announcement) -> Decision {
        self.negotiator.lock().receive(remote)
    }

    pub fn decision(&self) -> Decision {
        self.negotiator.lock().decision()
    }

    pub fn is_active(&self) -> bool {
        self.negotiator.lock().is_active()
    }

    /// Report `err` as a logged fatal diagnostic attributed to `source`
    pub fn report(&self, source: &str, err: &VeilError) -> VeilError {
        self.builtins.report(source, err)
    }
}

#[cfg(test)]
mod tests {
    use veil_core::{ErrorKind, Kind, Value};

    use super::*;
    use crate::{RuntimeError, TieBreak};

    #[test]
    fn test_start_quiet() {
        let runtime = Runtime::start(RuntimeConfig::quiet().with_token(InstanceToken(42))).unwrap();
        assert!(!runtime.console_installed());
        assert!(runtime.is_active());
        assert_eq!(runtime.announcement().token, InstanceToken(42));
        assert_eq!(runtime.builtins().kinds().len(), 8);
    }

    #[test]
    fn test_start_rejects_bad_version() {
        let err = Runtime::start(RuntimeConfig::quiet().with_version("one")).unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidVersion { .. }));
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_two_instances_agree() {
        let older = Runtime::start(
            RuntimeConfig::quiet()
                .with_version("1.0.0")
                .with_token(InstanceToken(1)),
        )
        .unwrap();
        let newer = Runtime::start(
            RuntimeConfig::quiet()
                .with_version("1.1.0")
                .with_token(InstanceToken(2))
                .with_tie_break(TieBreak::SmallerToken),
        )
        .unwrap();

        assert_eq!(older.receive(newer.announcement()), Decision::Defer);
        assert_eq!(newer.receive(older.announcement()), Decision::KeepOperating);
        assert_eq!(older.decision(), Decision::Defer);
        assert!(newer.is_active());
    }

    #[test]
    fn test_report_through_builtins() {
        let runtime = Runtime::start(RuntimeConfig::quiet()).unwrap();
        let number = runtime.builtins().kind(Kind::Number).unwrap();
        let err = number.invoke(&[Value::Boolean(true)]).unwrap_err();

        let fatal = runtime.report("Settings", &err);
        assert!(fatal.is_fatal());
        assert_eq!(
            fatal.to_string(),
            "[ Settings ] TypeMismatch: received boolean, expected number"
        );
    }
}
