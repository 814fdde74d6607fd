//! Instance negotiation
//!
//! Several copies of the library can be loaded into one process. Each copy
//! announces its version and a random token; on hearing another copy's
//! announcement it decides whether to keep operating or to defer.
//!
//! Rules:
//! - A strictly newer version wins
//! - On equal versions the [`TieBreak`] policy compares tokens
//! - An announcement carrying our own token is an echo and is ignored
//! - Deferring is final

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::{RuntimeError, RuntimeResult};

const TARGET: &str = "veil::runtime";

/// Library version `major.minor.patch`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for Version {
    type Err = RuntimeError;

    fn from_str(input: &str) -> RuntimeResult<Version> {
        let invalid = |reason: &str| RuntimeError::InvalidVersion {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        // Pre-release and build suffixes do not take part in negotiation
        let core = input
            .trim()
            .split(['-', '+'])
            .next()
            .unwrap_or_default();
        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() != 3 {
            return Err(invalid("expected major.minor.patch"));
        }

        let number = |part: &str, name: &str| {
            part.parse::<u32>()
                .map_err(|_| invalid(&format!("{name} is not a number")))
        };
        Ok(Version {
            major: number(parts[0], "major")?,
            minor: number(parts[1], "minor")?,
            patch: number(parts[2], "patch")?,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Uniqueness token of one loaded instance
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceToken(pub u64);

impl InstanceToken {
    pub fn generate() -> Self {
        InstanceToken(rand::random())
    }
}

impl fmt::Display for InstanceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// What an instance broadcasts about itself
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Announcement {
    pub version: Version,
    pub token: InstanceToken,
}

impl Announcement {
    pub fn new(version: Version, token: InstanceToken) -> Self {
        Announcement { version, token }
    }
}

/// Outcome of negotiation for the local instance
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    KeepOperating,
    Defer,
}

/// Which token wins between two instances of the same version
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TieBreak {
    #[default]
    LargerToken,
    SmallerToken,
}

impl TieBreak {
    /// Whether `local` loses against `remote`
    fn defers(self, local: InstanceToken, remote: InstanceToken) -> bool {
        match self {
            TieBreak::LargerToken => remote > local,
            TieBreak::SmallerToken => remote < local,
        }
    }
}

/// Negotiation state of the local instance
#[derive(Debug)]
pub struct Negotiator {
    local: Announcement,
    tie_break: TieBreak,
    deferred_to: Option<Announcement>,
}

impl Negotiator {
    pub fn new(local: Announcement, tie_break: TieBreak) -> Self {
        Negotiator {
            local,
            tie_break,
            deferred_to: None,
        }
    }

    /// What this instance broadcasts
    pub fn announcement(&self) -> Announcement {
        self.local
    }

    /// Process another instance's announcement
    pub fn receive(&mut self, remote: Announcement) -> Decision {
        if remote.token == self.local.token {
            tracing::trace!(target: TARGET, token = %remote.token, "ignoring own announcement");
            return self.decision();
        }
        if self.deferred_to.is_some() {
            return Decision::Defer;
        }

        let defer = match remote.version.cmp(&self.local.version) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => self.tie_break.defers(self.local.token, remote.token),
        };
        if defer {
            tracing::info!(
                target: TARGET,
                local = %self.local.version,
                remote = %remote.version,
                token = %remote.token,
                "deferring to another instance"
            );
            self.deferred_to = Some(remote);
        }
        self.decision()
    }

    pub fn decision(&self) -> Decision {
        match self.deferred_to {
            Some(_) => Decision::Defer,
            None => Decision::KeepOperating,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.deferred_to.is_none()
    }

    /// The announcement this instance deferred to, if any
    pub fn deferred_to(&self) -> Option<Announcement> {
        self.deferred_to
    }
}
