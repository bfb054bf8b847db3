//! Bridge configuration.
//!
//! # Presets
//!
//! | Preset | Overload policy |
//! |--------|-----------------|
//! | [`BridgeConfig::strict()`] (default) | [`OverloadPolicy::Strict`] |
//! | [`BridgeConfig::lenient()`] | [`OverloadPolicy::FirstMatch`] |

use strum::Display;

/// How one overload is chosen when several structurally match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum OverloadPolicy {
    /// More than one matching overload is an [`crate::Error::AmbiguousMatch`].
    #[default]
    Strict,
    /// The first matching overload in declaration order wins. Deterministic for a given archive,
    /// but the choice is invisible to the caller.
    FirstMatch,
}

/// Settings of a bridging session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BridgeConfig {
    /// Overload selection for constructors and methods.
    ///
    /// Default: [`OverloadPolicy::Strict`]
    pub overload_policy: OverloadPolicy,
}

impl BridgeConfig {
    /// Rejects ambiguous overloads. This is the default.
    #[must_use]
    pub fn strict() -> Self {
        BridgeConfig {
            overload_policy: OverloadPolicy::Strict,
        }
    }

    /// Takes the first matching overload in declaration order.
    #[must_use]
    pub fn lenient() -> Self {
        BridgeConfig {
            overload_policy: OverloadPolicy::FirstMatch,
        }
    }

    /// Replaces the overload policy.
    #[must_use]
    pub fn with_overload_policy(mut self, policy: OverloadPolicy) -> Self {
        self.overload_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(BridgeConfig::default(), BridgeConfig::strict());
        assert_eq!(BridgeConfig::lenient().overload_policy, OverloadPolicy::FirstMatch);
        assert_eq!(
            BridgeConfig::strict().with_overload_policy(OverloadPolicy::FirstMatch),
            BridgeConfig::lenient()
        );
    }

    #[test]
    fn test_policy_display() {
        assert_eq!(OverloadPolicy::Strict.to_string(), "Strict");
        assert_eq!(OverloadPolicy::FirstMatch.to_string(), "FirstMatch");
    }
}
