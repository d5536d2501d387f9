//! Feature toggles consulted by the engine for side effects only.
//!
//! A toggle never changes a routing outcome. It decides whether optional
//! behavior (such as emitting a "nothing found" event) runs.

use std::collections::HashMap;

/// A feature flag with its key, offline default and purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlag {
    pub key: &'static str,
    pub default_value: bool,
    pub description: &'static str,
}

/// Emit a telemetry event when a documentation search finds nothing.
pub const DOC_NOT_FOUND: FeatureFlag = FeatureFlag {
    key: "doc-not-found",
    default_value: false,
    description: "Emit a telemetry event when no documentation is found for a topic",
};

pub trait FeatureToggle: Send + Sync {
    fn is_enabled(&self, flag: &FeatureFlag) -> bool;
}

/// Toggles backed by a fixed key → value table (e.g. the `[flags]` config section).
///
/// Keys missing from the table evaluate to the flag's default.
#[derive(Debug, Clone, Default)]
pub struct StaticToggles {
    values: HashMap<String, bool>,
}

impl StaticToggles {
    pub fn new(values: HashMap<String, bool>) -> Self {
        Self { values }
    }

    pub fn with(mut self, key: impl Into<String>, enabled: bool) -> Self {
        self.values.insert(key.into(), enabled);
        self
    }
}

impl FeatureToggle for StaticToggles {
    fn is_enabled(&self, flag: &FeatureFlag) -> bool {
        self.values
            .get(flag.key)
            .copied()
            .unwrap_or(flag.default_value)
    }
}
