//! Runtime configuration.

/// Default prefix for synthetic class names.
pub const DEFAULT_SYNTHETIC_PREFIX: &str = "SwizzledWith";

/// Settings for a [`Runtime`](crate::Runtime).
///
/// ```
/// use isa_swizzle::RuntimeConfig;
///
/// let config = RuntimeConfig::default()
///     .with_synthetic_prefix("Mixin")
///     .with_prepare_on_reswizzle(true);
/// assert_eq!(config.synthetic_prefix(), "Mixin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    synthetic_prefix: String,
    prepare_on_reswizzle: bool,
}

impl RuntimeConfig {
    /// Prefix placed before the template name in synthetic class names.
    ///
    /// A synthetic class is named `<prefix><Template>_<Actual>`.
    pub fn with_synthetic_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.synthetic_prefix = prefix.into();
        self
    }

    /// Run the template's prepare hook again when an object that already
    /// carries the template's tag is swizzled.
    pub fn with_prepare_on_reswizzle(mut self, enabled: bool) -> Self {
        self.prepare_on_reswizzle = enabled;
        self
    }

    pub fn synthetic_prefix(&self) -> &str {
        &self.synthetic_prefix
    }

    pub fn prepare_on_reswizzle(&self) -> bool {
        self.prepare_on_reswizzle
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            synthetic_prefix: DEFAULT_SYNTHETIC_PREFIX.to_string(),
            prepare_on_reswizzle: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.synthetic_prefix(), "SwizzledWith");
        assert!(!config.prepare_on_reswizzle());
    }
}
