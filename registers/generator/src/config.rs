// Licensed under the Apache-2.0 license

//! Configuration for output generation.
//!
//! [`RenderConfig`] carries the options of a single run that only the
//! writers care about: the project name stamped into generated files and an
//! optional override of the output type otherwise taken from the output
//! file extension.

/// Project text used when none is configured.
pub const DEFAULT_PROJECT: &str = "<PROJECT>";

/// Configuration for output writers.
///
/// # Example
///
/// ```
/// use registers_generator::config::RenderConfig;
///
/// let config = RenderConfig::new()
///     .project("soc")
///     .output_type("h");
/// assert_eq!(config.project, "soc");
/// assert_eq!(config.output_type.as_deref(), Some("h"));
/// ```
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Project name written into file banners.
    pub project: String,

    /// Output type to use instead of the output file extension.
    pub output_type: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            project: DEFAULT_PROJECT.to_string(),
            output_type: None,
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the project name.
    pub fn project(mut self, project: &str) -> Self {
        self.project = project.to_string();
        self
    }

    /// Force the output type, e.g. `h` or `asym`.
    pub fn output_type(mut self, output_type: &str) -> Self {
        self.output_type = Some(output_type.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::new();
        assert_eq!(config.project, DEFAULT_PROJECT);
        assert!(config.output_type.is_none());
    }
}
