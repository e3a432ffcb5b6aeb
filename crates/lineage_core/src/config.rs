//! Load-cycle configuration.
//!
//! # Responsibility
//! - Collect the policies and presentation settings of one load-and-render cycle.
//! - Parse user-facing setting names into typed values.

use crate::hierarchy::policy::{BuildOptions, CyclePolicy, MultiParentPolicy, PolicyParseError};
use crate::ingest::report::ParseMode;
use crate::render::{Canvas, OutputFormat, RenderError, Viewport};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Settings for one load cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineageConfig {
    pub parse_mode: ParseMode,
    pub build: BuildOptions,
    pub canvas: Canvas,
    pub viewport: Viewport,
    pub output_format: OutputFormat,
}

impl LineageConfig {
    pub fn with_parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = mode;
        self
    }

    pub fn with_cycles(mut self, policy: CyclePolicy) -> Self {
        self.build.cycles = policy;
        self
    }

    /// Sets the virtual-root label; blank labels keep the current one.
    pub fn with_root_label(mut self, label: &str) -> Self {
        let trimmed = label.trim();
        if !trimmed.is_empty() {
            self.build.root_label = trimmed.to_string();
        }
        self
    }

    pub fn with_canvas(mut self, canvas: Canvas) -> Self {
        self.canvas = canvas;
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Applies named settings as written on a command line or in the environment.
    ///
    /// # Errors
    /// - Returns [`ConfigError`] naming the first setting that does not parse.
    pub fn apply_named(
        mut self,
        multi_parent: Option<&str>,
        cycles: Option<&str>,
        format: Option<&str>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = multi_parent {
            self.build.multi_parent = MultiParentPolicy::parse(value)?;
        }
        if let Some(value) = cycles {
            self.build.cycles = CyclePolicy::parse(value)?;
        }
        if let Some(value) = format {
            self.output_format = OutputFormat::parse(value).map_err(|err| match err {
                RenderError::UnsupportedFormat(value) => ConfigError::UnsupportedFormat(value),
                other => ConfigError::UnsupportedFormat(other.to_string()),
            })?;
        }
        Ok(self)
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Policy(PolicyParseError),
    UnsupportedFormat(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Policy(err) => write!(f, "{err}"),
            Self::UnsupportedFormat(value) => {
                write!(f, "unsupported output format `{value}`; expected svg|text|json")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Policy(err) => Some(err),
            Self::UnsupportedFormat(_) => None,
        }
    }
}

impl From<PolicyParseError> for ConfigError {
    fn from(value: PolicyParseError) -> Self {
        Self::Policy(value)
    }
}
