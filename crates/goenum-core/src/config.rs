use std::path::PathBuf;

use crate::error::ConfigError;

/// Everything a single generator run needs, gathered from flags and the
/// `go generate` environment (`GOFILE`, `GOLINE`, `GOPACKAGE`).
#[derive(Debug, Clone, Default)]
pub struct EnumConfig {
    pub type_name: String,
    pub file: PathBuf,
    /// Line of the `//go:generate` directive. The declaration must start on
    /// the line right after it.
    pub directive_line: usize,
    pub package_name: String,
    /// Positional overrides for the derived representations.
    pub values: Option<Vec<String>>,
    pub features: Features,
}

/// Optional code emitted alongside the plain string conversions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Features {
    /// `encoding.TextMarshaler` / `encoding.TextUnmarshaler`.
    pub text: bool,
    /// `database/sql` `Scanner` and `driver.Valuer`.
    pub sql: bool,
}

impl EnumConfig {
    /// Reject a configuration with a missing required parameter before any
    /// file is touched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.type_name.trim().is_empty() {
            return Err(ConfigError::MissingParameter("type"));
        }
        if self.file.as_os_str().is_empty() {
            return Err(ConfigError::MissingParameter("file"));
        }
        if self.package_name.trim().is_empty() {
            return Err(ConfigError::MissingParameter("package"));
        }
        if self.directive_line == 0 {
            return Err(ConfigError::InvalidLine(
                "line numbers are 1-based".to_string(),
            ));
        }
        Ok(())
    }

    /// 1-based line on which the enum's declaration block must begin.
    pub fn target_line(&self) -> usize {
        self.directive_line + 1
    }
}
