use crate::headers::UnknownField;

use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Executable,
    Timeout,
    Tau550(f64),
    Albedo(f64),
    Label(String),
    Field(UnknownField),
    SmartsDir,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error: {}", e),
            ConfigError::Json(e) => write!(f, "Failed to parse JSON: {}", e),
            ConfigError::Executable => write!(f, "executable cannot be empty"),
            ConfigError::Timeout => write!(f, "timeout_secs should be greater than 0"),
            ConfigError::Tau550(v) => write!(f, "tau550 should be >= 0, got {}", v),
            ConfigError::Albedo(v) => write!(f, "albedo should be between 0 and 1, got {}", v),
            ConfigError::Label(label) => write!(
                f,
                "'{}' cannot be used as a SMARTS label, it must be non-empty without spaces or quotes",
                label
            ),
            ConfigError::Field(e) => write!(f, "extra_aliases: {}", e),
            ConfigError::SmartsDir => {
                write!(f, "no SMARTS directory given, use --smarts-dir or a config file")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> ConfigError {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> ConfigError {
        ConfigError::Json(err)
    }
}

impl From<UnknownField> for ConfigError {
    fn from(err: UnknownField) -> ConfigError {
        ConfigError::Field(err)
    }
}
