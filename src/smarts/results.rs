use log::info;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::RunError;

pub const RESULT_COLUMN: &str = "SMARTSirr";

/// Outcome of one SMARTS run: an irradiance (W/m2, as printed) or a sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultCode {
    Irradiance(String),
    MissingInput,
    Nighttime,
    Turbidity,
    Unclassified,
    TimedOut,
}

impl ResultCode {
    pub fn sentinel(&self) -> Option<i32> {
        match self {
            ResultCode::Irradiance(_) => None,
            ResultCode::MissingInput => Some(-1),
            ResultCode::Nighttime => Some(-2),
            ResultCode::Turbidity => Some(-3),
            ResultCode::Unclassified => Some(-4),
            ResultCode::TimedOut => Some(-5),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResultCode::Irradiance(_))
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, self.sentinel()) {
            (ResultCode::Irradiance(value), _) => write!(f, "{}", value),
            (_, Some(code)) => write!(f, "{}", code),
            (_, None) => Ok(()),
        }
    }
}

#[derive(Serialize)]
struct ResultRow {
    #[serde(rename = "SMARTSirr")]
    value: String,
}

/// Writes the single-column result table, one line per row in run order.
pub fn write_results<P: AsRef<Path>>(results: &[ResultCode], path: P) -> Result<(), RunError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    if results.is_empty() {
        writer.write_record([RESULT_COLUMN])?;
    }
    for code in results {
        writer.serialize(ResultRow {
            value: code.to_string(),
        })?;
    }
    writer.flush()?;

    info!("wrote {} results to {}", results.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_display() {
        assert_eq!(ResultCode::Irradiance("886.37".into()).to_string(), "886.37");
        assert_eq!(ResultCode::MissingInput.to_string(), "-1");
        assert_eq!(ResultCode::Nighttime.to_string(), "-2");
        assert_eq!(ResultCode::Turbidity.to_string(), "-3");
        assert_eq!(ResultCode::Unclassified.to_string(), "-4");
        assert_eq!(ResultCode::TimedOut.to_string(), "-5");
    }

    #[test]
    fn test_write_results() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("results.csv");
        let results = vec![
            ResultCode::MissingInput,
            ResultCode::Irradiance("886.37".into()),
            ResultCode::Nighttime,
        ];

        write_results(&results, &path).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "SMARTSirr\n-1\n886.37\n-2\n"
        );
    }

    #[test]
    fn test_write_empty_results_keeps_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");

        write_results(&[], &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "SMARTSirr\n");
    }
}
