//! Exit codes for the wl-core CLI.
//!
//! Ranges:
//! - 0-2: analysis outcomes (how many groups were fitted)
//! - 10-19: user/environment errors
//! - 20-29: internal errors

use crate::analysis::BatchReport;
use crate::config::ConfigError;
use crate::input::InputError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    // Analysis outcomes
    /// Every group fitted (also used by non-analysis commands).
    AllFitted = 0,
    /// Some groups fitted, some did not.
    PartialFit = 1,
    /// No group fitted.
    NoFit = 2,

    // User / environment errors
    /// Invalid arguments.
    ArgsError = 10,
    /// Unreadable or invalid observation records.
    InputError = 11,
    /// Invalid engine configuration.
    ConfigError = 12,
    /// Config schema version mismatch.
    VersionError = 13,

    // Internal errors
    /// Bug; please report.
    InternalError = 20,
    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Outcome of an analysis batch. An empty batch fitted nothing; a
    /// panicked group is an internal error regardless of the others.
    pub fn from_report(report: &BatchReport) -> Self {
        if report.panicked() > 0 {
            ExitCode::InternalError
        } else if report.all_succeeded() {
            ExitCode::AllFitted
        } else if report.none_succeeded() {
            ExitCode::NoFit
        } else {
            ExitCode::PartialFit
        }
    }

    pub fn from_input_error(err: &InputError) -> Self {
        match err {
            InputError::Io { .. } => ExitCode::IoError,
            _ => ExitCode::InputError,
        }
    }

    pub fn from_config_error(err: &ConfigError) -> Self {
        match err {
            ConfigError::Io { .. } => ExitCode::IoError,
            ConfigError::VersionMismatch { .. } => ExitCode::VersionError,
            ConfigError::Parse { .. } | ConfigError::Validation(_) => ExitCode::ConfigError,
        }
    }

    pub fn is_outcome(self) -> bool {
        self.as_i32() < 10
    }

    pub fn is_user_error(self) -> bool {
        (10..20).contains(&self.as_i32())
    }

    pub fn is_internal_error(self) -> bool {
        self.as_i32() >= 20
    }

    /// Stable name for JSON error payloads.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::AllFitted => "OK_ALL_FITTED",
            ExitCode::PartialFit => "OK_PARTIAL_FIT",
            ExitCode::NoFit => "OK_NO_FIT",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::InputError => "ERR_INPUT",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::VersionError => "ERR_VERSION",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Analyzer, MSG_PANICKED};
    use crate::model::{AnalysisResult, CensoringCounts, GroupKey, Observation, ObservationGroup};
    use std::path::PathBuf;

    fn fitted(id: &str) -> ObservationGroup {
        ObservationGroup {
            key: GroupKey::new(id),
            observations: (1..=6).map(|i| Observation::complete(50.0 * i as f64)).collect(),
        }
    }

    fn unfit(id: &str) -> ObservationGroup {
        ObservationGroup {
            key: GroupKey::new(id),
            observations: vec![],
        }
    }

    #[test]
    fn report_outcomes() {
        let analyzer = Analyzer::default();
        let all = analyzer.analyze_batch(&[fitted("a"), fitted("b")]);
        assert_eq!(ExitCode::from_report(&all), ExitCode::AllFitted);
        let partial = analyzer.analyze_batch(&[fitted("a"), unfit("b")]);
        assert_eq!(ExitCode::from_report(&partial), ExitCode::PartialFit);
        let none = analyzer.analyze_batch(&[unfit("a")]);
        assert_eq!(ExitCode::from_report(&none), ExitCode::NoFit);
        let empty = analyzer.analyze_batch(&[]);
        assert_eq!(ExitCode::from_report(&empty), ExitCode::NoFit);
    }

    #[test]
    fn panicked_group_is_internal_error() {
        let mut report = Analyzer::default().analyze_batch(&[fitted("a")]);
        report.results.push(AnalysisResult::failed(
            GroupKey::new("b"),
            CensoringCounts::default(),
            MSG_PANICKED,
        ));
        report.total += 1;
        report.failed += 1;
        assert_eq!(report.panicked(), 1);
        assert_eq!(ExitCode::from_report(&report), ExitCode::InternalError);
        assert_eq!(ExitCode::InternalError.code_name(), "ERR_INTERNAL");
    }

    #[test]
    fn error_mapping() {
        let io = InputError::Io {
            path: PathBuf::from("x"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(ExitCode::from_input_error(&io), ExitCode::IoError);
        assert_eq!(
            ExitCode::from_input_error(&InputError::GroupNotFound("g".into())),
            ExitCode::InputError
        );
        let version = ConfigError::VersionMismatch {
            expected: "1.0.0".into(),
            actual: "2.0.0".into(),
        };
        assert_eq!(ExitCode::from_config_error(&version), ExitCode::VersionError);
    }

    #[test]
    fn ranges_and_names() {
        assert!(ExitCode::PartialFit.is_outcome());
        assert!(ExitCode::ConfigError.is_user_error());
        assert!(ExitCode::IoError.is_internal_error());
        assert_eq!(ExitCode::NoFit.to_string(), "OK_NO_FIT (2)");
        assert_eq!(i32::from(ExitCode::VersionError), 13);
    }
}
