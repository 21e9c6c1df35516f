// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Structured logging for repository activity.
//!
//! Every repository operation emits a `tracing` event named
//! `repository.event` carrying the repository name, the operation, and what
//! happened. Failures are additionally routed to the diagnostic hook
//! configured on the builder.

use std::fmt;
use std::sync::Arc;

use crate::Error;

#[cfg(test)]
pub(crate) mod attributes;
#[cfg(test)]
pub(crate) mod testing;

/// Type alias for repository names used in telemetry.
pub type RepositoryName = &'static str;

#[derive(Debug, Clone, Copy)]
pub(crate) enum Operation {
    Get,
    Contains,
    Remove,
    Clear,
    Trim,
    IsValid,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "repository.get",
            Self::Contains => "repository.contains",
            Self::Remove => "repository.remove",
            Self::Clear => "repository.clear",
            Self::Trim => "repository.trim",
            Self::IsValid => "repository.is_valid",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Activity {
    Hit,
    Miss,
    Stale,
    Computed,
    Failed,
    Removed,
    Cleared,
    Trimmed,
}

impl Activity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "repository.hit",
            Self::Miss => "repository.miss",
            Self::Stale => "repository.stale",
            Self::Computed => "repository.computed",
            Self::Failed => "repository.failed",
            Self::Removed => "repository.removed",
            Self::Cleared => "repository.cleared",
            Self::Trimmed => "repository.trimmed",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Self::Hit | Self::Miss | Self::Computed => Severity::Debug,
            Self::Stale | Self::Removed | Self::Cleared | Self::Trimmed => Severity::Info,
            Self::Failed => Severity::Warn,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Severity {
    Debug,
    Info,
    Warn,
}

/// Emits one repository event.
///
/// `count` is set for bulk operations; `error` only for failures.
pub(crate) fn emit(name: RepositoryName, operation: Operation, activity: Activity, count: Option<usize>, error: Option<&Error>) {
    let op = operation.as_str();
    let act = activity.as_str();
    let error = error.map(tracing::field::display);

    // Tracing level must be constant, so we use a macro to select the appropriate level.
    // Field names must match constants in attributes.rs - see attribute_names_match_tracing_fields test.
    macro_rules! emit_event {
        ($level:ident) => {
            tracing::$level!(
                repository.name = name,
                repository.operation = op,
                repository.activity = act,
                repository.count = count,
                repository.error = error,
                "repository.event"
            )
        };
    }

    match activity.severity() {
        Severity::Warn => emit_event!(warn),
        Severity::Info => emit_event!(info),
        Severity::Debug => emit_event!(debug),
    }
}

type Hook = dyn Fn(&str) + Send + Sync;

/// The optional callback receiving one message per internal failure.
#[derive(Clone, Default)]
pub(crate) struct Diagnostics {
    hook: Option<Arc<Hook>>,
}

impl Diagnostics {
    pub fn new(hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self {
            hook: Some(Arc::new(hook)),
        }
    }

    /// Logs the failure and hands `"<subject>: <error>"` to the hook, if any.
    pub fn report(&self, name: RepositoryName, operation: Operation, subject: impl fmt::Display, error: &Error) {
        emit(name, operation, Activity::Failed, None, Some(error));

        if let Some(hook) = &self.hook {
            hook(&format!("{subject}: {error}"));
        }
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics").field("hook", &self.hook.is_some()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::testing::LogCapture;
    use super::*;

    #[test]
    fn operation_as_str() {
        assert_eq!(Operation::Get.as_str(), "repository.get");
        assert_eq!(Operation::Contains.as_str(), "repository.contains");
        assert_eq!(Operation::Remove.as_str(), "repository.remove");
        assert_eq!(Operation::Clear.as_str(), "repository.clear");
        assert_eq!(Operation::Trim.as_str(), "repository.trim");
        assert_eq!(Operation::IsValid.as_str(), "repository.is_valid");
    }

    #[test]
    fn activity_severity() {
        assert_eq!(Activity::Hit.severity(), Severity::Debug);
        assert_eq!(Activity::Miss.severity(), Severity::Debug);
        assert_eq!(Activity::Computed.severity(), Severity::Debug);
        assert_eq!(Activity::Stale.severity(), Severity::Info);
        assert_eq!(Activity::Removed.severity(), Severity::Info);
        assert_eq!(Activity::Cleared.severity(), Severity::Info);
        assert_eq!(Activity::Trimmed.severity(), Severity::Info);
        assert_eq!(Activity::Failed.severity(), Severity::Warn);
    }

    #[test]
    fn emit_contains_all_fields_and_values() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());

        emit("my_repository", Operation::Trim, Activity::Trimmed, Some(3), None);

        capture.assert_contains(attributes::REPOSITORY_NAME);
        capture.assert_contains(attributes::REPOSITORY_OPERATION);
        capture.assert_contains(attributes::REPOSITORY_ACTIVITY);
        capture.assert_contains(attributes::REPOSITORY_COUNT);
        capture.assert_contains(attributes::REPOSITORY_EVENT);

        capture.assert_contains("my_repository");
        capture.assert_contains(Operation::Trim.as_str());
        capture.assert_contains(Activity::Trimmed.as_str());
    }

    #[test]
    fn emit_at_correct_severity_levels() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());
        emit("repository", Operation::Get, Activity::Failed, None, None);
        capture.assert_contains("WARN");

        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());
        emit("repository", Operation::Get, Activity::Stale, None, None);
        capture.assert_contains("INFO");

        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());
        emit("repository", Operation::Get, Activity::Hit, None, None);
        capture.assert_contains("DEBUG");
    }

    #[test]
    fn report_logs_and_calls_hook() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());

        let messages = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&messages);
        let diagnostics = Diagnostics::new(move |message| sink.lock().unwrap().push(message.to_string()));

        diagnostics.report("repository", Operation::Get, format_args!("{:?}", 42), &Error::store("disk gone"));

        capture.assert_contains(attributes::REPOSITORY_ERROR);
        capture.assert_contains("disk gone");
        let messages = messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("42: store failure"), "got: {}", messages[0]);
    }

    #[test]
    fn report_without_hook_only_logs() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());

        Diagnostics::default().report("repository", Operation::Clear, "keys", &Error::store("locked"));

        capture.assert_contains(Activity::Failed.as_str());
        assert!(format!("{:?}", Diagnostics::default()).contains("false"));
    }
}
