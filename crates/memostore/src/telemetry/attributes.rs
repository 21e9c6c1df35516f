// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Field names used on repository events, checked against what `emit` writes.

pub(crate) const REPOSITORY_NAME: &str = "repository.name";
pub(crate) const REPOSITORY_OPERATION: &str = "repository.operation";
pub(crate) const REPOSITORY_ACTIVITY: &str = "repository.activity";
pub(crate) const REPOSITORY_COUNT: &str = "repository.count";
pub(crate) const REPOSITORY_ERROR: &str = "repository.error";
pub(crate) const REPOSITORY_EVENT: &str = "repository.event";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::testing::LogCapture;
    use crate::telemetry::{Activity, Operation, emit};

    #[test]
    fn attribute_names_match_tracing_fields() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());

        emit(
            "names",
            Operation::Remove,
            Activity::Removed,
            Some(1),
            Some(&crate::Error::store("boom")),
        );

        let output = capture.output();
        for name in [
            REPOSITORY_NAME,
            REPOSITORY_OPERATION,
            REPOSITORY_ACTIVITY,
            REPOSITORY_COUNT,
            REPOSITORY_ERROR,
        ] {
            assert!(output.contains(&format!("{name}=")), "field {name} missing from:\n{output}");
        }
        assert!(output.contains(REPOSITORY_EVENT));
    }
}
