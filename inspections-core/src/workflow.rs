use crate::model::{BlobStorageLocation, InspectionData, WorkflowStatus};
use tracing::{error, info, warn};

pub const NOT_STARTED_MESSAGE: &str = "Anonymization workflow has not started.";
pub const IN_PROGRESS_MESSAGE: &str = "Anonymization workflow is in progress.";
pub const FAILED_MESSAGE: &str = "Anonymization workflow failed.";
pub const UNKNOWN_STATUS_MESSAGE: &str = "Unknown workflow status.";

/// What a caller asking for the anonymized data should be told.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    /// Anonymization finished, the data is at this location.
    Completed(BlobStorageLocation),
    /// Anonymization hasn't finished yet.
    Accepted(&'static str),
    /// Anonymization ran and failed, the data will never be available.
    Unprocessable(&'static str),
    /// The pipeline reported a status this service doesn't understand.
    UnknownStatus(&'static str),
}

/// Decides what `record`'s anonymizer workflow status means for a caller.
///
/// Doesn't touch any state. A completed workflow is written to the `audit` log target along
/// with the full record.
pub fn resolve(record: &InspectionData) -> WorkflowOutcome {
    match &record.anonymizer_workflow_status {
        WorkflowStatus::ExitSuccess => {
            audit_completed(record);
            WorkflowOutcome::Completed(record.anonymized_blob_storage_location.clone())
        }
        WorkflowStatus::NotStarted => WorkflowOutcome::Accepted(NOT_STARTED_MESSAGE),
        WorkflowStatus::Started => WorkflowOutcome::Accepted(IN_PROGRESS_MESSAGE),
        WorkflowStatus::ExitFailure => WorkflowOutcome::Unprocessable(FAILED_MESSAGE),
        WorkflowStatus::Unrecognized(status) => {
            error!(
                inspection_id = %record.inspection_id,
                status = %status,
                "anonymizer workflow status is not recognized, the anonymization pipeline may be a newer version than this service"
            );
            WorkflowOutcome::UnknownStatus(UNKNOWN_STATUS_MESSAGE)
        }
    }
}

fn audit_completed(record: &InspectionData) {
    match serde_json::to_string_pretty(record) {
        Ok(json) => info!(
            target: "audit",
            inspection_id = %record.inspection_id,
            "full inspection data for inspection {}: {json}",
            record.inspection_id
        ),
        Err(e) => warn!(
            target: "audit",
            inspection_id = %record.inspection_id,
            "could not serialize inspection data for audit: {e}"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InspectionDataId, InspectionId, NewInspectionData};
    use rstest::rstest;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Runs `resolve` under a subscriber that writes to a buffer and returns what was logged.
    fn logged_while_resolving(data: &InspectionData) -> String {
        let buffer = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || resolve(data));

        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    fn location(container: &str) -> BlobStorageLocation {
        BlobStorageLocation {
            storage_account: "account".into(),
            blob_container: container.into(),
            blob_name: "inspection-1.mp4".into(),
        }
    }

    fn record(status: WorkflowStatus) -> InspectionData {
        InspectionData::create(
            InspectionDataId::new("data-1"),
            NewInspectionData {
                inspection_id: InspectionId::new("inspection-1"),
                installation_code: "NLS".into(),
                raw_data_blob_storage_location: location("raw"),
                anonymized_blob_storage_location: location("anonymized"),
                anonymizer_workflow_status: status,
                analyses: vec![],
            },
        )
    }

    #[test]
    fn exit_success_returns_anonymized_location() {
        let outcome = resolve(&record(WorkflowStatus::ExitSuccess));

        assert_eq!(WorkflowOutcome::Completed(location("anonymized")), outcome);
    }

    #[rstest]
    #[case::not_started(WorkflowStatus::NotStarted, WorkflowOutcome::Accepted(NOT_STARTED_MESSAGE))]
    #[case::started(WorkflowStatus::Started, WorkflowOutcome::Accepted(IN_PROGRESS_MESSAGE))]
    #[case::exit_failure(WorkflowStatus::ExitFailure, WorkflowOutcome::Unprocessable(FAILED_MESSAGE))]
    #[case::unrecognized(
        WorkflowStatus::Unrecognized("Cancelled".into()),
        WorkflowOutcome::UnknownStatus(UNKNOWN_STATUS_MESSAGE)
    )]
    fn unfinished_workflows_return_a_message(
        #[case] status: WorkflowStatus,
        #[case] expected: WorkflowOutcome,
    ) {
        assert_eq!(expected, resolve(&record(status)));
    }

    #[test]
    fn exit_success_writes_the_record_to_the_audit_log() {
        let logged = logged_while_resolving(&record(WorkflowStatus::ExitSuccess));

        assert_eq!(1, logged.matches(" audit: ").count(), "{logged}");
        assert!(logged.contains("\"inspection_id\": \"inspection-1\""), "{logged}");
        assert!(logged.contains("\"installation_code\": \"NLS\""), "{logged}");
        assert!(logged.contains("\"blob_container\": \"anonymized\""), "{logged}");
    }

    #[rstest]
    #[case::not_started(WorkflowStatus::NotStarted)]
    #[case::started(WorkflowStatus::Started)]
    #[case::exit_failure(WorkflowStatus::ExitFailure)]
    #[case::unrecognized(WorkflowStatus::Unrecognized("Cancelled".into()))]
    fn unfinished_workflows_are_not_audited(#[case] status: WorkflowStatus) {
        let logged = logged_while_resolving(&record(status));

        assert!(!logged.contains(" audit: "), "{logged}");
    }

    #[test]
    fn resolve_does_not_change_the_record() {
        let data = record(WorkflowStatus::ExitSuccess);
        let before = data.clone();

        let _ = resolve(&data);

        assert_eq!(before, data);
    }
}
