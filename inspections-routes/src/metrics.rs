use engine::metrics::increment_counter_by;
use inspections_core::model::WorkflowStatus;

const INSPECTION_DATA_RETRIEVED_METRIC_NAME: &str = "inspection_data_retrieved";
const WORKFLOW_STATUS_RESOLVED_METRIC_NAME: &str = "workflow_status_resolved";

#[inline]
pub fn increment_inspection_data_retrieved() {
    increment_inspection_data_retrieved_by(1);
}

#[inline]
pub fn increment_inspection_data_retrieved_by(amt: usize) {
    increment_counter_by(INSPECTION_DATA_RETRIEVED_METRIC_NAME, amt);
}

pub fn increment_workflow_status_resolved(status: &WorkflowStatus) {
    // unrecognized statuses share one label so a misbehaving pipeline can't grow the label set
    let status = match status {
        WorkflowStatus::Unrecognized(_) => "Unrecognized",
        known => known.as_str(),
    };
    metrics::counter!(WORKFLOW_STATUS_RESOLVED_METRIC_NAME, "status" => status.to_owned())
        .increment(1);
}
