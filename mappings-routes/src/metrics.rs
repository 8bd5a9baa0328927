use engine::metrics::increment_counter_by;

const MAPPINGS_RETRIEVED_METRIC_NAME: &str = "analysis_mappings_retrieved";
const MAPPINGS_CREATED_METRIC_NAME: &str = "analysis_mappings_created";
const ANALYSIS_TYPES_ADDED_METRIC_NAME: &str = "analysis_types_added";

#[inline]
pub fn increment_mappings_retrieved() {
    increment_mappings_retrieved_by(1);
}

#[inline]
pub fn increment_mappings_retrieved_by(amt: usize) {
    increment_counter_by(MAPPINGS_RETRIEVED_METRIC_NAME, amt);
}

#[inline]
pub fn increment_mappings_created() {
    metrics::counter!(MAPPINGS_CREATED_METRIC_NAME).increment(1);
}

#[inline]
pub fn increment_analysis_types_added() {
    metrics::counter!(ANALYSIS_TYPES_ADDED_METRIC_NAME).increment(1);
}
