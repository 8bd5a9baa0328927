use crate::service::InspectionService;
use axum::extract::FromRef;
use inspections_core::InspectionEngine;

#[derive(Clone)]
pub struct InspectionAppState<T: InspectionEngine> {
    pub service: InspectionService<T>,
}

impl<T: InspectionEngine> InspectionAppState<T> {
    pub fn new(engine: T) -> Self {
        Self {
            service: InspectionService::new(engine),
        }
    }
}

impl<T: InspectionEngine> FromRef<InspectionAppState<T>> for InspectionService<T> {
    fn from_ref(input: &InspectionAppState<T>) -> Self {
        input.service.clone()
    }
}
