use crate::service::MappingService;
use axum::extract::FromRef;
use mappings_core::MappingEngine;

#[derive(Clone)]
pub struct MappingAppState<T: MappingEngine> {
    pub service: MappingService<T>,
}

impl<T: MappingEngine> MappingAppState<T> {
    pub fn new(engine: T) -> Self {
        Self {
            service: MappingService::new(engine),
        }
    }
}

impl<T: MappingEngine> FromRef<MappingAppState<T>> for MappingService<T> {
    fn from_ref(input: &MappingAppState<T>) -> Self {
        input.service.clone()
    }
}
