use engine::PageWindow;
use error_stack::Report;
use indexmap::IndexMap;
use inspections_core::InspectionRepository;
use inspections_core::model::{InspectionData, InspectionDataId, InspectionId, NewInspectionData};
use inspections_core::result::{
    InspectionRepoError, OptRepoResult as OptInspectionResult, RepoResult as InspectionResult,
};
use mappings_core::model::{AnalysisMapping, AnalysisType, MappingId, NewMapping};
use mappings_core::result::{OptRepoResult, RepoResult};
use mappings_core::{AddAnalysisTypeResult, MappingRepository};
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

fn new_id() -> String {
    Uuid::now_v7().to_string()
}

fn window<K: Hash + Eq, V: Clone>(db: &IndexMap<K, V>, page: PageWindow) -> Vec<V> {
    db.values()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct MemoryMappingRepo {
    db: Arc<RwLock<IndexMap<MappingId, AnalysisMapping>>>,
}

impl MemoryMappingRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MappingRepository for MemoryMappingRepo {
    async fn get(&self, id: MappingId) -> OptRepoResult<AnalysisMapping> {
        let db = self.db.read().await;

        Ok(db.get(&id).cloned())
    }

    async fn count(&self) -> RepoResult<u64> {
        Ok(self.db.read().await.len() as u64)
    }

    async fn list(&self, page: PageWindow) -> RepoResult<Vec<AnalysisMapping>> {
        let db = self.db.read().await;

        Ok(window(&db, page))
    }

    async fn create(&self, new_mapping: NewMapping) -> RepoResult<AnalysisMapping> {
        let mapping = AnalysisMapping::create(MappingId::new(new_id()), new_mapping);
        let mut db = self.db.write().await;

        db.insert(mapping.id.clone(), mapping.clone());
        Ok(mapping)
    }

    async fn add_analysis_type(
        &self,
        id: MappingId,
        analysis_type: AnalysisType,
    ) -> RepoResult<AddAnalysisTypeResult> {
        // the write lock is held from the read through the update
        let mut db = self.db.write().await;
        let Some(mapping) = db.get_mut(&id) else {
            return Ok(AddAnalysisTypeResult::MappingNotFound);
        };

        if mapping.add_analysis(analysis_type) {
            Ok(AddAnalysisTypeResult::Added(mapping.clone()))
        } else {
            Ok(AddAnalysisTypeResult::AlreadyPresent(mapping.clone()))
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryInspectionRepo {
    db: Arc<RwLock<IndexMap<InspectionDataId, InspectionData>>>,
}

impl MemoryInspectionRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InspectionRepository for MemoryInspectionRepo {
    async fn get(&self, id: InspectionDataId) -> OptInspectionResult<InspectionData> {
        let db = self.db.read().await;

        Ok(db.get(&id).cloned())
    }

    async fn get_by_inspection_id(
        &self,
        inspection_id: InspectionId,
    ) -> OptInspectionResult<InspectionData> {
        let db = self.db.read().await;

        Ok(db
            .values()
            .find(|data| data.inspection_id == inspection_id)
            .cloned())
    }

    async fn count(&self) -> InspectionResult<u64> {
        Ok(self.db.read().await.len() as u64)
    }

    async fn list(&self, page: PageWindow) -> InspectionResult<Vec<InspectionData>> {
        let db = self.db.read().await;

        Ok(window(&db, page))
    }

    async fn insert(&self, new_data: NewInspectionData) -> InspectionResult<InspectionData> {
        let mut db = self.db.write().await;

        // inspection ids are unique, same as the postgres constraint
        if db.values().any(|data| data.inspection_id == new_data.inspection_id) {
            return Err(Report::new(InspectionRepoError::Insert).attach(format!(
                "inspection data already exists for inspection {}",
                new_data.inspection_id
            )));
        }

        let data = InspectionData::create(InspectionDataId::new(new_id()), new_data);
        db.insert(data.id.clone(), data.clone());
        Ok(data)
    }
}
