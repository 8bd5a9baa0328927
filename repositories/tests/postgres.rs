use chrono::Utc;
use engine::PageWindow;
use inspections_core::InspectionRepository;
use inspections_core::analysis::{Analysis, AnalysisResult, AnalysisStatus, Confidence};
use inspections_core::model::{
    BlobStorageLocation, InspectionDataId, InspectionId, NewInspectionData, WorkflowStatus,
};
use mappings_core::model::{AnalysisType, MappingId, NewMapping};
use mappings_core::{AddAnalysisTypeResult, MappingRepository};
use repositories::postgres::ConnectionDetails;
use repositories::postgres::initializer::RepoCreator;
use repositories::postgres::inspections::InspectionRepo;
use repositories::postgres::mappings::MappingRepo;
use rstest::{fixture, rstest};
use testcontainers_modules::{
    postgres::Postgres,
    testcontainers::{ContainerAsync, runners::AsyncRunner},
};

struct TestRuntime {
    _container: ContainerAsync<Postgres>,
    mappings: MappingRepo,
    inspections: InspectionRepo,
}

#[fixture]
async fn runtime() -> TestRuntime {
    let container = Postgres::default()
        .with_db_name("ida")
        .with_user("testuser")
        .with_password("testpass")
        .start()
        .await
        .unwrap();
    let host = container.get_host().await.unwrap();
    let port = container.get_host_port_ipv4(5432).await.unwrap();

    let (mappings, inspections) = RepoCreator::default()
        .with_mappings()
        .with_inspections()
        .create(
            ConnectionDetails::Url(format!(
                "postgresql://testuser:testpass@{host}:{port}/ida"
            )),
            Some(4),
        )
        .await
        .unwrap();

    TestRuntime {
        _container: container,
        mappings,
        inspections,
    }
}

fn new_mapping(tag_id: &str, analysis_type: Option<AnalysisType>) -> NewMapping {
    NewMapping::new(tag_id.into(), "inspect the riser".into(), analysis_type).unwrap()
}

fn location(container: &str, name: &str) -> BlobStorageLocation {
    BlobStorageLocation {
        storage_account: "idastorage".into(),
        blob_container: container.into(),
        blob_name: name.into(),
    }
}

fn new_inspection_data(inspection_id: &str, status: WorkflowStatus) -> NewInspectionData {
    NewInspectionData {
        inspection_id: InspectionId::new(inspection_id),
        installation_code: "HUA".into(),
        raw_data_blob_storage_location: location("raw", "video.mp4"),
        anonymized_blob_storage_location: location("anonymized", "video.mp4"),
        anonymizer_workflow_status: status,
        analyses: vec![Analysis {
            id: "analysis-1".into(),
            uri: "https://analysis.example.com/analysis-1".into(),
            source_path: location("raw", "video.mp4"),
            destination_path: location("anonymized", "video.mp4"),
            date_created: Utc::now(),
            analysis_type: AnalysisType::Anonymize,
            status: AnalysisStatus::Completed,
            result: Some(AnalysisResult {
                id: "result-1".into(),
                result_type: "faces".into(),
                value: "2".into(),
                confidence: Some(Confidence::new(93).unwrap()),
            }),
        }],
    }
}

#[rstest]
#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn get_missing_mapping_returns_none(#[future] runtime: TestRuntime) {
    let runtime = runtime.await;

    let found = runtime.mappings.get(MappingId::new("missing")).await.unwrap();

    assert!(found.is_none());
}

#[rstest]
#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn create_then_get_returns_created_mapping(#[future] runtime: TestRuntime) {
    let runtime = runtime.await;

    let created = runtime
        .mappings
        .create(new_mapping("tag-1", Some(AnalysisType::Anonymize)))
        .await
        .unwrap();
    let found = runtime.mappings.get(created.id.clone()).await.unwrap();

    assert_eq!(Some(created), found);
}

#[rstest]
#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn list_pages_in_insertion_order(#[future] runtime: TestRuntime) {
    let runtime = runtime.await;
    for i in 0..5 {
        runtime
            .mappings
            .create(new_mapping(&format!("tag-{i}"), None))
            .await
            .unwrap();
    }

    let page = runtime
        .mappings
        .list(PageWindow::new(2, 2).unwrap())
        .await
        .unwrap();

    let tags = page.iter().map(|m| m.tag_id.as_str()).collect::<Vec<_>>();
    assert_eq!(vec!["tag-2", "tag-3"], tags);
    assert_eq!(5, runtime.mappings.count().await.unwrap());
}

#[rstest]
#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn add_type_is_persisted_once(#[future] runtime: TestRuntime) {
    let runtime = runtime.await;
    let created = runtime
        .mappings
        .create(new_mapping("tag-1", None))
        .await
        .unwrap();

    let first = runtime
        .mappings
        .add_analysis_type(created.id.clone(), AnalysisType::Anonymize)
        .await
        .unwrap();
    let second = runtime
        .mappings
        .add_analysis_type(created.id.clone(), AnalysisType::Anonymize)
        .await
        .unwrap();

    let AddAnalysisTypeResult::Added(updated) = first else {
        panic!("expected the type to be added, got {first:?}");
    };
    assert_eq!(AddAnalysisTypeResult::AlreadyPresent(updated.clone()), second);
    assert_eq!(Some(updated), runtime.mappings.get(created.id).await.unwrap());
}

#[rstest]
#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn add_type_to_missing_mapping_is_not_found(#[future] runtime: TestRuntime) {
    let runtime = runtime.await;

    let result = runtime
        .mappings
        .add_analysis_type(MappingId::new("missing"), AnalysisType::Anonymize)
        .await
        .unwrap();

    assert_eq!(AddAnalysisTypeResult::MappingNotFound, result);
}

#[rstest]
#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn concurrent_adds_only_add_once(#[future] runtime: TestRuntime) {
    let runtime = runtime.await;
    let created = runtime
        .mappings
        .create(new_mapping("tag-1", None))
        .await
        .unwrap();

    let handles = (0..8)
        .map(|_| {
            let repo = runtime.mappings.clone();
            let id = created.id.clone();
            tokio::spawn(async move { repo.add_analysis_type(id, AnalysisType::Anonymize).await })
        })
        .collect::<Vec<_>>();

    let mut added = 0;
    for handle in handles {
        if let AddAnalysisTypeResult::Added(_) = handle.await.unwrap().unwrap() {
            added += 1;
        }
    }

    assert_eq!(1, added);
}

#[rstest]
#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn inserted_inspection_data_round_trips(#[future] runtime: TestRuntime) {
    let runtime = runtime.await;

    let inserted = runtime
        .inspections
        .insert(new_inspection_data("insp-1", WorkflowStatus::ExitSuccess))
        .await
        .unwrap();

    let by_id = runtime.inspections.get(inserted.id.clone()).await.unwrap();
    let by_inspection = runtime
        .inspections
        .get_by_inspection_id(InspectionId::new("insp-1"))
        .await
        .unwrap();

    let found = by_id.expect("inserted data exists");
    assert_eq!(inserted.inspection_id, found.inspection_id);
    assert_eq!(inserted.analyses.len(), found.analyses.len());
    assert_eq!(
        Some(Confidence::new(93).unwrap()),
        found.analyses[0].result.as_ref().and_then(|r| r.confidence)
    );
    assert_eq!(Some(found), by_inspection);
}

#[rstest]
#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn unrecognized_status_is_kept(#[future] runtime: TestRuntime) {
    let runtime = runtime.await;

    let inserted = runtime
        .inspections
        .insert(new_inspection_data(
            "insp-2",
            WorkflowStatus::Unrecognized("Paused".into()),
        ))
        .await
        .unwrap();

    assert_eq!(
        WorkflowStatus::Unrecognized("Paused".into()),
        inserted.anonymizer_workflow_status
    );
}

#[rstest]
#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn missing_inspection_data_returns_none(#[future] runtime: TestRuntime) {
    let runtime = runtime.await;

    assert!(
        runtime
            .inspections
            .get(InspectionDataId::new("missing"))
            .await
            .unwrap()
            .is_none()
    );
    assert_eq!(0, runtime.inspections.count().await.unwrap());
}
