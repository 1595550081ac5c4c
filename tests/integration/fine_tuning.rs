//! Upload, job submission and polling

use super::*;
use integrations_azure_finetune::errors::FineTuneError;
use integrations_azure_finetune::services::files::FilePurpose;
use integrations_azure_finetune::services::fine_tuning::{
    FineTuningJobRequest, FineTuningJobStatus, PollConfig,
};
use serde_json::json;
use std::io::Write;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, body_string_contains};

fn job_body(status: &str, fine_tuned_model: Option<&str>) -> serde_json::Value {
    json!({
        "id": "ftjob-integration",
        "object": "fine_tuning.job",
        "created_at": 1700000000,
        "model": "gpt-35-turbo-0613",
        "fine_tuned_model": fine_tuned_model,
        "status": status,
        "training_file": "file-train",
        "validation_file": "file-valid",
        "seed": 105
    })
}

fn file_body(id: &str, filename: &str) -> serde_json::Value {
    json!({
        "id": id,
        "object": "file",
        "bytes": 42,
        "created_at": 1700000000,
        "filename": filename,
        "purpose": "fine-tune",
        "status": "processed"
    })
}

#[tokio::test]
async fn test_upload_submit_and_poll_to_success() {
    let mock_server = setup_mock_server().await;

    data_plane_mock("POST", "/files")
        .and(body_string_contains("training_set.jsonl"))
        .and(body_string_contains("fine-tune"))
        .respond_with(success_response(file_body("file-train", "training_set.jsonl")))
        .expect(1)
        .mount(&mock_server)
        .await;

    data_plane_mock("POST", "/fine_tuning/jobs")
        .and(body_partial_json(json!({
            "model": "gpt-35-turbo-0613",
            "training_file": "file-train",
            "validation_file": "file-valid",
            "seed": 105
        })))
        .respond_with(success_response(job_body("pending", None)))
        .expect(1)
        .mount(&mock_server)
        .await;

    data_plane_mock("GET", "/fine_tuning/jobs/ftjob-integration")
        .respond_with(success_response(job_body("running", None)))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    data_plane_mock("GET", "/fine_tuning/jobs/ftjob-integration")
        .respond_with(success_response(job_body(
            "succeeded",
            Some("gpt-35-turbo-0613.ft-integration"),
        )))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let training_path = dir.path().join("training_set.jsonl");
    let mut file = std::fs::File::create(&training_path).unwrap();
    writeln!(file, r#"{{"messages":[{{"role":"user","content":"hi"}}]}}"#).unwrap();

    let client = data_plane_client(&mock_server);
    let uploaded = client
        .files()
        .upload_path(&training_path, FilePurpose::FineTune)
        .await
        .unwrap();
    assert_eq!(uploaded.id, "file-train");

    let job = client
        .fine_tuning()
        .create(
            FineTuningJobRequest::new("gpt-35-turbo-0613", uploaded.id)
                .with_validation_file("file-valid")
                .with_seed(105),
        )
        .await
        .unwrap();
    assert_eq!(job.status, FineTuningJobStatus::Pending);

    let poller = client
        .job_poller(PollConfig::default().with_interval(Duration::from_millis(10)))
        .unwrap();
    let report = poller.wait_for_terminal(&job.id).await.unwrap();

    assert_eq!(report.status(), FineTuningJobStatus::Succeeded);
    assert_eq!(report.polls, 3);
    assert_eq!(report.sleeps, 2);
    assert_eq!(
        report.job.fine_tuned_model.as_deref(),
        Some("gpt-35-turbo-0613.ft-integration")
    );
}

#[tokio::test]
async fn test_create_job_rejected_training_file() {
    let mock_server = setup_mock_server().await;

    data_plane_mock("POST", "/fine_tuning/jobs")
        .respond_with(error_response(
            400,
            json!({
                "error": {
                    "code": "invalidPayload",
                    "message": "The specified training file is not a valid JSONL file."
                }
            }),
        ))
        .mount(&mock_server)
        .await;

    let client = data_plane_client(&mock_server);
    let result = client
        .fine_tuning()
        .create(FineTuningJobRequest::new("gpt-35-turbo-0613", "file-bad"))
        .await;

    assert!(matches!(result, Err(FineTuneError::Validation(_))));
}

#[tokio::test]
async fn test_poll_times_out_on_stuck_job() {
    let mock_server = setup_mock_server().await;

    data_plane_mock("GET", "/fine_tuning/jobs/ftjob-integration")
        .respond_with(success_response(job_body("queued", None)))
        .mount(&mock_server)
        .await;

    let client = data_plane_client(&mock_server);
    let poller = client
        .job_poller(
            PollConfig::default()
                .with_interval(Duration::from_millis(10))
                .with_max_wait(Duration::from_millis(50)),
        )
        .unwrap();

    match poller.wait_for_terminal("ftjob-integration").await {
        Err(FineTuneError::PollTimeout {
            job_id,
            last_status,
            ..
        }) => {
            assert_eq!(job_id, "ftjob-integration");
            assert_eq!(last_status, "queued");
        }
        other => panic!("expected poll timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_events_are_listed_with_limit() {
    let mock_server = setup_mock_server().await;

    data_plane_mock("GET", "/fine_tuning/jobs/ftjob-integration/events")
        .and(query_param("limit", "2"))
        .respond_with(success_response(json!({
            "object": "list",
            "data": [
                {"id": "ftevent-2", "object": "fine_tuning.job.event", "created_at": 1700000100, "level": "info", "message": "Job succeeded."},
                {"id": "ftevent-1", "object": "fine_tuning.job.event", "created_at": 1700000000, "level": "info", "message": "Training started."}
            ],
            "has_more": false
        })))
        .mount(&mock_server)
        .await;

    let client = data_plane_client(&mock_server);
    let events = client
        .fine_tuning()
        .events(
            "ftjob-integration",
            integrations_azure_finetune::services::fine_tuning::ListParams::default().with_limit(2),
        )
        .await
        .unwrap();

    assert_eq!(events.data.len(), 2);
    assert_eq!(events.data[1].message, "Training started.");
}
