//! Fine-tuning job fixtures

use serde_json::json;

/// Job snapshot in the given status
pub fn fine_tuning_job_response(status: &str) -> serde_json::Value {
    let fine_tuned_model = if status == "succeeded" {
        json!("gpt-35-turbo-0613.ft-5fd1918ee65d4cd38a5dcf6835066ed7")
    } else {
        json!(null)
    };

    json!({
        "id": "ftjob-abc123",
        "object": "fine_tuning.job",
        "model": "gpt-35-turbo-0613",
        "created_at": 1677610602,
        "finished_at": null,
        "fine_tuned_model": fine_tuned_model,
        "result_files": [],
        "status": status,
        "seed": 105,
        "hyperparameters": { "n_epochs": 3 },
        "validation_file": "file-def456",
        "training_file": "file-abc123"
    })
}

/// Failed job with an error payload
pub fn failed_fine_tuning_job_response() -> serde_json::Value {
    let mut job = fine_tuning_job_response("failed");
    job["error"] = json!({
        "code": "invalid_training_file",
        "message": "The training file has too few examples.",
        "param": "training_file"
    });
    job
}

pub fn list_fine_tuning_jobs_response() -> serde_json::Value {
    json!({
        "object": "list",
        "data": [fine_tuning_job_response("running"), fine_tuning_job_response("succeeded")],
        "has_more": false
    })
}

pub fn fine_tuning_events_response() -> serde_json::Value {
    json!({
        "object": "list",
        "data": [
            {
                "id": "ftevent-2",
                "object": "fine_tuning.job.event",
                "created_at": 1677610700,
                "level": "info",
                "message": "Training started."
            },
            {
                "id": "ftevent-1",
                "object": "fine_tuning.job.event",
                "created_at": 1677610650,
                "level": "info",
                "message": "Job enqueued. Waiting for jobs ahead to complete."
            }
        ],
        "has_more": true
    })
}
