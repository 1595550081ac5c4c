//! Baseline versus fine-tuned comparison through chat and the evaluation service

use super::*;
use integrations_azure_finetune::evaluation::{
    load_test_records, EvaluationConfig, EvaluationPipeline, HttpMetricScorer, Metric,
    ModelTarget,
};
use serde_json::json;
use std::io::Write;
use wiremock::matchers::body_partial_json;

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-integration",
        "object": "chat.completion",
        "created": 1700000000,
        "model": "gpt-35-turbo",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 20, "completion_tokens": 8, "total_tokens": 28}
    })
}

#[tokio::test]
async fn test_compare_baseline_and_fine_tuned() {
    let mock_server = setup_mock_server().await;

    data_plane_mock("POST", "/deployments/gpt-35-turbo/chat/completions")
        .respond_with(success_response(completion("It was 1649. <ANSWER>: 1649")))
        .expect(2)
        .mount(&mock_server)
        .await;

    data_plane_mock("POST", "/deployments/ft-deployment/chat/completions")
        .respond_with(success_response(completion("<ANSWER>: 1648")))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    data_plane_mock("POST", "/deployments/ft-deployment/chat/completions")
        .respond_with(error_response(
            500,
            json!({"error": {"code": "InternalServerError", "message": "boom"}}),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/evaluate"))
        .and(body_partial_json(json!({
            "model": "gpt-35-turbo",
            "metrics": ["faithfulness", "answer_correctness"]
        })))
        .respond_with(success_response(json!({
            "scores": {"faithfulness": 0.4, "answer_correctness": 0.2}
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/evaluate"))
        .and(body_partial_json(json!({
            "model": "ft-model"
        })))
        .respond_with(success_response(json!({
            "scores": {"faithfulness": 0.5, "answer_correctness": 0.5}
        })))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let test_path = dir.path().join("test.jsonl");
    let record = json!({
        "instruction": "<DOCUMENT>The treaty was signed in 1648.</DOCUMENT>\nWhen was the treaty signed?",
        "question": "When was the treaty signed?",
        "cot_answer": "##begin_quote##signed in 1648##end_quote## <ANSWER>: 1648"
    });
    let mut file = std::fs::File::create(&test_path).unwrap();
    writeln!(file, "{}", record).unwrap();
    writeln!(file, "{}", record).unwrap();
    let records = load_test_records(&test_path).unwrap();

    let scorer = HttpMetricScorer::new(
        EvaluationConfig::new(Url::parse(&mock_server.uri()).unwrap())
            .with_metrics(vec![Metric::Faithfulness, Metric::AnswerCorrectness]),
    )
    .unwrap();
    let client = data_plane_client(&mock_server);
    let pipeline = EvaluationPipeline::new(client.chat(), Arc::new(scorer));

    let report = pipeline
        .evaluate_models(
            &[
                ModelTarget::new("gpt-35-turbo", "gpt-35-turbo"),
                ModelTarget::new("ft-model", "ft-deployment"),
            ],
            &records,
        )
        .await
        .unwrap();

    let baseline = &report.evaluations[0];
    assert_eq!(baseline.failed_rows(), 0);
    assert_eq!(baseline.rows[0].answer.as_deref(), Some("1649"));
    assert_eq!(
        baseline.rows[0].contexts,
        vec!["<DOCUMENT>The treaty was signed in 1648.</DOCUMENT>".to_string()]
    );
    assert_eq!(baseline.rows[0].ground_truth.as_deref(), Some("1648"));

    let fine_tuned = &report.evaluations[1];
    assert_eq!(fine_tuned.failed_rows(), 1);
    assert_eq!(fine_tuned.rows[0].answer.as_deref(), Some("1648"));
    assert_eq!(fine_tuned.rows[1].answer, None);

    assert_eq!(report.table.metrics(), ["answer_correctness", "faithfulness"]);
    assert_eq!(report.table.get("gpt-35-turbo", "faithfulness"), Some(0.4));
    assert_eq!(report.table.get("ft-model", "answer_correctness"), Some(0.5));

    let mut csv = Vec::new();
    report.table.write_csv(&mut csv).unwrap();
    assert!(String::from_utf8(csv)
        .unwrap()
        .starts_with("model,answer_correctness,faithfulness\n"));
}
