//! Deploy trigger and polling behaviour against a scripted transport

mod common;

use std::future::{pending, ready};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::{recording_sleep, token, ScriptedApi};
use openapi_client::models::{DeployRequest, SelectiveDeployRequest};
use pipectl::deploy::waiter::{wait_for_operation, WaitOptions};
use pipectl::{PipelineClient, PipelineError, Session};
use serde_json::json;

const PIPELINE_ID: &str = "a1b2c3";
const OPERATION_PATH: &str = "/pipelines/a1b2c3/operations/op-1";

async fn wait_with_script(
    api: &ScriptedApi,
    options: &WaitOptions,
    sleeps: Arc<Mutex<Vec<Duration>>>,
) -> Result<openapi_client::models::PipelineOperation, PipelineError> {
    let token = token();
    let session = Session::new(api, &token);
    let pipeline = PipelineClient::new(PIPELINE_ID);

    wait_for_operation(
        &pipeline,
        session,
        "op-1",
        options,
        recording_sleep(sleeps),
        Box::pin(pending::<()>()),
    )
    .await
}

#[tokio::test]
async fn test_succeeds_on_third_poll() {
    let api = ScriptedApi::new("op-1", &["Running", "Running", "Succeeded"]);
    let sleeps = Arc::new(Mutex::new(Vec::new()));

    let operation = wait_with_script(&api, &WaitOptions::default(), sleeps.clone())
        .await
        .unwrap();

    assert_eq!(operation.status(), "Succeeded");
    assert_eq!(operation.extra["poll"], 2);
    assert_eq!(operation.extra["targetStageOrder"], 1);
    assert_eq!(api.count("GET", OPERATION_PATH), 3);
    assert_eq!(
        *sleeps.lock().unwrap(),
        vec![Duration::from_secs(30), Duration::from_secs(30)]
    );
}

#[tokio::test]
async fn test_failure_raises_with_operation_record() {
    let api = ScriptedApi::new("op-1", &["Running", "Failed"]);
    let sleeps = Arc::new(Mutex::new(Vec::new()));

    let result = wait_with_script(&api, &WaitOptions::default(), sleeps.clone()).await;

    match result {
        Err(PipelineError::DeploymentFailed { operation }) => {
            assert_eq!(operation.status(), "Failed");
            assert_eq!(operation.id.as_deref(), Some("op-1"));
            assert_eq!(operation.extra["poll"], 1);
        }
        other => panic!("Expected DeploymentFailed, got {:?}", other),
    }
    assert_eq!(api.count("GET", OPERATION_PATH), 2);
    assert_eq!(sleeps.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_immediate_success_never_sleeps() {
    let api = ScriptedApi::new("op-1", &["Succeeded"]);
    let sleeps = Arc::new(Mutex::new(Vec::new()));

    wait_with_script(&api, &WaitOptions::default(), sleeps.clone())
        .await
        .unwrap();

    assert_eq!(api.count("GET", OPERATION_PATH), 1);
    assert!(sleeps.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_status_keeps_polling() {
    let api = ScriptedApi::new("op-1", &["", "NotStarted", "", "Succeeded"]);
    let sleeps = Arc::new(Mutex::new(Vec::new()));
    let options = WaitOptions {
        interval: Duration::from_secs(5),
        max_wait: None,
    };

    let operation = wait_with_script(&api, &options, sleeps.clone())
        .await
        .unwrap();

    assert_eq!(operation.status(), "Succeeded");
    assert_eq!(api.count("GET", OPERATION_PATH), 4);
    assert_eq!(*sleeps.lock().unwrap(), vec![Duration::from_secs(5); 3]);
}

#[tokio::test]
async fn test_max_wait_stops_polling() {
    let api = ScriptedApi::new("op-1", &["Executing"; 10]);
    let sleeps = Arc::new(Mutex::new(Vec::new()));
    let options = WaitOptions {
        interval: Duration::from_secs(10),
        max_wait: Some(Duration::from_secs(20)),
    };

    let result = wait_with_script(&api, &options, sleeps.clone()).await;

    match result {
        Err(PipelineError::WaitTimeout {
            operation_id,
            waited,
            last,
        }) => {
            assert_eq!(operation_id, "op-1");
            assert_eq!(waited, Duration::from_secs(20));
            assert_eq!(last.status(), "Executing");
        }
        other => panic!("Expected WaitTimeout, got {:?}", other),
    }
    assert_eq!(api.count("GET", OPERATION_PATH), 3);
    assert_eq!(sleeps.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_max_wait_shortens_last_sleep() {
    let api = ScriptedApi::new("op-1", &["Executing"; 10]);
    let sleeps = Arc::new(Mutex::new(Vec::new()));
    let options = WaitOptions {
        interval: Duration::from_secs(30),
        max_wait: Some(Duration::from_secs(45)),
    };

    let result = wait_with_script(&api, &options, sleeps.clone()).await;

    match result {
        Err(PipelineError::WaitTimeout { waited, .. }) => {
            assert_eq!(waited, Duration::from_secs(45));
        }
        other => panic!("Expected WaitTimeout, got {:?}", other),
    }
    assert_eq!(
        *sleeps.lock().unwrap(),
        vec![Duration::from_secs(30), Duration::from_secs(15)]
    );
    assert_eq!(api.count("GET", OPERATION_PATH), 3);
}

#[tokio::test]
async fn test_zero_max_wait_polls_once() {
    let api = ScriptedApi::new("op-1", &["Executing"; 3]);
    let sleeps = Arc::new(Mutex::new(Vec::new()));
    let options = WaitOptions {
        interval: Duration::from_secs(30),
        max_wait: Some(Duration::ZERO),
    };

    let result = wait_with_script(&api, &options, sleeps.clone()).await;

    assert!(matches!(result, Err(PipelineError::WaitTimeout { .. })));
    assert!(sleeps.lock().unwrap().is_empty());
    assert_eq!(api.count("GET", OPERATION_PATH), 1);
}

#[tokio::test]
async fn test_cancel_during_sleep() {
    let api = ScriptedApi::new("op-1", &["Running", "Succeeded"]);
    let token = token();
    let session = Session::new(&api, &token);
    let pipeline = PipelineClient::new(PIPELINE_ID);

    let result = wait_for_operation(
        &pipeline,
        session,
        "op-1",
        &WaitOptions::default(),
        |_| pending::<()>(),
        Box::pin(ready(())),
    )
    .await;

    assert!(matches!(
        result,
        Err(PipelineError::WaitCancelled { ref operation_id }) if operation_id == "op-1"
    ));
    assert_eq!(api.count("GET", OPERATION_PATH), 1);
}

#[tokio::test]
async fn test_poll_error_propagates() {
    // Script runs out after one poll, so the second fetch is an API error
    let api = ScriptedApi::new("op-1", &["Running"]);
    let sleeps = Arc::new(Mutex::new(Vec::new()));

    let result = wait_with_script(&api, &WaitOptions::default(), sleeps).await;

    assert_eq!(result.unwrap_err().status(), Some(500));
}

#[tokio::test]
async fn test_deploy_all_and_wait_polls_triggered_operation() {
    let api = ScriptedApi::new("op-1", &["Executing", "Succeeded"]);
    let token = token();
    let session = Session::new(&api, &token);
    let pipeline = PipelineClient::new(PIPELINE_ID);
    let options = WaitOptions {
        interval: Duration::from_millis(1),
        max_wait: None,
    };

    let operation = pipeline
        .deploy_all_and_wait(session, &DeployRequest::new(0).with_note("nightly"), &options)
        .await
        .unwrap();

    assert_eq!(operation.status(), "Succeeded");

    let calls = api.calls();
    assert_eq!(calls[0].method, "POST");
    assert_eq!(calls[0].path, "/pipelines/a1b2c3/deployAll");
    assert_eq!(
        calls[0].body,
        Some(json!({
            "sourceStageOrder": 0,
            "isBackwardDeployment": false,
            "note": "nightly"
        }))
    );
    assert_eq!(api.count("GET", OPERATION_PATH), 2);
}

#[tokio::test]
async fn test_selective_deploy_sends_only_supplied_fields() {
    let api = ScriptedApi::new("op-1", &[]);
    let token = token();
    let session = Session::new(&api, &token);
    let pipeline = PipelineClient::new(PIPELINE_ID);

    let request = SelectiveDeployRequest::new(0).with_datasets(vec![json!({ "id": "abc" })]);
    let triggered = pipeline.selective_deploy(session, &request).await.unwrap();

    assert_eq!(triggered.id.as_deref(), Some("op-1"));
    assert_eq!(
        api.calls(),
        vec![common::Call {
            method: "POST",
            path: "/pipelines/a1b2c3/deploy".to_string(),
            body: Some(json!({
                "sourceStageOrder": 0,
                "isBackwardDeployment": false,
                "datasets": [{ "id": "abc" }]
            })),
        }]
    );
}

#[tokio::test]
async fn test_trigger_without_operation_id() {
    let api = ScriptedApi::new("op-1", &["Succeeded"])
        .with_trigger_response(json!({ "status": "NotStarted" }));
    let token = token();
    let session = Session::new(&api, &token);
    let pipeline = PipelineClient::new(PIPELINE_ID);

    let result = pipeline
        .selective_deploy_and_wait(
            session,
            &SelectiveDeployRequest::new(1).with_reports(vec![json!({ "sourceId": "r" })]),
            &WaitOptions::default(),
        )
        .await;

    assert!(matches!(result, Err(PipelineError::MissingOperationId)));
    assert_eq!(api.count("GET", "/operations/"), 0);
}

#[tokio::test]
async fn test_simple_operations_use_expected_paths() {
    let api = ScriptedApi::new("op-1", &[]);
    let token = token();
    let session = Session::new(&api, &token);
    let pipeline = PipelineClient::new(PIPELINE_ID);

    pipeline.assign_workspace(session, 2, "ws-prod").await.unwrap();
    pipeline.unassign_workspace(session, 2).await.unwrap();
    pipeline.delete_pipeline_user(session, "someone@contoso.com").await.unwrap();
    pipeline.delete_pipeline(session).await.unwrap();
    assert!(pipeline.get_pipeline_stages(session).await.unwrap().is_empty());

    let calls = api.calls();
    assert_eq!(calls[0].path, "/pipelines/a1b2c3/stages/2/assignWorkspace");
    assert_eq!(calls[0].body, Some(json!({ "workspaceId": "ws-prod" })));
    assert_eq!(calls[1].path, "/pipelines/a1b2c3/stages/2/unassignWorkspace");
    assert_eq!(calls[1].body, None);
    assert_eq!(
        (calls[2].method, calls[2].path.as_str()),
        ("DELETE", "/pipelines/a1b2c3/users/someone%40contoso.com")
    );
    assert_eq!((calls[3].method, calls[3].path.as_str()), ("DELETE", "/pipelines/a1b2c3"));
    assert_eq!((calls[4].method, calls[4].path.as_str()), ("GET", "/pipelines/a1b2c3/stages"));
}
