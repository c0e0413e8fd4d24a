//! Command dispatch

use std::future::pending;

use anyhow::{anyhow, Context};
use colored::Colorize;
use openapi_client::models::{
    DeployRequest, PipelineOperation, PipelineUserRequest, SelectiveDeployRequest,
    UpdatePipelineRequest,
};
use serde::Serialize;
use tracing::info;

use crate::app::args::CliArgs;
use crate::app::options::{access_token_from_env, ClientOptions};
use crate::deploy::waiter::{wait_for_operation, OperationState};
use crate::errors::PipelineError;
use crate::http::Session;
use crate::pipeline::{list_pipelines, PipelineClient};
use crate::storage::layout::StorageLayout;
use crate::storage::settings::Settings;

pub const USAGE: &str = "\
usage: pipectl <command> [--pipeline=<id>] [options]

commands:
  version
  init
  list
  get          --pipeline=<id>
  stages       --pipeline=<id>
  artifacts    --pipeline=<id> --stage=<order>
  users        --pipeline=<id>
  operations   --pipeline=<id>
  operation    --pipeline=<id> --operation=<id> [--wait]
  deploy-all   --pipeline=<id> --source-stage=<order> [--backward] [--note=<text>]
               [--new-workspace=<json>] [--options=<json>] [--update-app-settings=<json>] [--wait]
  deploy       same as deploy-all, plus [--dashboards=<json>] [--dataflows=<json>]
               [--datamarts=<json>] [--datasets=<json>] [--reports=<json>]
  assign       --pipeline=<id> --stage=<order> --workspace=<id>
  unassign     --pipeline=<id> --stage=<order>
  update       --pipeline=<id> [--name=<text>] [--description=<text>]
  add-user     --pipeline=<id> --identifier=<upn|id> --principal-type=<type> [--access-right=<right>]
  remove-user  --pipeline=<id> --identifier=<upn|id>
  delete       --pipeline=<id>

environment:
  PIPECTL_ACCESS_TOKEN  bearer token (required for API commands)
  PIPECTL_BASE_URL      overrides backend.base_url
  PIPECTL_HOME          configuration directory (default ~/.pipectl)
";

/// Run one CLI command
pub async fn run(
    args: &CliArgs,
    options: &ClientOptions,
    layout: &StorageLayout,
) -> anyhow::Result<()> {
    let command = args.command.as_deref().ok_or_else(|| anyhow!(USAGE))?;
    args.ensure_no_extra()?;

    if command == "init" {
        let file = layout.settings_file();
        file.create_json(&Settings::default())
            .await
            .with_context(|| format!("unable to create {}", file.path().display()))?;
        println!("Wrote default settings to {}", file.path().display());
        return Ok(());
    }

    let token = access_token_from_env()?;
    let http_client = options.http_client()?;
    let session = Session::new(&http_client, &token);

    if command == "list" {
        return print_json(&list_pipelines(session).await?);
    }

    let pipeline = PipelineClient::new(args.require("pipeline")?);

    match command {
        "get" => print_json(&pipeline.get_pipeline(session).await?),
        "stages" => print_json(&pipeline.get_pipeline_stages(session).await?),
        "artifacts" => {
            let stage = args.require_u32("stage")?;
            print_json(&pipeline.get_pipeline_stage_artifacts(session, stage).await?)
        }
        "users" => print_json(&pipeline.get_pipeline_users(session).await?),
        "operations" => print_json(&pipeline.get_pipeline_operations(session).await?),
        "operation" => {
            let operation_id = args.require("operation")?;
            if args.flag("wait") {
                await_operation(&pipeline, session, operation_id, options).await
            } else {
                print_json(&pipeline.get_pipeline_operation(session, operation_id).await?)
            }
        }
        "deploy-all" => {
            let request = deploy_request(args)?;
            let triggered = pipeline.deploy_all(session, &request).await?;
            finish_deploy(&pipeline, session, triggered, args, options).await
        }
        "deploy" => {
            let request = selective_deploy_request(args)?;
            let triggered = pipeline.selective_deploy(session, &request).await?;
            finish_deploy(&pipeline, session, triggered, args, options).await
        }
        "assign" => {
            let stage = args.require_u32("stage")?;
            let workspace_id = args.require("workspace")?;
            pipeline.assign_workspace(session, stage, workspace_id).await?;
            Ok(())
        }
        "unassign" => {
            let stage = args.require_u32("stage")?;
            pipeline.unassign_workspace(session, stage).await?;
            Ok(())
        }
        "update" => {
            let request = UpdatePipelineRequest {
                display_name: args.get("name").map(str::to_string),
                description: args.get("description").map(str::to_string),
            };
            pipeline.update_pipeline(session, &request).await?;
            Ok(())
        }
        "add-user" => {
            let request = PipelineUserRequest {
                identifier: args.require("identifier")?.to_string(),
                principal_type: args.require("principal-type")?.to_string(),
                access_right: args.get("access-right").map(str::to_string),
            };
            pipeline.update_pipeline_user(session, &request).await?;
            Ok(())
        }
        "remove-user" => {
            let identifier = args.require("identifier")?;
            pipeline.delete_pipeline_user(session, identifier).await?;
            Ok(())
        }
        "delete" => {
            pipeline.delete_pipeline(session).await?;
            Ok(())
        }
        other => Err(anyhow!("unknown command: {}\n\n{}", other, USAGE)),
    }
}

/// Build a deploy-all payload from `--source-stage` and the optional flags
pub fn deploy_request(args: &CliArgs) -> anyhow::Result<DeployRequest> {
    let mut request = DeployRequest::new(args.require_u32("source-stage")?)
        .with_backward_deployment(args.flag("backward"));

    if let Some(note) = args.get("note") {
        request = request.with_note(note);
    }
    if let Some(new_workspace) = args.json("new-workspace")? {
        request = request.with_new_workspace(new_workspace);
    }
    if let Some(deploy_options) = args.json("options")? {
        request = request.with_options(deploy_options);
    }
    if let Some(update_app_settings) = args.json("update-app-settings")? {
        request = request.with_update_app_settings(update_app_settings);
    }

    Ok(request)
}

/// Build a selective deploy payload; content lists are JSON arrays
pub fn selective_deploy_request(args: &CliArgs) -> anyhow::Result<SelectiveDeployRequest> {
    let mut request = SelectiveDeployRequest::from(deploy_request(args)?);

    request.dashboards = args.json_list("dashboards")?;
    request.dataflows = args.json_list("dataflows")?;
    request.datamarts = args.json_list("datamarts")?;
    request.datasets = args.json_list("datasets")?;
    request.reports = args.json_list("reports")?;

    Ok(request)
}

async fn finish_deploy(
    pipeline: &PipelineClient,
    session: Session<'_>,
    triggered: PipelineOperation,
    args: &CliArgs,
    options: &ClientOptions,
) -> anyhow::Result<()> {
    if !args.flag("wait") {
        return print_json(&triggered);
    }

    let operation_id = triggered.id.ok_or(PipelineError::MissingOperationId)?;
    info!("Waiting for deployment operation {}", operation_id);
    await_operation(pipeline, session, &operation_id, options).await
}

/// Poll until terminal; Ctrl+C stops the wait, not the remote deployment
async fn await_operation(
    pipeline: &PipelineClient,
    session: Session<'_>,
    operation_id: &str,
    options: &ClientOptions,
) -> anyhow::Result<()> {
    let result = wait_for_operation(
        pipeline,
        session,
        operation_id,
        &options.wait,
        tokio::time::sleep,
        Box::pin(await_interrupt()),
    )
    .await;

    match result {
        Ok(operation) => {
            eprintln!("{} {}", status_label(operation.status()), operation_id);
            print_json(&operation)
        }
        Err(PipelineError::DeploymentFailed { operation }) => {
            eprintln!("{} {}", status_label(operation.status()), operation_id);
            print_json(&operation)?;
            Err(PipelineError::DeploymentFailed { operation }.into())
        }
        Err(e) => Err(e.into()),
    }
}

async fn await_interrupt() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; never cancel
        pending::<()>().await;
    }
    info!("Ctrl+C received, no longer waiting");
}

fn status_label(status: &str) -> colored::ColoredString {
    match OperationState::from_status(status) {
        OperationState::Succeeded => status.green().bold(),
        OperationState::Failed => status.red().bold(),
        OperationState::Pending => status.yellow(),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
