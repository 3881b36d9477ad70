use anyhow::{Context, Result, anyhow};
use llm_service::{LlmModelConfig, OpenAiService};
use pr_reviewer::github::{GitHubClient, PullRequestId};
use pr_reviewer::publish::{self, PublishConfig};
use serde::Deserialize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Subset of the workflow event payload we actually read.
#[derive(Debug, Deserialize)]
struct WorkflowEvent {
    pull_request: EventPullRequest,
}

#[derive(Debug, Deserialize)]
struct EventPullRequest {
    number: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file when present (local runs).
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();

    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    // Fatal preconditions: without these no partial progress is meaningful.
    let repo = must_env("GITHUB_REPOSITORY")?;
    let token = must_env("GITHUB_TOKEN")?;
    let event_path = must_env("GITHUB_EVENT_PATH")?;
    let llm_cfg = LlmModelConfig::from_env()?;

    let event_json = std::fs::read_to_string(&event_path)
        .with_context(|| format!("reading event payload at {event_path}"))?;
    let event: WorkflowEvent =
        serde_json::from_str(&event_json).context("parsing workflow event payload")?;
    let id = PullRequestId {
        repo,
        number: event.pull_request.number,
    };

    let base_api = std::env::var("GITHUB_API_URL")
        .unwrap_or_else(|_| "https://api.github.com".to_string());
    let client = GitHubClient::new(base_api, token)?;
    let llm = OpenAiService::new(llm_cfg)?;

    tracing::info!("reviewing PR #{} in {}", id.number, id.repo);

    let run = pr_reviewer::run_review(&client, &id, &llm).await?;
    let report = publish::publish(
        &client,
        &id,
        &run.meta.head_sha,
        &run.outcomes,
        &run.styling,
        &PublishConfig::default(),
    )
    .await?;

    tracing::info!(
        "AI review completed with {} inline comments",
        report.posted_inline
    );
    Ok(())
}

fn must_env(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| anyhow!("missing required environment variable: {name}"))
}
