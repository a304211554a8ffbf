use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use wealthplan_core::events::LogDomainEventSink;
use wealthplan_core::intents::{
    DispatchOutcome, IntentAction, IntentDispatchService, IntentDispatchServiceTrait,
};
use wealthplan_core::plan::PlanRepositoryTrait;
use wealthplan_core::store::PlanStore;
use wealthplan_core::{Summary, Timeline};
use wealthplan_remote::PlanApiClient;

use crate::config::Config;

pub fn init_tracing() {
    let log_format = std::env::var("WP_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[derive(Debug, Parser)]
#[command(name = "wealthplan")]
#[command(about = "Project and edit a wealth plan", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Fetch the plan and print its projection
    Project,
    /// Apply intent actions and print the result
    Dispatch {
        /// Intent JSON file; stdin when omitted or `-`
        input: Option<String>,
        /// Chat the intent came from, recorded on audit events
        #[arg(long)]
        chat_id: Option<String>,
    },
}

/// Dispatch input: either a bare action array or an envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IntentInput {
    Actions(Vec<IntentAction>),
    Envelope(IntentEnvelope),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntentEnvelope {
    #[serde(default)]
    intent_id: Option<String>,
    #[serde(default)]
    chat_id: Option<String>,
    actions: Vec<IntentAction>,
}

/// A parsed intent ready to dispatch.
#[derive(Debug, PartialEq)]
pub struct IntentRequest {
    pub intent_id: String,
    pub chat_id: Option<String>,
    pub actions: Vec<IntentAction>,
}

pub fn parse_intent(json: &str) -> Result<IntentRequest> {
    let input: IntentInput = serde_json::from_str(json).context("Invalid intent JSON")?;
    let (intent_id, chat_id, mut actions) = match input {
        IntentInput::Actions(actions) => (None, None, actions),
        IntentInput::Envelope(envelope) => (envelope.intent_id, envelope.chat_id, envelope.actions),
    };
    for action in actions.iter_mut().filter(|a| a.id.is_empty()) {
        action.id = uuid::Uuid::new_v4().to_string();
    }
    Ok(IntentRequest {
        intent_id: intent_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        chat_id,
        actions,
    })
}

fn read_input(input: Option<&str>) -> Result<String> {
    let path = input.filter(|p| *p != "-");
    if let Some(path) = path {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))
    } else {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read intent from stdin")?;
        Ok(buf)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<DispatchOutcome>,
    summary: Summary,
    timeline: Timeline,
}

pub async fn run(config: Config, command: Command) -> Result<()> {
    let client = Arc::new(PlanApiClient::new(config.remote())?);
    let store = Arc::new(PlanStore::new(config.settings.clone(), Arc::new(LogDomainEventSink)));

    tracing::info!("Loading plan from {}", client.base_url());
    let plan = client.load_plan().await?;
    store.load(plan)?;

    let outcome = match command {
        Command::Project => None,
        Command::Dispatch { input, chat_id } => {
            let request = parse_intent(&read_input(input.as_deref())?)?;
            let mut service =
                IntentDispatchService::new(store.clone(), client.clone(), client.clone());
            if let Some(chat_id) = chat_id.or(request.chat_id) {
                service = service.with_chat_id(chat_id);
            }
            Some(service.dispatch(&request.intent_id, &request.actions).await?)
        }
    };

    let summary = store.plan().map(|plan| plan.summary).unwrap_or_default();
    let report = Report {
        outcome,
        summary,
        timeline: store.timeline(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
