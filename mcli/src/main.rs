//! Interactive driver: a stdin chat loop that speaks through the
//! configured model provider and mirrors each reaction onto the
//! connected avatar host.

use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use marionette::{
    AvatarRig, DEFAULT_STAGE_URL, EmotionResult, FileTokenStore, PromptLibrary, Settings,
    StageClient, StageConfig, TracingCallHooks, chino11, connect_with_hooks,
};
use tracing_subscriber::prelude::*;

const CONTROLLER_SYSTEM_PROMPT: &str = "You are the voice of a live stage avatar. \
Reply in one or two conversational sentences. When a reaction fits the moment, \
invoke one of the expression tools instead of describing the motion in prose.";

#[derive(Parser)]
#[command(name = "marionette")]
#[command(about = "LLM-driven avatar controller", long_about = None)]
#[command(version)]
struct Cli {
    /// Provider to talk to: ollama, gemini, openai, or anthropic.
    #[arg(long)]
    provider: Option<String>,

    /// Model override for the chosen provider.
    #[arg(long)]
    model: Option<String>,

    /// Directory of <name>_system.md / <name>_user.md template pairs.
    #[arg(long)]
    prompts_dir: Option<PathBuf>,

    /// WebSocket URL of the avatar host.
    #[arg(long, default_value = DEFAULT_STAGE_URL)]
    stage_url: String,

    /// Chat without driving an avatar.
    #[arg(long)]
    no_stage: bool,

    /// Log at debug level.
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let _ = dotenvy::dotenv();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut overrides = Settings::new();
    if let Some(provider) = cli.provider.as_deref() {
        overrides = overrides.with_provider(provider);
    }
    if let Some(model) = cli.model.as_deref() {
        overrides = overrides.with_model(model);
    }
    let settings = overrides.or(Settings::from_env());

    let mut session = connect_with_hooks(settings, Arc::new(TracingCallHooks))?;
    if let Some(dir) = &cli.prompts_dir {
        session = session.with_prompts(PromptLibrary::from_dir(dir));
    }
    tracing::info!(
        provider = %session.provider_id(),
        model = session.model(),
        "session ready"
    );

    let rig = chino11();
    let mut stage = if cli.no_stage {
        None
    } else {
        connect_stage(&cli.stage_url).await
    };
    if let Some(client) = stage.as_mut()
        && let Err(err) = client.inject_parameters(&rig.rest_pose()).await
    {
        tracing::warn!(error = %err, "could not settle the rig at rest");
    }

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "quit" | "exit") {
            break;
        }

        match session.call(input, Some(CONTROLLER_SYSTEM_PROMPT)).await {
            Ok(reply) => {
                if !reply.text.is_empty() {
                    println!("{}", reply.text);
                }
                tracing::debug!(
                    elapsed_ms = reply.elapsed.as_millis() as u64,
                    within_budget = session.is_performance_acceptable(),
                    "turn finished"
                );
                if let Some(reaction) = reply.reaction {
                    perform(&mut stage, &rig, reaction.emotion()).await;
                }
            }
            Err(err) => eprintln!("error: {err}"),
        }
    }

    if let Some(client) = stage {
        let _ = client.close().await;
    }
    Ok(())
}

/// Connects and authenticates against the avatar host. Any failure is
/// logged and the controller carries on chat-only.
async fn connect_stage(url: &str) -> Option<StageClient> {
    let config = StageConfig::new().with_url(url);
    let mut client = match StageClient::connect(config).await {
        Ok(client) => client,
        Err(err) => {
            tracing::warn!(url, error = %err, "avatar host unreachable, continuing without a stage");
            return None;
        }
    };

    let store = FileTokenStore::new("stage_token.txt");
    match client.authenticate(&store).await {
        Ok(()) => {
            tracing::info!(url, "avatar host session authenticated");
            Some(client)
        }
        Err(err) => {
            tracing::warn!(url, error = %err, "avatar host refused the plugin, continuing without a stage");
            let _ = client.close().await;
            None
        }
    }
}

async fn perform(stage: &mut Option<StageClient>, rig: &AvatarRig, emotion: EmotionResult) {
    tracing::info!(
        emotion = %emotion.emotion,
        intensity = emotion.intensity as f64,
        "reaction"
    );
    let Some(client) = stage.as_mut() else {
        return;
    };
    let pose = rig.pose(emotion.emotion, emotion.intensity);
    if let Err(err) = client.inject_parameters(&pose).await {
        tracing::warn!(error = %err, "pose injection failed");
    }
}
