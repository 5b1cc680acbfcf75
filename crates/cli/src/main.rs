//! micsession - microphone session tracker CLI
//!
//! Subcommands:
//! - `micsession init` - Generate `.mic-session/` with config and scenarios
//! - `micsession simulate` - Drive a session against the simulated pipeline
//! - `micsession run [scenario]` - Replay scenarios against the tracker
//! - `micsession scenarios` - List configured scenarios

use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, eyre};
use color_eyre::Result;
use colored::Colorize;
use ms_core::config::loader::load_config;
use ms_core::config::models::AppConfig;
use ms_core::engine::SessionDriver;
use ms_core::init::{generate_session_structure, InitOptions};
use ms_core::pipeline::SimulatedPipeline;
use ms_core::scenario::{run_scenario, ScenarioOutcome};
use ms_protocol::config_models::GlobalConfig;
use ms_protocol::ipc::{Event, Op};
use ms_protocol::session_models::{RecordKind, Session};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "micsession")]
#[command(about = "Keep the selected microphone when the processing stage toggles")]
#[command(version)]
struct Cli {
    /// Project root containing `.mic-session/`
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate `.mic-session/` with a config and example scenarios
    Init {
        /// Overwrite an existing `.mic-session/`
        #[arg(long)]
        force: bool,

        /// Only generate the stage toggle scenario
        #[arg(long)]
        minimal: bool,
    },

    /// Select a device, toggle the processing stage, and watch the session
    Simulate {
        /// Disable the simulated revert on stage toggles
        #[arg(long)]
        no_revert: bool,

        /// Leave corrective switches to the caller
        #[arg(long)]
        no_reassert: bool,

        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Replay one scenario, or all of them
    Run {
        /// Scenario name
        scenario: Option<String>,

        /// Print outcomes as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// List configured scenarios
    Scenarios,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let Cli { root, command } = Cli::parse();

    if let Commands::Init { force, minimal } = command {
        init_tracing(&GlobalConfig::default().log_level);
        return init(root, force, minimal).await;
    }

    let config = load_config(&root).await?;
    init_tracing(&config.global.log_level);

    match command {
        Commands::Simulate {
            no_revert,
            no_reassert,
            json,
        } => {
            let mut global = config.global;
            if no_revert {
                global.simulation.revert_on_stage_toggle = false;
            }
            if no_reassert {
                global.auto_reassert = false;
            }
            simulate(global, json).await
        }
        Commands::Run { scenario, json } => run(&config, scenario.as_deref(), json),
        Commands::Scenarios => {
            list_scenarios(&config, &root);
            Ok(())
        }
        Commands::Init { .. } => Ok(()),
    }
}

/// `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

async fn init(root: PathBuf, force: bool, minimal: bool) -> Result<()> {
    let options = InitOptions {
        target_dir: root,
        force,
        minimal,
    };
    let written = generate_session_structure(options).await?;

    println!("{}", "Initialized .mic-session/".green().bold());
    for path in written {
        println!("  {} {path}", "+".green());
    }
    Ok(())
}

async fn simulate(config: GlobalConfig, json: bool) -> Result<()> {
    let (pipeline, reports_rx) = SimulatedPipeline::new(config.simulation.clone());
    let pipeline = Arc::new(pipeline);
    let (events_tx, mut events_rx) = mpsc::channel::<Event>(100);

    let printer = tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            render_event(&event, json);
        }
    });

    let target = config
        .simulation
        .devices
        .iter()
        .find(|d| d.is_input() && d.id != config.simulation.default_device)
        .map(|d| d.id.clone());
    info!(target_device = ?target, "starting simulation");

    let driver = SessionDriver::start(config, pipeline.clone(), pipeline.clone(), events_tx)
        .await
        .map_err(|e| eyre!("{e:#}"))?;

    let (ops_tx, ops_rx) = mpsc::channel(16);
    let handle = tokio::spawn(driver.run(ops_rx, reports_rx));

    let mut script = Vec::new();
    if let Some(device_id) = target.clone() {
        script.push(Op::SelectDevice { device_id });
    }
    script.extend([
        Op::SetStageEnabled { enabled: false },
        Op::SetStageEnabled { enabled: true },
        Op::GetSession,
        Op::Shutdown,
    ]);
    for op in script {
        ops_tx.send(op).await?;
    }

    let session = handle.await?.map_err(|e| eyre!("{e:#}"))?;
    printer.await?;

    if !json {
        print_summary(&session);
    }
    if !session.is_settled() {
        bail!("session did not settle on the selected device");
    }
    if let Some(target) = target {
        if session.selected_device_id.as_deref() != Some(target.as_str()) {
            bail!("selection moved away from {target}");
        }
    }
    Ok(())
}

fn run(config: &AppConfig, name: Option<&str>, json: bool) -> Result<()> {
    let scenarios: Vec<_> = match name {
        Some(name) => vec![config
            .scenario(name)
            .ok_or_else(|| eyre!("unknown scenario '{name}'"))?],
        None => config.scenarios.iter().collect(),
    };

    if scenarios.is_empty() {
        println!("No scenarios found. Run `micsession init` first.");
        return Ok(());
    }

    let mut failed = 0;
    for scenario in scenarios {
        debug!(scenario = %scenario.name, "replaying scenario");
        let outcome = run_scenario(scenario);
        if json {
            println!("{}", serde_json::to_string(&outcome)?);
        } else {
            print_outcome(&outcome);
        }
        if !outcome.passed() {
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{failed} scenario(s) failed");
    }
    Ok(())
}

fn list_scenarios(config: &AppConfig, root: &Path) {
    if config.scenarios.is_empty() {
        println!(
            "No scenarios under {}. Run `micsession init` first.",
            root.display()
        );
        return;
    }

    for scenario in &config.scenarios {
        println!(
            "{} ({} steps) {}",
            scenario.name.bold(),
            scenario.steps.len(),
            scenario.description.dimmed()
        );
    }
}

fn render_event(event: &Event, json: bool) {
    if json {
        if let Ok(line) = serde_json::to_string(event) {
            println!("{line}");
        }
        return;
    }

    match event {
        Event::SessionInitialized { session_id, session } => println!(
            "{} session {session_id} with {} devices",
            "●".green(),
            session.devices.len()
        ),
        Event::SessionUpdated {
            status,
            selected_device_id,
            reported_device_id,
            stage_enabled,
            ..
        } => println!(
            "  {} {status:?} selected={} reported={} stage={}",
            "status".dimmed(),
            selected_device_id.as_deref().unwrap_or("-"),
            reported_device_id.as_deref().unwrap_or("-"),
            if *stage_enabled { "on" } else { "off" }
        ),
        Event::HistoryAppended { record, .. } => {
            let line = format!("  #{} {:?} {}", record.seq, record.kind, record.message);
            match record.kind {
                RecordKind::SpuriousRevert => println!("{}", line.yellow()),
                RecordKind::Rejected => println!("{}", line.red()),
                _ => println!("{line}"),
            }
        }
        Event::EffectIssued { effect, .. } => println!("  {} {effect}", "→".cyan()),
        Event::OperationRejected { error, message, .. } => {
            println!("  {} {error}: {message}", "✗".red())
        }
        Event::SessionSnapshot { session, .. } => println!(
            "  {} {} history records",
            "snapshot".dimmed(),
            session.history.len()
        ),
        Event::SessionClosed { session_id } => println!("{} session {session_id} closed", "●".green()),
        // Already written through tracing.
        Event::LogLine { .. } => {}
    }
}

fn print_summary(session: &Session) {
    let selected = session.selected_device().map_or("-", |d| d.label.as_str());
    let reported = session.reported_device().map_or("-", |d| d.label.as_str());
    let reverts = session.records_of(RecordKind::SpuriousRevert).count();

    println!();
    println!("{}", "Summary".bold());
    println!("  selected: {selected}");
    println!("  reported: {reported}");
    println!("  status:   {:?}", session.status);
    println!("  reverts masked: {reverts}");
}

fn print_outcome(outcome: &ScenarioOutcome) {
    if outcome.passed() {
        println!("{} {}", "PASS".green().bold(), outcome.name);
    } else {
        println!("{} {}", "FAIL".red().bold(), outcome.name);
    }

    if let Some(error) = outcome.init_error {
        println!("  initialize refused: {error}");
    }
    for step in &outcome.steps {
        if let Some(kind) = step.rejection {
            println!("  step {}: rejected ({kind})", step.index);
        }
    }
    for (index, failure) in outcome.failures() {
        println!("  step {index}: {}", failure.red());
    }
}
