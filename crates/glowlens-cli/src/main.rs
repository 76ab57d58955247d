use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use glowlens_contracts::events::EventWriter;
use glowlens_contracts::{AnalysisDomain, ImageAngle, ImageInput, ResultContract};
use glowlens_engine::descriptor::{
    BODY_SHAPE, EXERCISE, PERSONAL_COLOR, PROGRESS, SKIN, WORKOUT_TYPE,
};
use glowlens_engine::prompts::multi_angle_guidance;
use glowlens_engine::{
    deadline_for, AnalysisConfig, AnalysisOutcome, DomainDescriptor, JsonlObserver, ObserverSet,
    Orchestrator, TracingObserver,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "glowlens", version, about = "Glowlens analysis CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one analysis and print the result JSON.
    Analyze(AnalyzeArgs),
    /// Print the instruction text that would be sent to the provider.
    Prompt(PromptArgs),
    /// List analysis domains and their provider deadlines.
    Domains,
}

#[derive(Debug, Parser)]
struct AnalyzeArgs {
    #[arg(long)]
    domain: AnalysisDomain,
    /// JSON file holding the domain input.
    #[arg(long)]
    input: PathBuf,
    /// Primary photo. Required for skin, body_shape and personal_color.
    #[arg(long)]
    image: Option<PathBuf>,
    /// Extra photo as `angle=path`, e.g. `wrist=./wrist.jpg`.
    #[arg(long = "aux", value_parser = parse_aux_image)]
    aux: Vec<AuxImage>,
    /// Append analysis events to this JSONL file.
    #[arg(long)]
    events: Option<PathBuf>,
    #[arg(long)]
    force_mock: bool,
    /// Print `{source, reason, result}` instead of the bare result.
    #[arg(long)]
    outcome: bool,
}

#[derive(Debug, Parser)]
struct PromptArgs {
    #[arg(long)]
    domain: AnalysisDomain,
    #[arg(long)]
    input: PathBuf,
    /// Angle of an extra photo; repeat for several.
    #[arg(long = "angle")]
    angles: Vec<ImageAngle>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AuxImage {
    angle: ImageAngle,
    path: PathBuf,
}

fn parse_aux_image(raw: &str) -> Result<AuxImage, String> {
    let Some((angle, path)) = raw.split_once('=') else {
        return Err(format!("expected angle=path, got '{raw}'"));
    };
    let path = path.trim();
    if path.is_empty() {
        return Err(format!("missing path in '{raw}'"));
    }
    Ok(AuxImage {
        angle: angle.parse::<ImageAngle>()?,
        path: PathBuf::from(path),
    })
}

#[tokio::main]
async fn main() {
    init_tracing();
    match run(Cli::parse()).await {
        Ok(()) => {}
        Err(err) => {
            eprintln!("glowlens error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Analyze(args) => {
            let output = run_analyze(args, AnalysisConfig::from_env()).await?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Prompt(args) => println!("{}", run_prompt(&args)?),
        Command::Domains => {
            for domain in AnalysisDomain::ALL {
                println!(
                    "{:<24} {}s",
                    domain.as_str(),
                    deadline_for(domain).as_secs()
                );
            }
        }
    }
    Ok(())
}

/// `--force-mock` can only switch mocking on; it never overrides an
/// environment that already asks for it.
fn effective_config(config: AnalysisConfig, force_mock_flag: bool) -> AnalysisConfig {
    if force_mock_flag {
        config.with_force_mock(true)
    } else {
        config
    }
}

async fn run_analyze(args: AnalyzeArgs, config: AnalysisConfig) -> Result<Value> {
    let config = effective_config(config, args.force_mock);
    let mut orchestrator = Orchestrator::new(config);
    if let Some(path) = &args.events {
        let writer = EventWriter::new(path, uuid::Uuid::new_v4().to_string());
        let observers = ObserverSet::new()
            .with(TracingObserver)
            .with(JsonlObserver::new(writer));
        orchestrator = orchestrator.with_observer(Arc::new(observers));
    }
    debug!(
        domain = %args.domain,
        provider = orchestrator.provider_name(),
        "starting analysis"
    );

    let input = read_json(&args.input)?;
    let primary = args.image.as_deref().map(load_image).transpose()?;
    let auxiliary = args
        .aux
        .iter()
        .map(|aux| Ok(load_image(&aux.path)?.with_angle(aux.angle)))
        .collect::<Result<Vec<ImageInput>>>()?;
    if primary.is_none() && needs_photo(args.domain) {
        bail!("--image is required for {} analysis", args.domain);
    }

    let call = AnalyzeCall {
        orchestrator: &orchestrator,
        input,
        primary: primary.as_ref(),
        auxiliary: &auxiliary,
        outcome: args.outcome,
    };
    match args.domain {
        AnalysisDomain::Skin => call.run(&SKIN).await,
        AnalysisDomain::BodyShape => call.run(&BODY_SHAPE).await,
        AnalysisDomain::PersonalColor => call.run(&PERSONAL_COLOR).await,
        AnalysisDomain::WorkoutType => call.run(&WORKOUT_TYPE).await,
        AnalysisDomain::ExerciseRecommendation => call.run(&EXERCISE).await,
        AnalysisDomain::ProgressInsight => call.run(&PROGRESS).await,
    }
}

fn needs_photo(domain: AnalysisDomain) -> bool {
    matches!(
        domain,
        AnalysisDomain::Skin | AnalysisDomain::BodyShape | AnalysisDomain::PersonalColor
    )
}

struct AnalyzeCall<'a> {
    orchestrator: &'a Orchestrator,
    input: Value,
    primary: Option<&'a ImageInput>,
    auxiliary: &'a [ImageInput],
    outcome: bool,
}

impl AnalyzeCall<'_> {
    async fn run<I, R>(self, descriptor: &DomainDescriptor<I, R>) -> Result<Value>
    where
        I: Serialize + DeserializeOwned,
        R: ResultContract,
    {
        let input: I = serde_json::from_value(self.input)
            .with_context(|| format!("input is not a valid {} request", descriptor.domain))?;
        // text-only domains never get auxiliary photos
        let auxiliary: &[ImageInput] = if needs_photo(descriptor.domain) {
            self.auxiliary
        } else {
            &[]
        };
        let outcome = self
            .orchestrator
            .analyze_outcome(descriptor, &input, self.primary, auxiliary)
            .await?;
        render_outcome(outcome, self.outcome)
    }
}

fn render_outcome<R: Serialize>(outcome: AnalysisOutcome<R>, with_provenance: bool) -> Result<Value> {
    if !with_provenance {
        return Ok(serde_json::to_value(outcome.result())?);
    }
    let source = if outcome.is_fallback() {
        "fallback"
    } else {
        "provider"
    };
    let reason = outcome.fallback_reason().map(|kind| kind.as_str());
    Ok(json!({
        "source": source,
        "reason": reason,
        "result": serde_json::to_value(outcome.result())?,
    }))
}

fn run_prompt(args: &PromptArgs) -> Result<String> {
    let input = read_json(&args.input)?;
    let mut text = match args.domain {
        AnalysisDomain::Skin => render_template(&SKIN, input)?,
        AnalysisDomain::BodyShape => render_template(&BODY_SHAPE, input)?,
        AnalysisDomain::PersonalColor => render_template(&PERSONAL_COLOR, input)?,
        AnalysisDomain::WorkoutType => render_template(&WORKOUT_TYPE, input)?,
        AnalysisDomain::ExerciseRecommendation => render_template(&EXERCISE, input)?,
        AnalysisDomain::ProgressInsight => render_template(&PROGRESS, input)?,
    };
    let angles = args.angles.iter().copied().map(Some).collect::<Vec<_>>();
    if let Some(guidance) = multi_angle_guidance(args.domain, &angles) {
        text.push_str("\n\n");
        text.push_str(&guidance);
    }
    Ok(text)
}

fn render_template<I: DeserializeOwned, R>(
    descriptor: &DomainDescriptor<I, R>,
    input: Value,
) -> Result<String> {
    let input: I = serde_json::from_value(input)
        .with_context(|| format!("input is not a valid {} request", descriptor.domain))?;
    Ok((descriptor.template)(&input))
}

fn read_json(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path.display()))
}

fn load_image(path: &Path) -> Result<ImageInput> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(ImageInput::from_bytes(bytes))
}
