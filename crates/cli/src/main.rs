mod provenance;
mod scenario;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use lasso::api::{lasso_stroke, target_field, Entity, LassoCfg, LassoReplay, LassoShape};
use scenario::{RecordedStroke, Report, Scenario};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

#[derive(Parser)]
#[command(name = "lasso-cli")]
#[command(about = "Replay and inspect draw-a-loop sessions")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Replay a recorded scenario and write a JSON report
    Replay {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
        /// Config JSON overriding the scenario's own
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Synthesize lassos over a seeded target field and replay them
    Demo {
        #[arg(long, default_value_t = 2025)]
        seed: u64,
        #[arg(long, default_value_t = 4)]
        count: usize,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the default config and crate version
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Replay { input, out, config } => replay(&input, out.as_deref(), config.as_deref()),
        Action::Demo { seed, count, out } => demo(seed, count, out.as_deref()),
        Action::Report => report(),
    }
}

fn replay(input: &Path, out: Option<&Path>, config: Option<&Path>) -> Result<()> {
    tracing::info!(input = %input.display(), "replay");
    let scenario = Scenario::load(input)?;
    let cfg = config.map(load_config).transpose()?;
    let report = scenario::run(&scenario, cfg)?;
    let mut payload = provenance::Payload::new(
        "replay",
        serde_json::json!({ "frames": report.frames, "strokes": scenario.strokes.len() }),
    )
    .with_input(input);
    if let Some(path) = config {
        payload = payload.with_input(path);
    }
    emit(&report, out, payload)
}

fn demo(seed: u64, count: usize, out: Option<&Path>) -> Result<()> {
    if count == 0 {
        bail!("--count must be at least 1");
    }
    tracing::info!(seed, count, "demo");
    let targets = target_field(count, 6.0, LassoReplay::new(seed, 0));
    let mut tok = LassoReplay::new(seed, 1);
    let mut strokes = Vec::with_capacity(count);
    let mut start_frame = 0;
    for (i, center) in targets.iter().enumerate() {
        let shape = LassoShape {
            center: *center,
            ..LassoShape::default()
        };
        let points: Vec<_> = lasso_stroke(&shape, tok).into_iter().map(|(p, _)| p).collect();
        tok = tok.next();
        let len = points.len() as u64;
        strokes.push(RecordedStroke {
            pointer: i as u32,
            start_frame,
            points,
            release: true,
        });
        start_frame += len + 2;
    }
    let scenario = Scenario {
        config: None,
        entities: targets.iter().map(|p| Entity::health(*p, 5, 2)).collect(),
        policies: Vec::new(),
        strokes,
        settle_frames: 120,
    };
    let report = scenario::run(&scenario, None)?;
    let payload =
        provenance::Payload::new("demo", serde_json::json!({ "seed": seed, "count": count }));
    emit(&report, out, payload)
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "lasso_version": lasso::VERSION,
        "config": LassoCfg::default(),
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn load_config(path: &Path) -> Result<LassoCfg> {
    let bytes =
        std::fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
    let cfg: LassoCfg = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing config {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validating config {}", path.display()))?;
    Ok(cfg)
}

/// Write the report (plus provenance) to `out`, or print a summary.
fn emit(report: &Report, out: Option<&Path>, payload: provenance::Payload) -> Result<()> {
    let Some(out) = out else {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "frames": report.frames,
                "loops": report.loops,
                "score": report.score,
                "boss_defeated": report.boss_defeated,
                "remaining_entities": report.entities.len(),
            }))?
        );
        return Ok(());
    };
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    std::fs::write(out, serde_json::to_vec_pretty(report)?)
        .with_context(|| format!("writing {}", out.display()))?;
    let prov = provenance::write_sidecar(out, payload)?;
    tracing::info!(out = %out.display(), provenance = %prov.display(), "report written");
    Ok(())
}
