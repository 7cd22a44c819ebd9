use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use linea::api::{GeomCfg, PRECISION};
use std::path::Path;
use tracing_subscriber::fmt::SubscriberBuilder;

mod input;
mod provenance;
mod summary;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Polygon triangulation and containment runner")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Load a polygon, ear-clip it and probe point containment
    Polygon {
        /// Vertex file (.json, .csv or .parquet)
        #[arg(long)]
        input: String,
        /// Probe point `x,y,z` (repeatable)
        #[arg(long = "point", value_parser = input::parse_point)]
        points: Vec<[f64; 3]>,
        /// Tolerance for all approximate predicates
        #[arg(long, default_value_t = PRECISION)]
        precision: f64,
        /// Seed for ear-tip draws
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Write the JSON report here (plus a provenance sidecar) instead of stdout
        #[arg(long)]
        out: Option<String>,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Polygon {
            input,
            points,
            precision,
            seed,
            out,
        } => polygon(input, points, precision, seed, out),
        Action::Report => report(),
    }
}

fn polygon(
    input: String,
    points: Vec<[f64; 3]>,
    precision: f64,
    seed: u64,
    out: Option<String>,
) -> Result<()> {
    tracing::info!(input = %input, probes = points.len(), precision, seed, out = ?out, "polygon");
    let spec = input::load_polygon(Path::new(&input))?;
    let cfg = GeomCfg {
        ear_seed: seed,
        ..GeomCfg::with_precision(precision)
    };
    let mut poly = spec.build(cfg)?;
    let report = summary::summarize(&mut poly, &points);
    tracing::info!(
        vertices = report.vertices,
        reflex = report.reflex,
        area = report.area,
        triangles = report.triangles.as_ref().map(Vec::len),
        "polygon_done"
    );
    let text = serde_json::to_string_pretty(&report)?;

    let Some(out) = out else {
        println!("{text}");
        return Ok(());
    };
    let out_path = Path::new(&out);
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    std::fs::write(out_path, text).with_context(|| format!("writing {out}"))?;
    let payload = provenance::Payload::new(serde_json::json!({
        "precision": precision,
        "seed": seed,
        "probes": points,
    }))
    .with_input(input);
    let prov_path = provenance::write_sidecar(out_path, payload)?;
    tracing::info!(out = %out, provenance = %prov_path.display(), "written");
    Ok(())
}

fn report() -> Result<()> {
    let obj = provenance::block(&provenance::Payload::new(serde_json::json!({})), &[]);
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
