//! Polygon input files.
//!
//! Formats (by extension)
//! - `.json`: `{ "points": [[x, y, z], ...], "normal": [x, y, z] }`, `normal`
//!   optional.
//! - `.csv` / `.parquet`: one row per vertex, columns `x`, `y` and optionally
//!   `z` (missing `z` means the polygon lies in the xy-plane). Any numeric
//!   column type is accepted.

use anyhow::{bail, Context, Result};
use linea::api::{GeomCfg, Plane, Polygon};
use linea::Vec3;
use polars::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Vertex loop plus an optional supporting-plane normal.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PolygonSpec {
    pub points: Vec<[f64; 3]>,
    #[serde(default)]
    pub normal: Option<[f64; 3]>,
}

impl PolygonSpec {
    pub fn build(&self, cfg: GeomCfg) -> Result<Polygon> {
        let pts: Vec<Vec3<f64>> = self.points.iter().map(|&p| Vec3::from(p)).collect();
        let plane = match (self.normal, pts.first()) {
            (Some(n), Some(&anchor)) => Some(Plane::new(anchor, Vec3::from(n))?),
            _ => None,
        };
        Polygon::with_cfg(&pts, plane, cfg).context("building polygon")
    }
}

pub fn load_polygon(path: &Path) -> Result<PolygonSpec> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "json" => {
            let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
        }
        "csv" => {
            let lf = LazyCsvReader::new(path)
                .with_infer_schema_length(Some(100))
                .finish()?;
            load_table(lf).with_context(|| format!("loading {}", path.display()))
        }
        "parquet" => {
            let lf = LazyFrame::scan_parquet(path, ScanArgsParquet::default())?;
            load_table(lf).with_context(|| format!("loading {}", path.display()))
        }
        other => bail!("unsupported input extension `{other}` (expected json, csv or parquet)"),
    }
}

fn load_table(lf: LazyFrame) -> Result<PolygonSpec> {
    let df = lf.collect()?;
    let xs = column_f64(&df, "x")?;
    let ys = column_f64(&df, "y")?;
    let zs = if df.column("z").is_ok() {
        column_f64(&df, "z")?
    } else {
        vec![0.0; xs.len()]
    };
    tracing::debug!(rows = df.height(), has_z = df.column("z").is_ok(), "table_loaded");
    let points = xs
        .into_iter()
        .zip(ys)
        .zip(zs)
        .map(|((x, y), z)| [x, y, z])
        .collect();
    Ok(PolygonSpec {
        points,
        normal: None,
    })
}

fn column_f64(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let s = df
        .column(name)
        .with_context(|| format!("missing column `{name}`"))?
        .cast(&DataType::Float64)?;
    let ca = s.f64()?;
    ca.into_iter()
        .enumerate()
        .map(|(row, v)| v.with_context(|| format!("null in column `{name}` at row {row}")))
        .collect()
}

/// Parse a probe point `x,y,z` (or `x,y`, with `z = 0`).
pub fn parse_point(s: &str) -> std::result::Result<[f64; 3], String> {
    let parts = s
        .split(',')
        .map(|t| t.trim().parse::<f64>().map_err(|e| format!("`{t}`: {e}")))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    match parts[..] {
        [x, y] => Ok([x, y, 0.0]),
        [x, y, z] => Ok([x, y, z]),
        _ => Err(format!("expected 2 or 3 comma-separated numbers, got `{s}`")),
    }
}
