use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What went into a report: run parameters and input files.
pub struct Payload {
    pub params: Value,
    pub inputs: Vec<String>,
}

impl Payload {
    pub fn new(params: Value) -> Self {
        Self {
            params,
            inputs: Vec::new(),
        }
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.inputs.push(input.into());
        self
    }
}

/// Provenance block shared by the sidecar and `cli report`.
pub fn block(payload: &Payload, outputs: &[String]) -> Value {
    json!({
        "code_rev": current_git_rev(),
        "linea_version": linea::VERSION,
        "inputs": payload.inputs,
        "params": payload.params,
        "outputs": outputs,
    })
}

/// Write `<stem>.provenance.json` next to `artifact`, recording the callsite.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let callsite = Location::caller();
    let artifact = artifact.as_ref();
    let target = provenance_path(artifact);
    if let Some(dir) = target.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let mut doc = block(&payload, &[artifact.display().to_string()]);
    doc["callsite"] = json!({ "file": callsite.file(), "line": callsite.line() });
    fs::write(&target, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", target.display()))?;
    Ok(target)
}

fn provenance_path(artifact: &Path) -> PathBuf {
    let mut name: OsString = artifact.file_stem().unwrap_or("report".as_ref()).to_owned();
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// Build-time `GIT_COMMIT`, then runtime `GIT_COMMIT`, then `git rev-parse HEAD`.
pub fn current_git_rev() -> String {
    let non_empty = |s: &str| !s.is_empty();
    option_env!("GIT_COMMIT")
        .filter(|s| non_empty(s))
        .map(str::to_owned)
        .or_else(|| std::env::var("GIT_COMMIT").ok().filter(|s| non_empty(s)))
        .or_else(git_head)
        .unwrap_or_else(|| "unknown".to_owned())
}

fn git_head() -> Option<String> {
    let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
    if !out.status.success() {
        return None;
    }
    String::from_utf8(out.stdout).ok().map(|s| s.trim().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn provenance_path_replaces_extension() {
        let derived = provenance_path(Path::new("/tmp/output/square.json"));
        assert_eq!(derived, Path::new("/tmp/output/square.provenance.json"));
    }

    #[test]
    fn sidecar_records_inputs_and_outputs() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("report.json");
        fs::write(&artifact, "{}").unwrap();
        let payload = Payload::new(json!({"precision": 1e-6})).with_input("square.csv");
        let prov_path = write_sidecar(&artifact, payload).unwrap();
        assert!(prov_path.ends_with("report.provenance.json"));
        let parsed: Value = serde_json::from_slice(&fs::read(prov_path).unwrap()).unwrap();
        assert_eq!(parsed["outputs"][0], artifact.display().to_string());
        assert_eq!(parsed["inputs"][0], "square.csv");
        assert_eq!(parsed["linea_version"], linea::VERSION);
        assert!(parsed["callsite"]["line"].as_u64().is_some());
    }
}
