use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    curves: HashMap<String, CurveEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CurveEntry {
    Path(String),
    Detailed {
        path: String,
        #[serde(default)]
        description: Option<String>,
    },
}

impl CurveEntry {
    fn as_path(&self) -> &str {
        match self {
            CurveEntry::Path(path) => path,
            CurveEntry::Detailed { path, .. } => path,
        }
    }
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod curves {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.curves.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.curves, "curve", name)?;
        read_to_string(entry.as_path())
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&MANIFEST.curves, "curve", name)?;
        super::load_json(entry.as_path())
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let entry = lookup(&MANIFEST.curves, "curve", name)?;
        Ok(resolve_path(entry.as_path()))
    }

    pub fn description(name: &str) -> Result<Option<String>> {
        match lookup(&MANIFEST.curves, "curve", name)? {
            CurveEntry::Path(_) => Ok(None),
            CurveEntry::Detailed { description, .. } => Ok(description.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_manifest_entry_resolves() {
        for name in curves::keys() {
            let path = curves::path(&name).unwrap();
            assert!(path.exists(), "missing fixture file {}", path.display());
        }
    }

    #[test]
    fn unknown_fixture_is_an_error() {
        let err = curves::json("no-such-curve").unwrap_err();
        assert!(err.to_string().contains("no-such-curve"));
    }
}
