use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use hashbrown::HashMap;
use once_cell::sync::Lazy;
use serde::Deserialize;

pub mod backend;
pub mod engine;

pub use backend::{BackendLog, DrawCall, MockTexture, RecordingBackend, Upload};
pub use engine::{DocMarker, Document, EngineLog, MockEngine, MockEngineFactory};

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    animations: HashMap<String, String>,
    bundles: HashMap<String, String>,
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

fn lookup<'a>(map: &'a HashMap<String, String>, kind: &str, name: &str) -> Result<&'a str> {
    map.get(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Single-animation documents.
pub mod animations {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.animations.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.animations, "animation", name)?;
        read_to_string(rel)
    }

    pub fn document(name: &str) -> Result<Document> {
        let text = json(name)?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse animation fixture {name}"))
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.animations, "animation", name)?;
        Ok(resolve_path(rel))
    }
}

/// Multi-animation bundle archives (`.lottie`).
pub mod bundles {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.bundles.keys().cloned().collect()
    }

    pub fn bytes(name: &str) -> Result<Vec<u8>> {
        let path = path(name)?;
        fs::read(&path).with_context(|| format!("failed to read bundle at {}", path.display()))
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.bundles, "bundle", name)?;
        Ok(resolve_path(rel))
    }
}
