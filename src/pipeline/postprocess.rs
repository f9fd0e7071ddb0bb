//! Cross-domain post-processing.
//!
//! Runs once after every requested domain has completed, never interleaved
//! with per-domain generation: the aggregate barrels cover the union of
//! what all domains produced, and a per-domain run would see an incomplete
//! set. Inputs are the structured production records the pipeline
//! collected, not the emitted files themselves.

use super::RunSummary;
use crate::error::{Error, Result};
use crate::generators::templates::BarrelTemplate;
use crate::layout::Layout;
use askama::Template;
use std::collections::{BTreeMap, BTreeSet};

/// Write one aggregate barrel per layer, re-exporting every domain that
/// produced files under it this run.
pub(super) fn write_aggregate_barrels(
    layout: &Layout,
    produced: &BTreeMap<String, BTreeSet<String>>,
    summary: &mut RunSummary,
) -> Result<()> {
    for (layer, domains) in produced {
        if domains.is_empty() {
            continue;
        }
        let exports = domains.iter().map(|d| format!("./{d}")).collect();
        let rendered = BarrelTemplate { exports }.render()?;
        let path = layout.layer(layer)?.base_path.join("index.ts");
        crate::generators::write_file(&path, &rendered)?;
        summary.files.push(path);
    }
    Ok(())
}

/// Run the configured build command, when one is configured.
///
/// The command runs once, after all barrels are in place. A non-zero exit
/// is fatal; there is nothing sensible to generate past a broken build.
pub(super) fn run_build_command(config: &crate::config::ProjectConfig) -> Result<()> {
    let Some(command) = &config.project.build_command else {
        return Ok(());
    };
    tracing::info!(command = %command, "running build command");
    let status = std::process::Command::new("sh")
        .arg("-c")
        .arg(command)
        .status()
        .map_err(|e| Error::generation("post-processing", "build", e.to_string()))?;
    if !status.success() {
        return Err(Error::generation(
            "post-processing",
            "build",
            format!("build command '{command}' exited with {status}"),
        ));
    }
    Ok(())
}
