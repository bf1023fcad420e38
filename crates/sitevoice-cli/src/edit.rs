use anyhow::Context;
use serde_json::Value;
use std::path::Path;

use sitevoice_config::Config;
use sitevoice_engine::Editor;
use sitevoice_types::{EditRequest, Mode};

fn read_plan(path: &Path) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read plan file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse plan file: {}", path.display()))
}

pub(crate) async fn run_edit_command(
    config: &Config,
    mode: Mode,
    command: Vec<String>,
    plan: Option<&Path>,
) -> anyhow::Result<()> {
    let plan = plan.map(read_plan).transpose()?;
    let editor = Editor::from_config(config)?;
    let response = editor
        .handle(EditRequest {
            mode: Some(mode.to_string()),
            command: Some(command.join(" ")),
            plan,
        })
        .await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

pub(crate) fn show_config(config: &Config) -> anyhow::Result<()> {
    let current_dir = std::env::current_dir()?;
    println!("Working directory: {}", current_dir.display());
    println!("{}", serde_json::to_string_pretty(&config.redacted())?);
    Ok(())
}
