//! Launch command - resolves the gate and reports the resulting flow

use std::path::Path;

use anyhow::{Context, Result};
use healthscope_core::{AppConfig, GateDecision, GateResolver, GateState};

use super::open_store;

pub async fn cmd_launch(data_dir: &Path, config_path: Option<&Path>) -> Result<()> {
    // --config must exist; <data dir>/config.toml is optional
    let config = match config_path {
        Some(path) => AppConfig::load(Some(path)),
        None => AppConfig::load_optional(&data_dir.join("config.toml")),
    }
    .context("Failed to load configuration")?;
    tracing::debug!(endpoint = %config.gate.endpoint, "Gate configuration loaded");

    let store = open_store(data_dir)?;
    let resolver = GateResolver::new(config.gate.clone(), store.clone())
        .context("Failed to build HTTP client")?;

    if let GateState::Pending { cached } = resolver.state() {
        println!("🚀 Launching (last decision: {})...", cached);
    }

    let decision = resolver.resolve().await;

    match decision {
        GateDecision::ShowWeb => {
            println!("🌐 Web experience");
            println!("   Open: {}", config.gate.endpoint);
        }
        GateDecision::ShowNative => {
            println!("📱 Native experience");
            if store.has_completed_onboarding() {
                let name = store
                    .load_profile()
                    .map(|p| p.name)
                    .unwrap_or_else(|| "there".to_string());
                println!("   Welcome back, {}!", name);
                println!();
                println!("   Log a symptom:  healthscope log headache --severity mild");
                println!("   See insights:   healthscope insights");
            } else {
                println!();
                println!("Next steps:");
                println!("  1. Create your profile: healthscope onboard --name <NAME>");
                println!("  2. Log a symptom: healthscope log headache --severity mild");
            }
        }
    }

    Ok(())
}
