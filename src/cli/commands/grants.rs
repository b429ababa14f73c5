use serde_json::json;
use std::path::Path;

use crate::capability::{decide_grants, validate_manifest_capabilities};
use crate::cli::OutputFormat;
use crate::plugin::PluginManifest;

pub fn handle(manifest_path: &Path, output_format: OutputFormat) -> anyhow::Result<()> {
    let manifest = PluginManifest::from_yaml_file(manifest_path)?;
    let decision = decide_grants(&manifest);
    let validation = validate_manifest_capabilities(&manifest);

    match output_format {
        OutputFormat::Json => {
            let payload = json!({
                "success": validation.valid,
                "data": decision,
                "errors": validation.errors,
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        OutputFormat::Text => {
            println!("Plugin: {} (tier {})", manifest.plugin_id, manifest.tier);

            for capability in &decision.granted {
                println!("  granted  {}", capability);
            }
            for token in &decision.denied {
                let reason = decision
                    .reasons
                    .get(token)
                    .map(|r| r.as_str())
                    .unwrap_or("denied");
                println!("  denied   {} ({})", token, reason);
            }

            if validation.valid {
                println!("Manifest valid: every requested capability would be granted");
            } else {
                println!("Manifest invalid: {} capability requests would be denied", validation.errors.len());
            }
        }
    }

    Ok(())
}
