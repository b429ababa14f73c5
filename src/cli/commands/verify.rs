use serde_json::json;

use crate::boot;
use crate::cli::OutputFormat;
use crate::plugin::builtin_plugins;

pub fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let plugins = builtin_plugins();
    let platform = boot::boot(&plugins)?;
    let report = platform.report();

    match output_format {
        OutputFormat::Json => {
            let payload = json!({
                "success": true,
                "data": {
                    "plugins": report.plugins,
                    "samples_checked": report.samples_checked,
                    "elapsed_ms": report.elapsed.as_millis(),
                }
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        OutputFormat::Text => {
            println!(
                "Boot verification passed: {} plugins, {} entitlement samples in {:?}",
                report.plugins, report.samples_checked, report.elapsed
            );
        }
    }

    Ok(())
}
