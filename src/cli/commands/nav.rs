use uuid::Uuid;

use crate::boot;
use crate::cli::OutputFormat;
use crate::entitlement::EntitlementContext;
use crate::nav::model::{NavModel, NavTarget, ALL_AREAS};
use crate::plugin::builtin_plugins;

pub fn handle(
    role: String,
    entitlements: Vec<String>,
    tier_level: u8,
    multi_tenant: bool,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let plugins = builtin_plugins();
    let platform = boot::boot(&plugins)?;

    let ctx = EntitlementContext::new(
        Uuid::new_v4(),
        role,
        entitlements.into_iter().collect(),
        "local",
        tier_level,
        multi_tenant,
    );

    let model = platform.nav_for(&ctx)?;

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&model)?),
        OutputFormat::Text => print_model(&model),
    }

    Ok(())
}

fn print_model(model: &NavModel) {
    for area in ALL_AREAS {
        println!("{}:", area);
        for section in model.area(*area) {
            match &section.heading {
                Some(heading) => println!("  [{}] {} (order {})", section.id, heading, section.order),
                None => println!("  [{}] (order {})", section.id, section.order),
            }
            for item in &section.items {
                let target = match &item.target {
                    NavTarget::Href(href) => format!("-> {}", href),
                    NavTarget::Action(action) => format!("!> {}", action),
                };
                println!("    {} {} {}", item.id, item.label, target);
            }
        }
    }
}
