use anyhow::Result;
use clap::Parser;
use serde_json::json;

use super::Context;

/// Print attribute values and resource levels
#[derive(Parser)]
pub struct Show {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Aligned text
    Table,
    /// Effective values as JSON
    Json,
    /// Persisted records as JSON
    Records,
}

impl Show {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let mut sheet = ctx.sheet()?;
        let values = sheet.attributes().values()?;

        let mut resources = Vec::new();
        for name in sheet.resources().names()? {
            let current = sheet.resource(&name)?.current_value();
            let max = sheet.effective_max(&name)?;
            let recharging = sheet.resource(&name)?.recharge_enabled();
            resources.push((name, current, max, recharging));
        }

        match self.format {
            OutputFormat::Table => {
                println!("{}", sheet.owner());
                println!("attributes:");
                for (name, value) in &values {
                    let marker = if sheet.attributes().get(name)?.is_derived() { "=" } else { " " };
                    println!("  {marker} {name:<20} {value:>10.2}");
                }
                println!("resources:");
                for (name, current, max, recharging) in &resources {
                    let marker = if *recharging { "+" } else { " " };
                    println!("  {marker} {name:<20} {current:>10.2} / {max:.2}");
                }
            }
            OutputFormat::Json => {
                let attributes: serde_json::Map<_, _> = values
                    .iter()
                    .map(|(name, value)| (name.clone(), json!(value)))
                    .collect();
                let resources: serde_json::Map<_, _> = resources
                    .iter()
                    .map(|(name, current, max, recharging)| {
                        (
                            name.clone(),
                            json!({ "current": current, "max": max, "recharging": recharging }),
                        )
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "owner": sheet.owner().0,
                        "attributes": attributes,
                        "resources": resources,
                    }))?
                );
            }
            OutputFormat::Records => {
                let mut records = Vec::new();
                for attribute in sheet.attributes().all()? {
                    records.push(serde_json::to_value(sheet_core::Record::from(attribute.to_record()))?);
                }
                for resource in sheet.resources().all()? {
                    records.push(serde_json::to_value(sheet_core::Record::from(resource.to_record()))?);
                }
                println!("{}", serde_json::to_string_pretty(&records)?);
            }
        }
        Ok(())
    }
}
