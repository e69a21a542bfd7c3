use anyhow::Result;
use clap::Parser;
use sheet_core::{Modifier, OriginRef};

use super::Context;

/// Set the stored value of a base attribute
#[derive(Parser)]
pub struct Set {
    #[arg(value_name = "ATTRIBUTE")]
    name: String,

    #[arg(value_name = "VALUE", allow_negative_numbers = true)]
    value: f64,
}

impl Set {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let mut sheet = ctx.sheet()?;
        let stored = sheet.set_base(&self.name, self.value)?;
        println!(
            "{} base = {stored} (effective {})",
            self.name,
            sheet.value(&self.name)?
        );
        Ok(())
    }
}

/// Add or remove a modifier on an attribute
#[derive(Parser)]
pub struct Modify {
    #[arg(value_name = "ATTRIBUTE")]
    name: String,

    /// One of + - * /
    #[arg(value_name = "OP", allow_hyphen_values = true)]
    operator: String,

    #[arg(value_name = "VALUE", allow_negative_numbers = true)]
    value: f64,

    #[arg(value_name = "DESCRIPTION")]
    description: String,

    /// Origin as `<id>:<kind>`, e.g. `17:Item`
    #[arg(long, value_name = "ID:KIND")]
    origin: Option<String>,

    /// Remove a matching modifier instead of adding one
    #[arg(long)]
    remove: bool,
}

impl Modify {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let origin = self.origin.as_deref().map(parse_origin).transpose()?;
        let modifier = Modifier::from_symbol(&self.operator, self.value, self.description, origin)?;

        let mut sheet = ctx.sheet()?;
        if self.remove {
            sheet.remove_modifier(&self.name, &modifier)?;
        } else {
            sheet.add_modifier(&self.name, modifier)?;
        }
        println!("{} = {}", self.name, sheet.value(&self.name)?);
        Ok(())
    }
}

fn parse_origin(raw: &str) -> Result<OriginRef> {
    let (id, kind) = raw
        .split_once(':')
        .ok_or_else(|| anyhow::anyhow!("origin must look like <id>:<kind>, got {raw:?}"))?;
    Ok(OriginRef::new(id.trim().parse()?, kind.trim()))
}
