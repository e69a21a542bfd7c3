use anyhow::Result;
use clap::Parser;

use super::Context;

/// Add the template's starting attributes and resources
#[derive(Parser)]
pub struct Seed {
    /// Remove every existing attribute and resource first
    #[arg(long)]
    reset: bool,
}

impl Seed {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let mut sheet = ctx.sheet()?;
        if self.reset {
            let removed = sheet.resources().clear()? + sheet.attributes().clear()?;
            println!("removed {removed} entries");
        }

        let added = ctx.factory().load_template()?.seed(&mut sheet)?;
        println!("seeded {} with {added} new entries", sheet.owner());
        Ok(())
    }
}
