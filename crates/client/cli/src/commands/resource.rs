use anyhow::Result;
use clap::{Parser, ValueEnum};

use super::Context;

/// Restore, deplete, recharge, consume or replenish a resource
#[derive(Parser)]
pub struct ResourceCmd {
    #[arg(value_name = "RESOURCE")]
    name: String,

    #[arg(value_enum)]
    action: ResourceAction,

    /// Amount for consume / replenish / set
    #[arg(value_name = "AMOUNT", allow_negative_numbers = true)]
    amount: Option<f64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ResourceAction {
    Restore,
    Deplete,
    Recharge,
    Consume,
    Replenish,
    Set,
    /// Turn periodic recharge on
    Enable,
    /// Turn periodic recharge off
    Disable,
}

impl ResourceCmd {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let mut sheet = ctx.sheet()?;
        let name = self.name.as_str();
        let amount = || {
            self.amount
                .ok_or_else(|| anyhow::anyhow!("this action needs an AMOUNT"))
        };

        match self.action {
            ResourceAction::Restore => {
                sheet.restore(name)?;
            }
            ResourceAction::Deplete => {
                sheet.deplete(name)?;
            }
            ResourceAction::Recharge => {
                sheet.recharge(name)?;
            }
            ResourceAction::Consume => {
                sheet.consume(name, amount()?)?;
            }
            ResourceAction::Replenish => {
                sheet.replenish(name, amount()?)?;
            }
            ResourceAction::Set => {
                sheet.set_current(name, amount()?)?;
            }
            ResourceAction::Enable => {
                sheet.toggle_recharge(name, true)?;
            }
            ResourceAction::Disable => {
                sheet.toggle_recharge(name, false)?;
            }
        }

        let current = sheet.resource(name)?.current_value();
        let percentage = sheet.percentage(name)? * 100.0;
        println!("{name}: {current:.2} ({percentage:.0}%)");
        Ok(())
    }
}
