use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use sheet_runtime::{RechargeScheduler, SharedSheet, TokioScheduler};

use super::Context;

/// Run recharge timers for a while
#[derive(Parser)]
pub struct Recharge {
    /// How long to keep the timers running
    #[arg(short, long, value_name = "SECONDS", default_value_t = 10)]
    seconds: u64,
}

impl Recharge {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let sheet = SharedSheet::new(ctx.sheet()?);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;

        runtime.block_on(async {
            let mut recharge = RechargeScheduler::new(TokioScheduler::new()?, sheet.clone());
            let started = recharge.resume_all()?;
            println!("running {started} recharge timers for {}s", self.seconds);
            tracing::info!(started, seconds = self.seconds, "recharge session started");

            tokio::time::sleep(Duration::from_secs(self.seconds)).await;
            anyhow::Ok(())
        })?;

        let names = sheet.with(|s| s.resources().names())?;
        for name in names {
            let current = sheet.with(|s| Ok(s.resource(&name)?.current_value()))?;
            println!("{name}: {current:.2}");
        }
        Ok(())
    }
}
