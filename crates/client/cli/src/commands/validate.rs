use anyhow::Result;
use clap::Parser;

use super::Context;

/// Check content files without touching the store
#[derive(Parser)]
pub struct Validate;

impl Validate {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let factory = ctx.factory();
        let config = factory.load_config()?;
        let registry = factory.load_formulas()?;
        let template = factory.load_template()?;

        println!("content: {}", factory.data_dir().display());
        println!(
            "  categories: {} / {}",
            config.attributes_category, config.resources_category
        );
        println!("  formulas:   {} entries, acyclic", registry.len());
        println!(
            "  template:   {} attributes, {} resources",
            template.attributes.len(),
            template.resources.len()
        );
        Ok(())
    }
}
