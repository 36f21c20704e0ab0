//! Example: load the built-in catalog and print it grouped by category.
//!
//! Pass a directory to list definitions loaded from TOML files instead.

use repscout_targets::{SelectorTable, TargetLoader, TargetRegistry};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = match std::env::args().nth(1) {
        Some(dir) => {
            println!("Loading target definitions from {dir}...\n");
            TargetRegistry::load_from(&TargetLoader::new(dir)?)?
        }
        None => TargetRegistry::builtin()?,
    };
    let selectors = SelectorTable::builtin()?;

    println!("{} targets, {} enabled\n", registry.count(), registry.list_enabled().len());

    for category in registry.categories() {
        println!("{category}:");
        for target in registry.list_by_category(category) {
            let selector_note = if target.has_locator() && selectors.has_dedicated(&target.slug) {
                " [dedicated selectors]"
            } else {
                ""
            };
            println!(
                "  - {} ({}) strategy={} rate={}/min{}",
                target.name, target.slug, target.strategy, target.rate_limit, selector_note
            );
        }
        println!();
    }

    Ok(())
}
