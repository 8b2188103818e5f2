//! ItemStats - Entry Point
//!
//! Loads the stats config, reports what was registered and renders a sample
//! window packet through the interception pipeline.
//!
//! Usage: `itemstats [CONFIG] [--export-defaults]`

use std::path::PathBuf;

use anyhow::{Context, Result};

use itemstats::config;
use itemstats::items::{ItemStack, NamespacedKey};
use itemstats::protocol::{Packet, WindowItems};
use itemstats::ItemStats;

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    )
    .init();

    log::info!("Starting ItemStats v{}", env!("CARGO_PKG_VERSION"));

    let mut export = false;
    let mut config_path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--export-defaults" => export = true,
            _ => config_path = Some(PathBuf::from(arg)),
        }
    }
    let config_path = config_path.unwrap_or_else(config::default_config_path);

    if export {
        config::export_defaults(&config_path)
            .with_context(|| format!("exporting defaults to {}", config_path.display()))?;
        return Ok(());
    }

    let plugin = ItemStats::enable(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    for stat in plugin.registry().values() {
        log::info!("Registered stat {} ({})", stat.key(), stat.config_name());
    }

    let packet = sample_packet(&plugin)?;
    println!("{}", serde_json::to_string_pretty(&packet)?);
    Ok(())
}

/// A hotbar with one tracked sword, sent through the pipeline
fn sample_packet(plugin: &ItemStats) -> Result<Packet> {
    let mut sword = ItemStack::new("DIAMOND_SWORD").with_lore(["Forged in the deep"]);
    let response = plugin.activestat("console", Some(&mut sword), &["Kills".to_string()]);
    log::info!("activestat -> {}", response.message_key());

    let kills = NamespacedKey::itemstats("kills")?;
    plugin.record(&mut sword, &kills, 3.0)?;

    let mut packet = Packet::WindowItems(WindowItems {
        window_id: 0,
        state_id: 1,
        items: Some(vec![ItemStack::empty(), sword, ItemStack::new("TORCH")]),
        carried: ItemStack::empty(),
    });
    plugin.pipeline().dispatch_outgoing(&mut packet);
    Ok(packet)
}
