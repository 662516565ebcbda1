#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** Quest Chronicles **
//! A turn-based text RPG

use chronicles_engine::config::CONFIG_FILE;
use chronicles_engine::data_paths::{data_path, data_root};
use chronicles_engine::style::GameStyle;
use chronicles_engine::{CHRONICLES_VERSION, Session, load_catalog, load_config, run_repl};

use anyhow::{Context, Result};
use colored::Colorize;

use log::info;

fn main() -> Result<()> {
    env_logger::init();
    info!("Start: reading configuration and catalogs from {}", data_root().display());
    let config = load_config(&data_path(CONFIG_FILE));
    let quests_path = config.quests_path(data_root());
    let items_path = config.items_path(data_root());
    let catalog = load_catalog(&quests_path, &items_path).context("while loading the quest and item catalogs")?;
    info!(
        "Catalogs loaded: {} quests, {} items",
        catalog.quests.len(),
        catalog.items.len()
    );

    println!("{:^60}", "QUEST CHRONICLES".title_style());
    println!("{:^60}\n", format!("v{CHRONICLES_VERSION}").dimmed());
    println!(
        "{}",
        "Create a hero with `new <name> <class>` or continue one with `load <name>`.".description_style()
    );

    let mut session = Session::new(catalog, config);
    run_repl(&mut session)
}
