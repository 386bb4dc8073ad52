//! Satchel demo host
//!
//! Runs one authoritative inventory with a few loopback observers, drives a
//! short scripted session through the replication layer and dumps the
//! resulting states as JSON.
//!
//! Run with: cargo run -p satchel_host
//!       or: cargo run --bin satchel -- --config satchel.toml

mod config;

use std::error::Error;
use std::sync::Arc;

use config::SatchelConfig;
use satchel_core::{ItemTypeId, PeerId};
use satchel_inventory::prelude::*;
use satchel_net::{loopback_pair, AuthorityHost, ObserverClient};

const DEMO_CATALOG: &str = r#"
[[item]]
id = "iron_ore"
name = "Iron Ore"
description = "Smelts into iron bars"
weight = 2.0
max_stack = 10

[[item]]
id = "health_potion"
name = "Health Potion"
weight = 0.5
max_stack = 5
pickup = "pickup_potion"
tags = ["consumable"]

[[item]]
id = "iron_sword"
name = "Iron Sword"
weight = 6.0
stackable = false
pickup = "pickup_sword"
"#;

fn main() {
    let config = match SatchelConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_filter.as_str())
    ).init();

    config.print_summary();

    if let Err(e) = run(&config) {
        log::error!("Session failed: {}", e);
        std::process::exit(1);
    }
}

fn load_catalog(config: &SatchelConfig) -> Result<ItemCatalog, Box<dyn Error>> {
    let catalog = match &config.catalog {
        Some(path) => ItemCatalog::load(path)?,
        None => ItemCatalog::from_toml_str(DEMO_CATALOG)?,
    };
    log::info!("{} item types available", catalog.len());
    Ok(catalog)
}

fn run(config: &SatchelConfig) -> Result<(), Box<dyn Error>> {
    let catalog = Arc::new(load_catalog(config)?);

    let mut behaviors = BehaviorRegistry::new();
    for definition in catalog.iter().filter(|d| d.has_tag("consumable")) {
        behaviors.register(definition.id.clone(), ConsumeOnUse(1));
    }

    let inventory = Inventory::new(config.inventory).with_behaviors(Arc::new(behaviors));
    let inventory_id = inventory.id();
    let mut host = AuthorityHost::new(inventory, CollectingDropSink::new())?;

    let mut observers = Vec::with_capacity(config.observers);
    for index in 0..config.observers {
        let peer = PeerId::new(format!("observer-{}", index));
        let (server_end, client_end) = loopback_pair();
        host.connect(peer.clone(), Box::new(server_end))?;
        observers.push(ObserverClient::new(
            peer,
            inventory_id,
            config.inventory,
            Arc::clone(&catalog),
            Box::new(client_end),
        ));
    }

    // Server-side loot
    for definition in catalog.iter() {
        let quantity = if definition.stackable { definition.max_stack + 3 } else { 1 };
        let result = host.inventory_mut().try_add_from_catalog(&catalog, &definition.id, quantity);
        log::info!(
            "Added {} x{}: {:?} {}",
            definition.id,
            result.actual_amount_given,
            result.outcome,
            result.message
        );
    }
    tick(&mut host, &mut observers)?;

    // Observers act through the authority
    if let Some(observer) = observers.first_mut() {
        let potion = ItemTypeId::new("health_potion");
        if let Some(item) = observer.inventory().find_first_by_type(&potion).map(|i| i.id()) {
            observer.use_item(item)?;
        }
        if let Some(item) = observer.inventory().items().first().map(|i| i.id()) {
            observer.drop_item(item, 2)?;
        }
    }
    tick(&mut host, &mut observers)?;

    for dropped in host.sink().drops() {
        log::info!(
            "World pickup {} x{} from {}",
            dropped.pickup().unwrap_or("<none>"),
            dropped.quantity,
            dropped.from
        );
    }

    println!("{}", serde_json::to_string_pretty(&host.inventory().snapshot())?);
    for observer in &observers {
        let converged = observer.inventory().items_key() == host.inventory().items_key();
        log::info!("{} converged: {}", observer.peer(), converged);
    }

    let stats = host.replicator().stats();
    log::info!(
        "Replication: {} passes, {} deltas, {} item states",
        stats.passes,
        stats.deltas,
        stats.items_sent
    );
    Ok(())
}

fn tick(
    host: &mut AuthorityHost<CollectingDropSink>,
    observers: &mut [ObserverClient],
) -> Result<(), Box<dyn Error>> {
    host.tick()?;
    for observer in observers.iter_mut() {
        observer.poll()?;
    }
    Ok(())
}
