// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Test program: Poll a thermostat and print every refresh.
//!
//! Optionally writes a new target temperature after the first refresh.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example monitor -- <host> <username> <password> [room] [target]
//! ```
//!
//! # Example
//!
//! ```bash
//! cargo run --example monitor -- 192.168.1.40 T0012AB secret Kitchen 21.5
//! ```

use std::env;
use std::time::Duration;

use airobot_lib::entity::sensors_for;
use airobot_lib::subscription::Subscribable;
use airobot_lib::{Coordinator, RefreshEvent, ThermostatClimate, ThermostatConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();

    if !(4..=6).contains(&args.len()) {
        eprintln!("Usage: {} <host> <username> <password> [room] [target]", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  cargo run --example monitor -- 192.168.1.40 T0012AB secret Kitchen 21.5");
        std::process::exit(1);
    }

    let mut config = ThermostatConfig::new(&args[1], &args[2], &args[3]);
    if let Some(room) = args.get(4) {
        config = config.with_room(room);
    }
    let target: Option<f64> = args.get(5).map(|t| t.parse()).transpose()?;

    let coordinator = Coordinator::from_config(&config)?;
    println!("Connecting to {}...", config.host());

    coordinator.on_refresh(|event| match event {
        RefreshEvent::Updated(state) => println!(
            "air {:?} °C | floor {:?} °C | humidity {:?} % | CO2 {:?} ppm | target {} °C ({}) | heating {}",
            state.air_temperature(),
            state.floor_temperature(),
            state.humidity(),
            state.co2_ppm(),
            state.setpoint_temperature(),
            state.preset_mode(),
            state.is_heating(),
        ),
        RefreshEvent::Failed { error, .. } => {
            println!("Refresh failed ({:?}): {error}", error.kind());
        }
    });

    let poller = coordinator.start(config.poll_interval()).await?;
    println!("Connected! Polling every {:?}", poller.interval());

    let climate = ThermostatClimate::new(coordinator.clone());
    println!("{} ({})", climate.name(), climate.unique_id());
    for sensor in sensors_for(&coordinator) {
        match sensor.value() {
            Some(value) => println!(
                "  {}: {value} {}",
                sensor.name(),
                sensor.unit().unwrap_or_default()
            ),
            None => println!("  {}: unavailable", sensor.name()),
        }
    }

    if let Some(target) = target {
        println!("Setting target temperature to {target} °C...");
        match climate.set_temperature(Some(target)).await {
            Ok(()) => println!("Target accepted, visible after the next refresh"),
            Err(e) => println!("Target rejected: {e}"),
        }
    }

    println!("Polling for 2 minutes...");
    tokio::time::sleep(Duration::from_secs(120)).await;

    println!("Stopping...");
    poller.stop().await;

    println!("Done!");
    Ok(())
}
