// Basic Simulation - Single 1-Persistent CSMA run with default parameters
//
// Run with: cargo run --example basic_simulation

use log::info;
use simple_logger::SimpleLogger;

use mac_sim::{ContentionEngine, SimulationConfig};

fn main() {
    SimpleLogger::new().init().unwrap();

    let config = SimulationConfig::default();
    info!(
        "running {}: {} nodes, p={}, {} slots",
        config.protocol, config.num_nodes, config.gen_prob, config.horizon
    );

    let engine = match ContentionEngine::new(config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let result = engine.run();
    result.print_summary();

    // Reproduce the run later with:
    //   cargo run --bin scenario_runner scenarios/csma_baseline.yaml --seed 0x<hex>
    let hex: String = result.seed_used.iter().map(|b| format!("{:02x}", b)).collect();
    info!("seed used: 0x{}", hex);
}
