// Protocol Comparison - Average the CSMA variants and the CSMA/CA variants
// over repeated runs with a shared base configuration
//
// Run with: cargo run --example protocol_comparison

use log::info;
use simple_logger::SimpleLogger;

use mac_sim::{mac_export, ComparisonRunner, RandomStream, SimulationConfig};

const RUNS_PER_PROTOCOL: usize = 10;

fn main() {
    SimpleLogger::new().init().unwrap();

    let base = SimulationConfig {
        num_nodes: 10,
        gen_prob: 0.15,
        horizon: 1000,
        seed: Some([33u8; 32]),
        ..Default::default()
    };

    info!(
        "comparing protocols: {} nodes, p={}, {} slots, {} runs each",
        base.num_nodes, base.gen_prob, base.horizon, RUNS_PER_PROTOCOL
    );

    let mut random = RandomStream::new(base.seed);

    let csma = ComparisonRunner::csma_comparison(RUNS_PER_PROTOCOL)
        .run(&base, &mut random)
        .expect("base config is valid");
    csma.print_summary();

    let csma_ca = ComparisonRunner::csma_ca_comparison(RUNS_PER_PROTOCOL)
        .run(&base, &mut random)
        .expect("base config is valid");
    csma_ca.print_summary();

    println!("\nCSMA comparison table:\n{}", mac_export::comparison_csv(&csma));
    println!("CSMA/CA comparison table:\n{}", mac_export::comparison_csv(&csma_ca));
}
