use log::info;
use simple_logger::SimpleLogger;

use mac_sim::{
    mac_export, ComparisonRunner, ContentionEngine, RandomStream, SimulationConfig,
};

fn main() {
    SimpleLogger::new().init().unwrap();

    info!("starting");

    // Single run with the default CSMA parameters
    let config = SimulationConfig::default();
    info!(
        "running {}: {} nodes, p={}, {} slots",
        config.protocol, config.num_nodes, config.gen_prob, config.horizon
    );

    let result = match ContentionEngine::new(config) {
        Ok(engine) => engine.run(),
        Err(e) => {
            eprintln!("invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    result.print_summary();

    // Averaged comparison across the CSMA variants
    let runner = ComparisonRunner::csma_comparison(6);
    let mut random = RandomStream::new(None);
    match runner.run(&SimulationConfig::default(), &mut random) {
        Ok(comparison) => {
            comparison.print_summary();
            print!("\n{}", mac_export::comparison_csv(&comparison));
        }
        Err(e) => eprintln!("comparison failed: {}", e),
    }
}
