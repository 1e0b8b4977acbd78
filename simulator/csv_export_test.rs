// CSV Export Test - Stream slot events to a CSV file during a run, then
// write the batch event table and narrative report alongside it
//
// Run with: cargo run --example csv_export_test

use log::info;
use simple_logger::SimpleLogger;

use mac_sim::{mac_export, ContentionEngine, CsvEventSink, Protocol, SimulationConfig};

fn main() {
    SimpleLogger::new().init().unwrap();

    let config = SimulationConfig {
        protocol: Protocol::SlottedAloha,
        num_nodes: 10,
        gen_prob: 0.1,
        horizon: 2000,
        seed: Some([55u8; 32]),
        ..Default::default()
    };

    info!("running {} with a streaming CSV sink", config.protocol);

    let mut sink = match CsvEventSink::new("aloha_events.csv", config.protocol) {
        Ok(sink) => sink,
        Err(e) => {
            eprintln!("failed to create aloha_events.csv: {}", e);
            std::process::exit(1);
        }
    };

    let engine = match ContentionEngine::new(config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let result = engine.run_with_sink(&mut sink);
    if let Err(e) = sink.flush() {
        eprintln!("failed to flush aloha_events.csv: {}", e);
    }
    drop(sink);

    result.print_summary();
    info!("streamed {} slot events to aloha_events.csv", result.event_log.len());

    if let Err(e) = std::fs::write("aloha_report.txt", mac_export::narrative_report(&result)) {
        eprintln!("failed to write aloha_report.txt: {}", e);
    } else {
        info!("wrote aloha_report.txt");
    }
}
