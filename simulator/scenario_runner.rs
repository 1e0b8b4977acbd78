// Scenario Runner - Load and execute scenario YAML files
//
// Usage:
//   cargo run --bin scenario_runner scenarios/csma_baseline.yaml
//   cargo run --bin scenario_runner scenarios/  (runs all .yaml files in directory)
//   cargo run --bin scenario_runner scenarios/csma_baseline.yaml --seed 0x1234...

use std::env;
use std::fs;
use std::path::Path;

use mac_sim::{
    mac_export, ComparisonRunner, ContentionEngine, Protocol, RandomStream,
    SimulationConfig,
};

/// Scenario file format
#[derive(Debug, serde::Deserialize)]
struct ScenarioFile {
    /// Scenario metadata
    #[serde(default)]
    meta: ScenarioMeta,

    /// Simulation configuration
    config: SimulationConfig,

    /// Optional multi-protocol comparison over the same base configuration
    #[serde(default)]
    comparison: Option<ComparisonSpec>,

    /// Optional output files
    #[serde(default)]
    output: OutputSpec,
}

#[derive(Debug, Default, serde::Deserialize)]
struct ScenarioMeta {
    name: Option<String>,
    description: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct ComparisonSpec {
    protocols: Vec<Protocol>,
    #[serde(default = "default_runs")]
    runs: usize,
}

#[derive(Debug, Default, serde::Deserialize)]
struct OutputSpec {
    /// Write the per-slot event table here
    events_csv: Option<String>,

    /// Write the averaged comparison table here
    comparison_csv: Option<String>,

    /// Write the plain-text report here
    report: Option<String>,
}

fn default_runs() -> usize {
    6
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!(
            "Usage: {} <scenario.yaml | directory/> [--seed SEED_HEX]",
            args[0]
        );
        eprintln!("\nExamples:");
        eprintln!("  {} scenarios/csma_baseline.yaml", args[0]);
        eprintln!("  {} scenarios/", args[0]);
        eprintln!("  {} scenarios/aloha_optimal.yaml --seed 0x2a2a...", args[0]);
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);

    // Parse optional seed override
    let seed: Option<[u8; 32]> = if args.len() >= 4 && args[2] == "--seed" {
        Some(parse_seed_hex(&args[3]))
    } else {
        None
    };

    if path.is_file() {
        run_scenario_file(path, seed);
    } else if path.is_dir() {
        run_scenario_directory(path, seed);
    } else {
        eprintln!("Error: Path does not exist: {}", path.display());
        std::process::exit(1);
    }
}

fn run_scenario_directory(dir: &Path, seed: Option<[u8; 32]>) {
    let mut scenarios = Vec::new();

    // Find all .yaml files
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            let ext = path.extension().and_then(|s| s.to_str());
            if ext == Some("yaml") || ext == Some("yml") {
                scenarios.push(path);
            }
        }
    }

    scenarios.sort();

    if scenarios.is_empty() {
        eprintln!("No .yaml files found in {}", dir.display());
        std::process::exit(1);
    }

    println!("Found {} scenario(s) to run\n", scenarios.len());

    for (i, scenario_path) in scenarios.iter().enumerate() {
        println!(
            "\n[{}/{}] Running: {}\n",
            i + 1,
            scenarios.len(),
            scenario_path.display()
        );
        run_scenario_file(scenario_path, seed);
    }

    println!("\nAll scenarios complete.");
}

fn run_scenario_file(path: &Path, seed: Option<[u8; 32]>) {
    println!("Loading scenario from: {}", path.display());

    let yaml_content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Failed to read {}: {}", path.display(), e);
        std::process::exit(1);
    });

    let scenario: ScenarioFile = serde_yaml::from_str(&yaml_content).unwrap_or_else(|e| {
        eprintln!("Failed to parse {}: {}", path.display(), e);
        std::process::exit(1);
    });

    if let Some(ref name) = scenario.meta.name {
        println!("\n== {} ==", name);
    }
    if let Some(ref desc) = scenario.meta.description {
        println!("{}\n", desc);
    }

    // A command-line seed overrides the scenario's
    let mut config = scenario.config;
    if seed.is_some() {
        config.seed = seed;
    }

    println!("Configuration:");
    println!("  Protocol: {}", config.protocol);
    println!("  Nodes: {}", config.num_nodes);
    println!("  Generation Probability: {}", config.gen_prob);
    println!("  Horizon: {} slots", config.horizon);
    println!("\nStarting simulation...");

    let engine = ContentionEngine::new(config.clone()).unwrap_or_else(|e| {
        eprintln!("Invalid scenario configuration: {}", e);
        std::process::exit(1);
    });
    let result = engine.run();
    result.print_summary();

    if let Some(ref csv_path) = scenario.output.events_csv {
        write_output(csv_path, &mac_export::event_csv(&result));
    }
    if let Some(ref report_path) = scenario.output.report {
        write_output(report_path, &mac_export::narrative_report(&result));
    }

    if let Some(ref spec) = scenario.comparison {
        let runner = ComparisonRunner::new(spec.protocols.clone(), spec.runs);
        let mut random = RandomStream::new(config.seed);
        match runner.run(&config, &mut random) {
            Ok(comparison) => {
                comparison.print_summary();
                if let Some(ref comp_path) = scenario.output.comparison_csv {
                    write_output(comp_path, &mac_export::comparison_csv(&comparison));
                }
            }
            Err(e) => eprintln!("Comparison failed: {}", e),
        }
    }

    println!("\nScenario complete.\n");
}

fn write_output(path: &str, contents: &str) {
    match fs::write(path, contents) {
        Ok(()) => println!("Wrote {}", path),
        Err(e) => eprintln!("Failed to write {}: {}", path, e),
    }
}

fn parse_seed_hex(hex: &str) -> [u8; 32] {
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    let mut seed = [0u8; 32];

    for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
        if i >= 32 {
            break;
        }
        let pair = std::str::from_utf8(chunk).unwrap_or_else(|_| {
            eprintln!("Invalid hex seed");
            std::process::exit(1);
        });
        seed[i] = u8::from_str_radix(pair, 16).unwrap_or_else(|e| {
            eprintln!("Invalid hex seed: {}", e);
            std::process::exit(1);
        });
    }

    seed
}
