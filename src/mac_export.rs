//! Delimited-text and report export
//!
//! Serializes run results into the tabular shapes consumed downstream:
//! per-slot event CSVs (column order and one row per slot preserved exactly
//! as produced by the engine), a comparison CSV, and a plain-text narrative
//! report. Also provides a streaming CSV sink for capturing events during a
//! run.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::mac_compare::ComparisonResult;
use crate::mac_engine::SimulationResult;
use crate::mac_interface::{EventSink, Protocol, SlotClass, SlotEvent};

// ============================================================================
// Event tables
// ============================================================================

/// Row label for a slot in the CSMA event table
fn csma_event_label(class: &SlotClass) -> String {
    match class {
        SlotClass::Idle => "Idle".to_string(),
        SlotClass::Busy => "Busy".to_string(),
        SlotClass::Success(node) => format!("Success (Node {})", node),
        SlotClass::Collision(_) => "Collision".to_string(),
    }
}

/// CSMA-family event table: `Event,Time Slot`, one row per slot
pub fn csma_event_csv(result: &SimulationResult) -> String {
    let mut csv = String::from("Event,Time Slot\n");
    for event in &result.event_log {
        let _ = writeln!(csv, "{},{}", csma_event_label(&event.class), event.slot);
    }
    csv
}

/// Slotted ALOHA event table: `Slot,Num Transmissions,Status`
pub fn aloha_event_csv(result: &SimulationResult) -> String {
    let mut csv = String::from("Slot,Num Transmissions,Status\n");
    for event in &result.event_log {
        let _ = writeln!(
            csv,
            "{},{},{}",
            event.slot,
            event.class.num_transmissions(),
            event.class.label()
        );
    }
    csv
}

/// Event table in the shape matching the run's protocol family
pub fn event_csv(result: &SimulationResult) -> String {
    if result.config.protocol.is_aloha() {
        aloha_event_csv(result)
    } else {
        csma_event_csv(result)
    }
}

/// Averaged comparison table, one row per protocol
pub fn comparison_csv(comparison: &ComparisonResult) -> String {
    let mut csv = String::from(
        "Protocol,Avg Efficiency (%),Avg Throughput (pkts/slot),Avg Utilization (%)\n",
    );
    for (protocol, avg) in &comparison.averages {
        let _ = writeln!(
            csv,
            "{},{:.3},{:.6},{:.3}",
            protocol,
            avg.efficiency * 100.0,
            avg.throughput,
            avg.utilization * 100.0
        );
    }
    csv
}

// ============================================================================
// Narrative report
// ============================================================================

/// Plain-text report of one run: parameters, metrics, slot distribution
pub fn narrative_report(result: &SimulationResult) -> String {
    let metrics = &result.metrics;
    let horizon = result.event_log.len();
    let rate = |count: usize| count as f64 / horizon as f64 * 100.0;

    let mut report = String::new();
    let _ = writeln!(report, "NETWORK PROTOCOL SIMULATION REPORT");
    let _ = writeln!(report, "========================================");
    let _ = writeln!(report);
    let _ = writeln!(report, "1. SIMULATION PARAMETERS");
    let _ = writeln!(report, "----------------------------------------");
    let _ = writeln!(report, "Protocol: {}", result.config.protocol);
    let _ = writeln!(report, "Duration: {} time slots", horizon);
    let _ = writeln!(report);
    let _ = writeln!(report, "Number of Nodes: {}", result.config.num_nodes);
    let _ = writeln!(report, "Generation Probability: {}", result.config.gen_prob);
    let _ = writeln!(report, "Propagation Delay: {} slots", result.config.prop_delay);
    let _ = writeln!(report, "Transmission Time: {} slots", result.config.tx_time);
    let _ = writeln!(report);
    let _ = writeln!(report, "2. RESULTS");
    let _ = writeln!(report, "----------------------------------------");
    let _ = writeln!(report, "Throughput (S): {:.4}", metrics.throughput);
    let _ = writeln!(report, "Efficiency: {:.2}%", metrics.efficiency * 100.0);
    let _ = writeln!(report, "Success Rate: {:.1}%", rate(metrics.success_count));
    let _ = writeln!(
        report,
        "Collision Rate: {:.1}%",
        rate(metrics.collision_count)
    );
    let _ = writeln!(report, "Idle Rate: {:.1}%", rate(metrics.idle_slots));
    let _ = writeln!(
        report,
        "Channel Utilization: {:.2}%",
        metrics.utilization * 100.0
    );
    if let (Some(g), Some(s)) = (metrics.offered_load, metrics.theoretical_throughput)
    {
        let _ = writeln!(report, "Offered Load (G): {:.3}", g);
        let _ = writeln!(report, "Theoretical Throughput (G*e^-G): {:.4}", s);
    }
    let _ = writeln!(report);
    let _ = writeln!(report, "3. SLOT DISTRIBUTION");
    let _ = writeln!(report, "----------------------------------------");
    let _ = writeln!(report, "Idle: {}", metrics.idle_slots);
    let _ = writeln!(report, "Busy: {}", metrics.busy_slots);
    let _ = writeln!(report, "Success: {}", metrics.success_count);
    let _ = writeln!(report, "Collision: {}", metrics.collision_count);
    let _ = writeln!(report, "========================================");
    report
}

// ============================================================================
// Streaming CSV Sink
// ============================================================================

/// Event sink that streams slot events to a CSV file as the engine runs
///
/// The header (and row shape) follows the protocol family the sink is
/// created for, matching the batch exporters above.
pub struct CsvEventSink {
    writer: BufWriter<File>,
    aloha: bool,
}

impl CsvEventSink {
    pub fn new<P: AsRef<Path>>(path: P, protocol: Protocol) -> std::io::Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        let aloha = protocol.is_aloha();
        if aloha {
            writeln!(writer, "Slot,Num Transmissions,Status")?;
        } else {
            writeln!(writer, "Event,Time Slot")?;
        }

        Ok(Self { writer, aloha })
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

impl EventSink for CsvEventSink {
    fn log(&mut self, event: &SlotEvent) {
        let result = if self.aloha {
            writeln!(
                self.writer,
                "{},{},{}",
                event.slot,
                event.class.num_transmissions(),
                event.class.label()
            )
        } else {
            writeln!(
                self.writer,
                "{},{}",
                csma_event_label(&event.class),
                event.slot
            )
        };

        if let Err(e) = result {
            eprintln!("Error writing to CSV: {}", e);
        }
    }
}

impl Drop for CsvEventSink {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mac_compare::ComparisonRunner;
    use crate::mac_engine::ContentionEngine;
    use crate::mac_interface::SimulationConfig;
    use crate::mac_random::RandomStream;

    fn run(protocol: Protocol) -> SimulationResult {
        ContentionEngine::new(SimulationConfig {
            protocol,
            num_nodes: 4,
            gen_prob: 0.3,
            horizon: 50,
            seed: Some([8u8; 32]),
            ..Default::default()
        })
        .unwrap()
        .run()
    }

    #[test]
    fn test_csma_event_csv_shape() {
        let result = run(Protocol::OnePersistentCsma);
        let csv = csma_event_csv(&result);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Event,Time Slot");
        assert_eq!(lines.len(), 51); // header + one row per slot
        for (i, line) in lines[1..].iter().enumerate() {
            assert!(line.ends_with(&format!(",{}", i)), "row {}: {}", i, line);
        }
    }

    #[test]
    fn test_csma_success_rows_name_the_node() {
        let result = run(Protocol::OnePersistentCsma);
        let csv = csma_event_csv(&result);

        for event in &result.event_log {
            if let SlotClass::Success(node) = &event.class {
                assert!(csv.contains(&format!("Success (Node {}),{}", node, event.slot)));
            }
        }
    }

    #[test]
    fn test_aloha_event_csv_shape() {
        let result = run(Protocol::SlottedAloha);
        let csv = aloha_event_csv(&result);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Slot,Num Transmissions,Status");
        assert_eq!(lines.len(), 51);

        for (event, line) in result.event_log.iter().zip(&lines[1..]) {
            let fields: Vec<&str> = line.split(',').collect();
            assert_eq!(fields[0], event.slot.to_string());
            assert_eq!(fields[1], event.class.num_transmissions().to_string());
            assert_eq!(fields[2], event.class.label());
        }
    }

    #[test]
    fn test_event_csv_dispatches_by_family() {
        assert!(event_csv(&run(Protocol::SlottedAloha))
            .starts_with("Slot,Num Transmissions,Status"));
        assert!(event_csv(&run(Protocol::BasicCsmaCa)).starts_with("Event,Time Slot"));
    }

    #[test]
    fn test_comparison_csv_one_row_per_protocol() {
        let runner = ComparisonRunner::csma_comparison(2);
        let mut random = RandomStream::new(Some([4u8; 32]));
        let comparison = runner
            .run(&SimulationConfig::default(), &mut random)
            .unwrap();

        let csv = comparison_csv(&comparison);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "Protocol,Avg Efficiency (%),Avg Throughput (pkts/slot),Avg Utilization (%)"
        );
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("1-Persistent CSMA,"));
    }

    #[test]
    fn test_narrative_report_sections() {
        let result = run(Protocol::SlottedAloha);
        let report = narrative_report(&result);

        assert!(report.contains("NETWORK PROTOCOL SIMULATION REPORT"));
        assert!(report.contains("1. SIMULATION PARAMETERS"));
        assert!(report.contains("2. RESULTS"));
        assert!(report.contains("3. SLOT DISTRIBUTION"));
        assert!(report.contains("Protocol: Slotted ALOHA"));
        assert!(report.contains("Offered Load (G):"));
    }

    #[test]
    fn test_csv_sink_matches_batch_export() {
        let path = std::env::temp_dir().join("mac_sim_sink_test.csv");

        let config = SimulationConfig {
            protocol: Protocol::PPersistentCsma,
            horizon: 40,
            seed: Some([21u8; 32]),
            ..Default::default()
        };

        let mut sink = CsvEventSink::new(&path, config.protocol).unwrap();
        let result = ContentionEngine::new(config)
            .unwrap()
            .run_with_sink(&mut sink);
        sink.flush().unwrap();
        drop(sink);

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, csma_event_csv(&result));
        let _ = std::fs::remove_file(&path);
    }
}
