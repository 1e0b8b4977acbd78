//! # mac-sim - MAC Protocol Contention Simulator
//!
//! Discrete-time simulation of Medium Access Control protocols over a shared
//! broadcast channel: independent nodes contend for transmission
//! opportunities, collide, and recover.
//!
//! ## Core Components
//!
//! - **ContentionEngine**: advances channel and nodes slot by slot under a
//!   protocol policy, producing an event log and per-node timelines
//! - **Metrics**: pure reduction of a run into throughput/efficiency/
//!   utilization statistics
//! - **ComparisonRunner**: repeated independent runs per protocol variant
//!   with averaged metrics
//! - **Export**: CSV event tables, comparison tables, and plain-text reports
//!
//! ## Usage
//!
//! ```
//! use mac_sim::{ContentionEngine, Protocol, SimulationConfig};
//!
//! let config = SimulationConfig {
//!     protocol: Protocol::SlottedAloha,
//!     num_nodes: 10,
//!     gen_prob: 0.1,
//!     horizon: 1000,
//!     seed: Some([42u8; 32]),
//!     ..Default::default()
//! };
//!
//! let result = ContentionEngine::new(config).unwrap().run();
//! assert_eq!(result.event_log.len(), 1000);
//! println!("throughput: {:.4}", result.metrics.throughput);
//! ```
//!
//! ## Simulation Programs
//!
//! Runnable scenario programs live in the `simulator/` directory; the
//! `scenario_runner` binary executes scenario YAML files from `scenarios/`.

// Core simulation modules
pub mod mac_compare;
pub mod mac_engine;
pub mod mac_export;
pub mod mac_interface;
pub mod mac_metrics;
pub mod mac_random;

// Re-export commonly used types
pub use mac_compare::{ComparisonResult, ComparisonRunner, ProtocolAverages};
pub use mac_engine::{ContentionEngine, SimulationResult};
pub use mac_export::CsvEventSink;
pub use mac_interface::{
    ConfigError, EventSink, NoOpSink, NodeId, NodeSlotState, Protocol,
    SimulationConfig, Slot, SlotClass, SlotEvent,
};
pub use mac_metrics::{Metrics, MetricsError};
pub use mac_random::RandomStream;
