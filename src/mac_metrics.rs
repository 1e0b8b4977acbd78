//! Metrics aggregation
//!
//! Pure reduction of a simulation run into summary statistics. Efficiency
//! and throughput are both success/horizon today; they are kept as separate
//! fields because alternate throughput definitions (bits/sec) may diverge
//! later. Offered load and the G·e^-G closed form apply to Slotted ALOHA
//! only; CSMA variants are compared empirically.

use hashbrown::HashMap;
use std::fmt;

use crate::mac_engine::SimulationResult;
use crate::mac_interface::{Protocol, SimulationConfig, SlotClass, SlotEvent};

/// Summary statistics derived from one run's event log
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    /// Successful transmissions per slot
    pub efficiency: f64,

    /// Successful transmissions per slot (see module docs)
    pub throughput: f64,

    /// Fraction of slots where the channel was not idle
    pub utilization: f64,

    pub success_count: usize,
    pub collision_count: usize,
    pub idle_slots: usize,
    pub busy_slots: usize,

    /// Offered load G = N * p; Slotted ALOHA only
    pub offered_load: Option<f64>,

    /// Closed-form throughput G * e^-G; Slotted ALOHA only
    pub theoretical_throughput: Option<f64>,

    /// Slot classification label -> count, feeds status distribution views
    pub slot_class_counts: HashMap<&'static str, usize>,
}

impl Metrics {
    /// Derive metrics from a finished run
    ///
    /// Errors on an empty event log rather than producing NaN metrics;
    /// engine-produced results always have at least one slot.
    pub fn from_result(result: &SimulationResult) -> Result<Metrics, MetricsError> {
        if result.event_log.is_empty() {
            return Err(MetricsError::EmptyLog);
        }
        Ok(Self::compute(&result.config, &result.event_log))
    }

    /// Reduction over a non-empty event log
    pub(crate) fn compute(config: &SimulationConfig, log: &[SlotEvent]) -> Metrics {
        let horizon = log.len() as f64;

        let mut slot_class_counts: HashMap<&'static str, usize> = HashMap::new();
        for event in log {
            *slot_class_counts.entry(event.class.label()).or_insert(0) += 1;
        }

        let success_count = slot_class_counts.get("Success").copied().unwrap_or(0);
        let collision_count = slot_class_counts.get("Collision").copied().unwrap_or(0);
        let idle_slots = slot_class_counts.get("Idle").copied().unwrap_or(0);
        let busy_slots = slot_class_counts.get("Busy").copied().unwrap_or(0);

        let efficiency = success_count as f64 / horizon;
        let throughput = success_count as f64 / horizon;
        let utilization = (log.len() - idle_slots) as f64 / horizon;

        let (offered_load, theoretical_throughput) =
            if config.protocol == Protocol::SlottedAloha {
                let g = config.num_nodes as f64 * config.gen_prob;
                (Some(g), Some(g * (-g).exp()))
            } else {
                (None, None)
            };

        Metrics {
            efficiency,
            throughput,
            utilization,
            success_count,
            collision_count,
            idle_slots,
            busy_slots,
            offered_load,
            theoretical_throughput,
            slot_class_counts,
        }
    }
}

/// Errors raised by the aggregator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    /// The event log was empty (horizon precondition violated upstream)
    EmptyLog,
}

impl fmt::Display for MetricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricsError::EmptyLog => {
                write!(f, "cannot aggregate metrics over an empty event log")
            }
        }
    }
}

impl std::error::Error for MetricsError {}
