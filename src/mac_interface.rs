//! Shared types for the MAC contention simulator
//!
//! Defines the vocabulary used across the engine, metrics and export layers:
//! protocol variants, slot classifications, the per-slot event record, and
//! the simulation configuration with its validation rules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Node identifier (index into the engine's node arena)
pub type NodeId = usize;

/// Discrete time slot index
pub type Slot = usize;

// ============================================================================
// Protocol Variants
// ============================================================================

/// Supported MAC protocol variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    /// Transmits immediately when the channel is sensed free
    OnePersistentCsma,

    /// Draws a random wait before re-sensing a busy channel
    NonPersistentCsma,

    /// Transmits with a fixed probability when the channel is free (CSMA/CD)
    PPersistentCsma,

    /// Collision avoidance with fixed-range backoff
    BasicCsmaCa,

    /// Collision avoidance with an RTS/CTS channel reservation handshake
    RtsCtsCsmaCa,

    /// Slot-synchronized random access, no carrier sensing
    SlottedAloha,
}

impl Protocol {
    /// All CSMA/CD-family variants, in comparison display order
    pub const CSMA_VARIANTS: [Protocol; 3] = [
        Protocol::OnePersistentCsma,
        Protocol::NonPersistentCsma,
        Protocol::PPersistentCsma,
    ];

    /// Both CSMA/CA variants
    pub const CSMA_CA_VARIANTS: [Protocol; 2] =
        [Protocol::BasicCsmaCa, Protocol::RtsCtsCsmaCa];

    /// True for the slotted random-access path (no carrier sensing, no backoff)
    pub fn is_aloha(&self) -> bool {
        matches!(self, Protocol::SlottedAloha)
    }

    /// True for variants that escalate backoff exponentially on collision
    pub fn uses_exponential_backoff(&self) -> bool {
        matches!(
            self,
            Protocol::OnePersistentCsma
                | Protocol::NonPersistentCsma
                | Protocol::PPersistentCsma
        )
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Protocol::OnePersistentCsma => "1-Persistent CSMA",
            Protocol::NonPersistentCsma => "Non-Persistent CSMA",
            Protocol::PPersistentCsma => "p-Persistent CSMA (CSMA/CD)",
            Protocol::BasicCsmaCa => "Basic CSMA/CA",
            Protocol::RtsCtsCsmaCa => "CSMA/CA with RTS/CTS",
            Protocol::SlottedAloha => "Slotted ALOHA",
        };
        write!(f, "{}", label)
    }
}

// ============================================================================
// Slot Classification
// ============================================================================

/// Outcome of a single simulated slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotClass {
    /// No node attempted transmission
    Idle,

    /// The channel was occupied by an ongoing transmission
    Busy,

    /// Exactly one node transmitted
    Success(NodeId),

    /// Two or more nodes transmitted simultaneously
    Collision(Vec<NodeId>),
}

impl SlotClass {
    /// Short status label used in tables and exports
    pub fn label(&self) -> &'static str {
        match self {
            SlotClass::Idle => "Idle",
            SlotClass::Busy => "Busy",
            SlotClass::Success(_) => "Success",
            SlotClass::Collision(_) => "Collision",
        }
    }

    /// Number of nodes transmitting in this slot
    pub fn num_transmissions(&self) -> usize {
        match self {
            SlotClass::Idle | SlotClass::Busy => 0,
            SlotClass::Success(_) => 1,
            SlotClass::Collision(nodes) => nodes.len(),
        }
    }
}

/// Per-node state within one slot, used to build timelines
///
/// The numeric codes (0/1/2) are the values consumed by Gantt-style
/// timeline renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeSlotState {
    Idle,
    Success,
    Collision,
}

impl NodeSlotState {
    pub fn code(&self) -> u8 {
        match self {
            NodeSlotState::Idle => 0,
            NodeSlotState::Success => 1,
            NodeSlotState::Collision => 2,
        }
    }
}

/// One entry of the append-only event log: a slot and its classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotEvent {
    pub slot: Slot,
    pub class: SlotClass,
}

// ============================================================================
// Event Sink
// ============================================================================

/// Observer for per-slot events, called once per slot as the engine runs
///
/// Sinks see events in slot order and must not assume anything beyond the
/// event itself; the engine owns all simulation state.
pub trait EventSink {
    fn log(&mut self, event: &SlotEvent);
}

/// Sink that discards all events
pub struct NoOpSink;

impl EventSink for NoOpSink {
    fn log(&mut self, _event: &SlotEvent) {}
}

// ============================================================================
// Simulation Configuration
// ============================================================================

/// Immutable input for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of contending nodes (at least 2)
    pub num_nodes: usize,

    /// Per-slot packet generation probability (transmission probability
    /// for Slotted ALOHA), in [0, 1]
    pub gen_prob: f64,

    /// Propagation delay in slots; carried into reports, the slot is the
    /// unit of propagation in this model
    #[serde(default)]
    pub prop_delay: f64,

    /// Packet transmission time in slots
    #[serde(default = "default_tx_time")]
    pub tx_time: f64,

    /// Total number of slots to simulate
    pub horizon: usize,

    /// Protocol variant to apply
    pub protocol: Protocol,

    /// Random seed for reproducibility; a process-random seed is drawn
    /// (and recorded in the result) when absent
    #[serde(default)]
    pub seed: Option<[u8; 32]>,
}

fn default_tx_time() -> f64 {
    1.0
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_nodes: 6,
            gen_prob: 0.12,
            prop_delay: 0.0,
            tx_time: 1.0,
            horizon: 400,
            protocol: Protocol::OnePersistentCsma,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Check structural validity before a run is allowed to start
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_nodes < 2 {
            return Err(ConfigError::TooFewNodes {
                got: self.num_nodes,
            });
        }
        if !self.gen_prob.is_finite() || !(0.0..=1.0).contains(&self.gen_prob) {
            return Err(ConfigError::InvalidProbability {
                got: self.gen_prob,
            });
        }
        if self.horizon < 1 {
            return Err(ConfigError::EmptyHorizon);
        }
        if !self.tx_time.is_finite() || self.tx_time <= 0.0 {
            return Err(ConfigError::NonPositiveTxTime { got: self.tx_time });
        }
        if !self.prop_delay.is_finite() || self.prop_delay < 0.0 {
            return Err(ConfigError::NegativePropDelay {
                got: self.prop_delay,
            });
        }
        Ok(())
    }
}

/// Errors raised for structurally invalid configurations
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Contention is undefined for fewer than two nodes
    TooFewNodes { got: usize },

    /// Generation probability outside [0, 1]
    InvalidProbability { got: f64 },

    /// Simulation horizon must cover at least one slot
    EmptyHorizon,

    /// Transmission time must be a positive number of slots
    NonPositiveTxTime { got: f64 },

    /// Propagation delay cannot be negative
    NegativePropDelay { got: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::TooFewNodes { got } => {
                write!(f, "at least 2 nodes are required, got {}", got)
            }
            ConfigError::InvalidProbability { got } => {
                write!(f, "generation probability must be in [0, 1], got {}", got)
            }
            ConfigError::EmptyHorizon => {
                write!(f, "simulation horizon must be at least 1 slot")
            }
            ConfigError::NonPositiveTxTime { got } => {
                write!(f, "transmission time must be positive, got {}", got)
            }
            ConfigError::NegativePropDelay { got } => {
                write!(f, "propagation delay cannot be negative, got {}", got)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(SimulationConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_single_node() {
        let config = SimulationConfig {
            num_nodes: 1,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooFewNodes { got: 1 })
        );
    }

    #[test]
    fn test_rejects_probability_out_of_range() {
        let config = SimulationConfig {
            gen_prob: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidProbability { .. })
        ));

        let config = SimulationConfig {
            gen_prob: -0.01,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidProbability { .. })
        ));
    }

    #[test]
    fn test_accepts_degenerate_probabilities() {
        for p in [0.0, 1.0] {
            let config = SimulationConfig {
                gen_prob: p,
                ..Default::default()
            };
            assert_eq!(config.validate(), Ok(()));
        }
    }

    #[test]
    fn test_rejects_zero_horizon() {
        let config = SimulationConfig {
            horizon: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyHorizon));
    }

    #[test]
    fn test_rejects_zero_tx_time() {
        let config = SimulationConfig {
            tx_time: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveTxTime { .. })
        ));
    }

    #[test]
    fn test_protocol_labels() {
        assert_eq!(
            Protocol::PPersistentCsma.to_string(),
            "p-Persistent CSMA (CSMA/CD)"
        );
        assert_eq!(Protocol::SlottedAloha.to_string(), "Slotted ALOHA");
    }

    #[test]
    fn test_slot_class_transmission_counts() {
        assert_eq!(SlotClass::Idle.num_transmissions(), 0);
        assert_eq!(SlotClass::Busy.num_transmissions(), 0);
        assert_eq!(SlotClass::Success(3).num_transmissions(), 1);
        assert_eq!(SlotClass::Collision(vec![0, 2, 4]).num_transmissions(), 3);
    }

    #[test]
    fn test_config_yaml_round_trip() {
        let config = SimulationConfig {
            protocol: Protocol::SlottedAloha,
            num_nodes: 10,
            gen_prob: 0.1,
            horizon: 1000,
            ..Default::default()
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: SimulationConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, config);
    }
}
