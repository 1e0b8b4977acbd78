//! Contention engine
//!
//! Advances a shared channel and N independent nodes through discrete time
//! slots under one of the supported protocol policies, producing an
//! append-only event log and per-node timelines.
//!
//! All CSMA-family variants share a single parameterized slot loop; policy
//! differences (busy-channel reaction, channel hold durations, backoff
//! distribution) are dispatched per variant. Slotted ALOHA is a separate,
//! simpler path: no carrier sensing, no backoff, every slot independently
//! resolved.

use log::debug;

use crate::mac_interface::{
    ConfigError, EventSink, NodeId, NodeSlotState, NoOpSink, Protocol,
    SimulationConfig, SlotClass, SlotEvent,
};
use crate::mac_metrics::Metrics;
use crate::mac_random::RandomStream;

/// Attempt counter cap bounding the exponential backoff window
const MAX_BACKOFF_EXPONENT: u32 = 10;

/// Fixed sensing probability for the p-persistent variant
const P_SENSE: f64 = 0.4;

/// Backoff range (slots) drawn by non-persistent nodes sensing a busy channel
const NON_PERSISTENT_WAIT: (u32, u32) = (2, 8);

/// Fixed collision backoff range for the CSMA/CA variants
const CSMA_CA_BACKOFF: (u32, u32) = (1, 8);

// ============================================================================
// Node and Channel State
// ============================================================================

/// Per-node mutable record, indexed by node id
#[derive(Debug, Clone, Default)]
struct NodeState {
    /// Node holds an undelivered packet
    ready: bool,

    /// Slots remaining before the node may contend again
    backoff: u32,

    /// Consecutive retransmission attempts, drives the backoff window
    attempts: u32,
}

// ============================================================================
// Per-variant policy
// ============================================================================

impl Protocol {
    /// Slots the channel stays occupied after a successful transmission
    fn success_hold(&self, tx_time: f64) -> f64 {
        match self {
            Protocol::OnePersistentCsma
            | Protocol::NonPersistentCsma
            | Protocol::PPersistentCsma => tx_time.max(1.0),
            Protocol::BasicCsmaCa => tx_time,
            // RTS/CTS reserves the channel for the handshake as well
            Protocol::RtsCtsCsmaCa => tx_time + 0.5 * tx_time,
            Protocol::SlottedAloha => 0.0,
        }
    }

    /// Slots the channel stays jammed after a collision
    fn collision_hold(&self, tx_time: f64) -> f64 {
        match self {
            Protocol::OnePersistentCsma
            | Protocol::NonPersistentCsma
            | Protocol::PPersistentCsma => (0.5 * tx_time).max(1.0),
            Protocol::BasicCsmaCa | Protocol::RtsCtsCsmaCa => 0.5 * tx_time,
            Protocol::SlottedAloha => 0.0,
        }
    }
}

// ============================================================================
// Simulation Result
// ============================================================================

/// Complete outcome of one simulation run
///
/// Owned by the caller and never mutated after the run completes.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Configuration the run was executed with
    pub config: SimulationConfig,

    /// Seed actually used (recorded even for entropy-seeded runs)
    pub seed_used: [u8; 32],

    /// Slots classified Success
    pub success_count: usize,

    /// Slots classified Collision
    pub collision_count: usize,

    /// One event per simulated slot; length equals the horizon
    pub event_log: Vec<SlotEvent>,

    /// Per-node ordered slot states, one entry per slot per node
    pub timelines: Vec<Vec<NodeSlotState>>,

    /// Metrics derived from the event log
    pub metrics: Metrics,
}

impl SimulationResult {
    /// Print a console summary of the run
    pub fn print_summary(&self) {
        println!("\n=== Simulation Results: {} ===", self.config.protocol);
        println!(
            "  Nodes: {}, p: {}, horizon: {} slots",
            self.config.num_nodes, self.config.gen_prob, self.config.horizon
        );
        println!("  Successful Transmissions: {}", self.success_count);
        println!("  Collisions: {}", self.collision_count);
        println!("  Efficiency: {:.2}%", self.metrics.efficiency * 100.0);
        println!(
            "  Throughput: {:.4} pkts/slot",
            self.metrics.throughput
        );
        println!(
            "  Channel Utilization: {:.2}%",
            self.metrics.utilization * 100.0
        );
        if let (Some(g), Some(s)) = (
            self.metrics.offered_load,
            self.metrics.theoretical_throughput,
        ) {
            println!("  Offered Load (G): {:.3}", g);
            println!("  Theoretical Throughput (G*e^-G): {:.4}", s);
        }
    }
}

// ============================================================================
// Contention Engine
// ============================================================================

/// Single-run simulation engine
///
/// Construction validates the configuration; `run` then advances slot by
/// slot to the horizon and returns the result. The engine owns its random
/// stream, so concurrent runs never share state.
pub struct ContentionEngine {
    config: SimulationConfig,
    random: RandomStream,

    nodes: Vec<NodeState>,
    /// Slot index until which the channel is occupied
    busy_until: f64,

    success_count: usize,
    collision_count: usize,
    event_log: Vec<SlotEvent>,
    timelines: Vec<Vec<NodeSlotState>>,
}

impl ContentionEngine {
    /// Create an engine for the given configuration
    ///
    /// Fails only on structurally invalid input; statistically degenerate
    /// configurations (p = 0, p = 1) are valid.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let random = RandomStream::new(config.seed);
        let nodes = vec![NodeState::default(); config.num_nodes];
        let timelines = vec![Vec::with_capacity(config.horizon); config.num_nodes];

        Ok(Self {
            config,
            random,
            nodes,
            busy_until: 0.0,
            success_count: 0,
            collision_count: 0,
            event_log: Vec::new(),
            timelines,
        })
    }

    /// Run the full simulation to the horizon
    pub fn run(self) -> SimulationResult {
        self.run_with_sink(&mut NoOpSink)
    }

    /// Run the full simulation, mirroring every slot event to `sink`
    pub fn run_with_sink(mut self, sink: &mut dyn EventSink) -> SimulationResult {
        debug!(
            "starting {} run: {} nodes, p={}, {} slots",
            self.config.protocol, self.config.num_nodes, self.config.gen_prob,
            self.config.horizon
        );

        if self.config.protocol.is_aloha() {
            for slot in 0..self.config.horizon {
                self.step_aloha(slot, sink);
            }
        } else {
            for slot in 0..self.config.horizon {
                self.step_csma(slot, sink);
            }
        }

        debug!(
            "run complete: {} successes, {} collisions",
            self.success_count, self.collision_count
        );
        self.build_result()
    }

    // ------------------------------------------------------------------
    // CSMA-family slot step
    // ------------------------------------------------------------------

    fn step_csma(&mut self, slot: usize, sink: &mut dyn EventSink) {
        let gen_prob = self.config.gen_prob;
        let protocol = self.config.protocol;
        let tx_time = self.config.tx_time;

        // Packet arrival: already-ready nodes stay ready
        for node in self.nodes.iter_mut() {
            if self.random.gen_bool(gen_prob) {
                node.ready = true;
            }
        }

        // Nodes ready to sense and not backing off
        let mut contenders: Vec<NodeId> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.ready && n.backoff == 0)
            .map(|(id, _)| id)
            .collect();

        // Channel occupied by an ongoing transmission
        if (slot as f64) < self.busy_until {
            match protocol {
                Protocol::NonPersistentCsma => {
                    // Sense busy, come back after a random wait instead of
                    // camping on the boundary
                    for &id in &contenders {
                        self.nodes[id].backoff = self
                            .random
                            .gen_range(NON_PERSISTENT_WAIT.0, NON_PERSISTENT_WAIT.1);
                    }
                }
                Protocol::PPersistentCsma => {
                    // p-persistent keeps sensing while busy; the filtered
                    // set is unused because the slot resolves Busy
                    // regardless, but the draws are part of the run's
                    // random sequence
                    contenders.retain(|_| self.random.gen_bool(P_SENSE));
                }
                _ => {}
            }

            self.mark_all_idle();
            self.decrement_backoffs();
            self.push_event(slot, SlotClass::Busy, sink);
            return;
        }

        // Channel free: resolve the contention set
        match contenders.len() {
            0 => {
                self.mark_all_idle();
                self.push_event(slot, SlotClass::Idle, sink);
            }
            1 => {
                let winner = contenders[0];
                self.success_count += 1;
                self.nodes[winner].ready = false;
                self.nodes[winner].attempts = 0;
                self.busy_until = slot as f64 + protocol.success_hold(tx_time);

                for (id, timeline) in self.timelines.iter_mut().enumerate() {
                    timeline.push(if id == winner {
                        NodeSlotState::Success
                    } else {
                        NodeSlotState::Idle
                    });
                }
                self.push_event(slot, SlotClass::Success(winner), sink);
            }
            _ => {
                self.collision_count += 1;
                for &id in &contenders {
                    let node = &mut self.nodes[id];
                    if protocol.uses_exponential_backoff() {
                        node.attempts =
                            (node.attempts + 1).min(MAX_BACKOFF_EXPONENT);
                        let window = 1u32 << node.attempts;
                        node.backoff = self.random.gen_range(1, window);
                    } else {
                        node.backoff = self
                            .random
                            .gen_range(CSMA_CA_BACKOFF.0, CSMA_CA_BACKOFF.1);
                    }
                }
                self.busy_until = slot as f64 + protocol.collision_hold(tx_time);

                for (id, timeline) in self.timelines.iter_mut().enumerate() {
                    timeline.push(if contenders.contains(&id) {
                        NodeSlotState::Collision
                    } else {
                        NodeSlotState::Idle
                    });
                }
                self.push_event(slot, SlotClass::Collision(contenders), sink);
            }
        }

        self.decrement_backoffs();
    }

    // ------------------------------------------------------------------
    // Slotted ALOHA slot step
    // ------------------------------------------------------------------

    fn step_aloha(&mut self, slot: usize, sink: &mut dyn EventSink) {
        let p = self.config.gen_prob;

        // Every node draws once per slot and transmits unconditionally on
        // success; there is no channel state to consult
        let transmitters: Vec<NodeId> = (0..self.config.num_nodes)
            .filter(|_| self.random.gen_bool(p))
            .collect();

        let class = match transmitters.len() {
            0 => SlotClass::Idle,
            1 => {
                self.success_count += 1;
                SlotClass::Success(transmitters[0])
            }
            _ => {
                self.collision_count += 1;
                SlotClass::Collision(transmitters.clone())
            }
        };

        for (id, timeline) in self.timelines.iter_mut().enumerate() {
            timeline.push(match &class {
                SlotClass::Success(winner) if *winner == id => NodeSlotState::Success,
                SlotClass::Collision(nodes) if nodes.contains(&id) => {
                    NodeSlotState::Collision
                }
                _ => NodeSlotState::Idle,
            });
        }

        self.push_event(slot, class, sink);
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn mark_all_idle(&mut self) {
        for timeline in self.timelines.iter_mut() {
            timeline.push(NodeSlotState::Idle);
        }
    }

    fn decrement_backoffs(&mut self) {
        for node in self.nodes.iter_mut() {
            node.backoff = node.backoff.saturating_sub(1);
        }
    }

    fn push_event(&mut self, slot: usize, class: SlotClass, sink: &mut dyn EventSink) {
        let event = SlotEvent { slot, class };
        sink.log(&event);
        self.event_log.push(event);
    }

    fn build_result(self) -> SimulationResult {
        // Horizon >= 1 was enforced at construction, so the log is non-empty
        let metrics = Metrics::compute(&self.config, &self.event_log);

        SimulationResult {
            seed_used: self.random.seed_used(),
            config: self.config,
            success_count: self.success_count,
            collision_count: self.collision_count,
            event_log: self.event_log,
            timelines: self.timelines,
            metrics,
        }
    }
}
