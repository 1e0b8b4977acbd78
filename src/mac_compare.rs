//! Protocol comparison runner
//!
//! Runs the contention engine repeatedly per protocol variant with
//! independent seeds and averages the resulting metrics, smoothing out
//! single-run sampling noise. Purely functional over its inputs; every run
//! owns its own random stream.

use indexmap::IndexMap;
use log::debug;

use crate::mac_engine::ContentionEngine;
use crate::mac_interface::{ConfigError, Protocol, SimulationConfig};
use crate::mac_random::RandomStream;

/// Arithmetic means of per-run metrics for one protocol
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolAverages {
    pub efficiency: f64,
    pub throughput: f64,
    pub utilization: f64,
    pub success_count: f64,
    pub collision_count: f64,
}

/// Averaged metrics per protocol, in the order the protocols were given
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    pub runs_per_protocol: usize,
    pub averages: IndexMap<Protocol, ProtocolAverages>,
}

impl ComparisonResult {
    /// Print a console summary of the comparison
    pub fn print_summary(&self) {
        println!(
            "\n=== Protocol Comparison ({} runs per protocol) ===",
            self.runs_per_protocol
        );
        for (protocol, avg) in &self.averages {
            println!("  {}", protocol);
            println!("    Avg Efficiency:  {:.2}%", avg.efficiency * 100.0);
            println!("    Avg Throughput:  {:.4} pkts/slot", avg.throughput);
            println!("    Avg Utilization: {:.2}%", avg.utilization * 100.0);
        }
    }
}

/// Repeated-run comparison across protocol variants
pub struct ComparisonRunner {
    protocols: Vec<Protocol>,
    runs: usize,
}

impl ComparisonRunner {
    /// Compare the given protocols over `runs` repeats each
    ///
    /// A repeat count of zero is clamped to one.
    pub fn new(protocols: Vec<Protocol>, runs: usize) -> Self {
        Self {
            protocols,
            runs: runs.max(1),
        }
    }

    /// The three CSMA/CD-family variants
    pub fn csma_comparison(runs: usize) -> Self {
        Self::new(Protocol::CSMA_VARIANTS.to_vec(), runs)
    }

    /// Both CSMA/CA variants
    pub fn csma_ca_comparison(runs: usize) -> Self {
        Self::new(Protocol::CSMA_CA_VARIANTS.to_vec(), runs)
    }

    /// Run every protocol `runs` times with independent seeds forked from
    /// `random`, and average the metrics per protocol
    ///
    /// The protocol field of `base` is overridden per variant; everything
    /// else (node count, probabilities, horizon) is shared across runs.
    pub fn run(
        &self,
        base: &SimulationConfig,
        random: &mut RandomStream,
    ) -> Result<ComparisonResult, ConfigError> {
        let mut averages = IndexMap::new();

        for &protocol in &self.protocols {
            let mut sum = ProtocolAverages {
                efficiency: 0.0,
                throughput: 0.0,
                utilization: 0.0,
                success_count: 0.0,
                collision_count: 0.0,
            };

            for _ in 0..self.runs {
                let config = SimulationConfig {
                    protocol,
                    seed: Some(random.fork_seed()),
                    ..base.clone()
                };
                let result = ContentionEngine::new(config)?.run();

                sum.efficiency += result.metrics.efficiency;
                sum.throughput += result.metrics.throughput;
                sum.utilization += result.metrics.utilization;
                sum.success_count += result.success_count as f64;
                sum.collision_count += result.collision_count as f64;
            }

            let n = self.runs as f64;
            debug!(
                "{}: {} runs averaged, efficiency {:.4}",
                protocol,
                self.runs,
                sum.efficiency / n
            );
            averages.insert(
                protocol,
                ProtocolAverages {
                    efficiency: sum.efficiency / n,
                    throughput: sum.throughput / n,
                    utilization: sum.utilization / n,
                    success_count: sum.success_count / n,
                    collision_count: sum.collision_count / n,
                },
            );
        }

        Ok(ComparisonResult {
            runs_per_protocol: self.runs,
            averages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> SimulationConfig {
        SimulationConfig {
            num_nodes: 6,
            gen_prob: 0.2,
            horizon: 200,
            ..Default::default()
        }
    }

    #[test]
    fn test_single_run_average_equals_raw_metrics() {
        let parent_seed = [17u8; 32];

        // Predict the seed a single-run comparison will fork
        let child_seed = RandomStream::new(Some(parent_seed)).fork_seed();
        let direct = ContentionEngine::new(SimulationConfig {
            protocol: Protocol::NonPersistentCsma,
            seed: Some(child_seed),
            ..base_config()
        })
        .unwrap()
        .run();

        let runner = ComparisonRunner::new(vec![Protocol::NonPersistentCsma], 1);
        let mut random = RandomStream::new(Some(parent_seed));
        let comparison = runner.run(&base_config(), &mut random).unwrap();

        let avg = &comparison.averages[&Protocol::NonPersistentCsma];
        assert_eq!(avg.efficiency, direct.metrics.efficiency);
        assert_eq!(avg.throughput, direct.metrics.throughput);
        assert_eq!(avg.utilization, direct.metrics.utilization);
        assert_eq!(avg.success_count, direct.success_count as f64);
    }

    #[test]
    fn test_zero_runs_clamped_to_one() {
        let runner = ComparisonRunner::new(vec![Protocol::OnePersistentCsma], 0);
        let mut random = RandomStream::new(Some([1u8; 32]));
        let result = runner.run(&base_config(), &mut random).unwrap();
        assert_eq!(result.runs_per_protocol, 1);
    }

    #[test]
    fn test_protocols_reported_in_given_order() {
        let runner = ComparisonRunner::csma_comparison(2);
        let mut random = RandomStream::new(Some([2u8; 32]));
        let result = runner.run(&base_config(), &mut random).unwrap();

        let order: Vec<Protocol> = result.averages.keys().copied().collect();
        assert_eq!(order, Protocol::CSMA_VARIANTS.to_vec());
    }

    #[test]
    fn test_comparison_is_deterministic_given_parent_seed() {
        let runner = ComparisonRunner::csma_comparison(3);

        let mut a = RandomStream::new(Some([9u8; 32]));
        let mut b = RandomStream::new(Some([9u8; 32]));
        let first = runner.run(&base_config(), &mut a).unwrap();
        let second = runner.run(&base_config(), &mut b).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_base_config_is_rejected() {
        let runner = ComparisonRunner::csma_comparison(2);
        let mut random = RandomStream::new(Some([3u8; 32]));
        let bad = SimulationConfig {
            num_nodes: 0,
            ..base_config()
        };
        assert!(runner.run(&bad, &mut random).is_err());
    }

    #[test]
    fn test_more_runs_shrink_variance_of_the_mean() {
        // Trial variance of the reported mean should fall as R grows
        let variance = |runs: usize| {
            let runner = ComparisonRunner::new(vec![Protocol::OnePersistentCsma], runs);
            let samples: Vec<f64> = (0u8..12)
                .map(|trial| {
                    let mut random = RandomStream::new(Some([trial + 1; 32]));
                    let result = runner.run(&base_config(), &mut random).unwrap();
                    result.averages[&Protocol::OnePersistentCsma].efficiency
                })
                .collect();
            let mean = samples.iter().sum::<f64>() / samples.len() as f64;
            samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>()
                / samples.len() as f64
        };

        assert!(variance(8) < variance(1));
    }
}
