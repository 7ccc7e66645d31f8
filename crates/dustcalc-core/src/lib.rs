//! dustcalc core -- connectivity, notify order and power propagation for
//! redstone-wire circuits.
//!
//! Given a static voxel description of wire cells, one fixed power source
//! and occlusion markers, this crate reconstructs which wires influence
//! which, the exact order a wire notifies its neighbors when it changes, and
//! the step-by-step trace of power spreading out from the source.
//!
//! # Pipeline
//!
//! Data flows strictly forward:
//!
//! 1. **Build** -- [`graph::GraphBuilder`] indexes wires by coordinate
//!    ([`spatial::SpatialIndex`]) and fills each wire's upstream influencers
//!    under the horizontal, staircase, blocking and transparent rules.
//! 2. **Order** -- [`order::OrderCalculator`] fills each wire's downstream
//!    notify list from coordinates alone, using a hash-perturbed visiting
//!    order.
//! 3. **Trace** -- [`trace::PropagationTracer`] seeds the source's enabled
//!    directions and walks depth-first, logging every power change.
//!
//! [`sim::simulate`] runs all three.
//!
//! ```rust,ignore
//! let sim = simulate(&description, SimulationConfig::default())?;
//! for entry in sim.trace.entries() {
//!     println!("{:?} -> {} @ {}", entry.from, entry.coord, entry.power);
//! }
//! ```
//!
//! Everything is single-threaded and deterministic.

pub mod coord;
pub mod description;
pub mod graph;
pub mod id;
pub mod node;
pub mod order;
pub mod sim;
pub mod spatial;
pub mod trace;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
