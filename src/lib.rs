#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Surrogate-assisted multi-objective optimization of expensive black-box
//! functions.
//!
//! Each objective is modeled by a surrogate (a Gaussian process by default).
//! Every iteration adds one design point chosen by an acquisition criterion,
//! and the refined surrogates are finally handed to a genetic solver that
//! returns an approximated Pareto set and front. Single-objective problems are
//! routed to an EGO strategy.
//!
//! # Getting Started
//!
//! ```
//! use egomoo::prelude::*;
//!
//! let fun = |x: &[DesignPoint]| {
//!     Ok::<_, String>(
//!         x.iter()
//!             .map(|p| vec![p[0], (1.0 - p[0]).powi(2) + p[1]])
//!             .collect::<Vec<_>>(),
//!     )
//! };
//!
//! let moo = Moo::builder()
//!     .criterion(InfillCriterion::Ehvi)
//!     .xlimits(Bounds::new(vec![(0.0, 1.0), (0.0, 1.0)]).unwrap())
//!     .n_start(8)
//!     .n_iter(3)
//!     .pop_size(24)
//!     .n_gen(10)
//!     .random_state(7)
//!     .build();
//!
//! let result = moo.optimize(&fun).unwrap();
//! assert_eq!(result.samples.len(), 11);
//! for (x, f) in result.iter() {
//!     println!("{x:?} -> {f:?}");
//! }
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`Moo`] | Run the refinement loop and the final Pareto search. |
//! | [`MooConfig`] | Every option of a run, with defaults. |
//! | [`Objective`] | The expensive function: a batch of points in, one row of objectives per point out. |
//! | [`SampleSet`] | Every evaluated point, in evaluation order. |
//! | [`OptimizationResult`] | Pareto set and front, plus the samples and final surrogates. |
//!
//! # Acquisition Criteria
//!
//! | [`InfillCriterion`] | Criterion | Objectives |
//! |---------------------|-----------|------------|
//! | `Pi` | Probability of improving the front ([`ProbabilityOfImprovement`](criterion::ProbabilityOfImprovement), Monte-Carlo for 3+) | 2+ |
//! | `Ehvi` | Expected hypervolume improvement ([`ExpectedHypervolumeImprovement`](criterion::ExpectedHypervolumeImprovement), Monte-Carlo for 3+) | 2+ |
//! | `Wb2s` | Scaled EHVI minus the summed predicted means ([`Wb2s`](criterion::Wb2s)) | 2+ |
//! | `Ga` | Dispersion of a genetic Pareto search on the surrogates ([`Dispersion`](criterion::Dispersion)) | 2+ |
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `serde` | `Serialize`/`Deserialize` on configuration, bounds and sample sets | off |
//! | `sobol` | [`SobolSampler`](doe::SobolSampler) for the initial design | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing); `verbose` raises progress events to info level | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

/// Emit at info level when `$verbose` is true, at debug level otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_verbose {
    ($verbose:expr, $($arg:tt)*) => {
        if $verbose {
            tracing::info!($($arg)*)
        } else {
            tracing::debug!($($arg)*)
        }
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_verbose {
    ($verbose:expr, $($arg:tt)*) => {{
        let _ = $verbose;
    }};
}

pub mod criterion;
pub mod doe;
pub mod ego;
mod error;
pub mod genetic;
pub mod minimize;
mod moo;
pub mod objective;
pub mod pareto;
pub mod pareto_solver;
mod rng_util;
mod sample_set;
pub mod selector;
mod stats;
pub mod surrogate;
mod types;

pub use error::{Error, Result};
pub use moo::{Moo, MooBuilder, MooConfig, OptimizationResult};
pub use objective::Objective;
pub use sample_set::SampleSet;
pub use types::{Bounds, DesignPoint, InfillCriterion, RunPhase};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use egomoo::prelude::*;
/// ```
pub mod prelude {
    pub use crate::criterion::Acquisition;
    #[cfg(feature = "sobol")]
    pub use crate::doe::SobolSampler;
    pub use crate::doe::{InitialSampler, LatinHypercube};
    pub use crate::ego::{Ego, SingleObjectiveStrategy};
    pub use crate::error::{Error, Result};
    pub use crate::genetic::{GeneticSolver, MultiObjectiveProblem, Nsga2, ParetoSet};
    pub use crate::minimize::{BoundedMinimizer, Cobyla};
    pub use crate::moo::{Moo, MooBuilder, MooConfig, OptimizationResult};
    pub use crate::objective::Objective;
    pub use crate::sample_set::SampleSet;
    pub use crate::surrogate::{GpBuilder, Surrogate, SurrogateBuilder};
    pub use crate::types::{Bounds, DesignPoint, InfillCriterion, RunPhase};
}
