//! Dilepton cutflow: per-event object selection for collider analyses
//!
//!
//! # Introduction (for the physicist)
//!
//! Searches for new physics at hadron colliders select events with a few
//! well-identified objects: here, two charged leptons, possibly some jets,
//! and missing transverse momentum from invisible particles. This crate
//! implements the per-event selection machinery of such analyses (phase-space
//! filtering, overlap removal, isolation, kinematic discriminants like mT2)
//! and the bookkeeping of how many events survive each cut, along with two
//! 8 TeV ATLAS analyses built on top of it.
//!
//!
//! # Introduction (for the computer guy)
//!
//! Processing is a pipeline of pure functions over an event record:
//!
//! * reconstructed objects are filtered by momentum and acceptance
//! * overlapping objects are removed according to a declarative plan
//! * leptons which are not isolated from other activity are discarded
//! * discriminating variables are computed from the remaining objects
//! * the event is checked against the cuts of an analysis, and every
//!   checkpoint and signal region it reaches is recorded
//!
//! Per-event outcomes are integrated into per-batch accumulators, which are
//! merged into the final results. The only state that outlives an event is
//! thus the accumulator, which makes the processing trivially parallel.

#![warn(missing_docs)]

pub mod analysis;
pub mod angular;
pub mod collection;
pub mod config;
pub mod cutflow;
pub mod dilepton;
pub mod event;
pub mod evgen;
pub mod isolation;
pub mod kinematics;
pub mod momentum;
pub mod mt2;
pub mod numeric;
pub mod object;
pub mod output;
pub mod overlap;
pub mod phasespace;
pub mod random;
pub mod regions;
pub mod resacc;
pub mod resfin;
pub mod scheduling;
pub mod tally;
pub mod trigger;

/// We'll use eyre's type-erased result type throughout the crate
pub type Result<T> = eyre::Result<T>;
