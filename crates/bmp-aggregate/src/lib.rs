//! Result Aggregator: fuses each candidate's cost document and simulator
//! report-loads into the run's two objective columns, filters to the
//! Pareto front, and writes the front's CSV and file copies.

pub mod aggregate;

pub use aggregate::{pareto_filter, score_candidate, write_front, CandidateFiles, ScoredCandidate};
