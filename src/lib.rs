//! Core library for the `ratestorm` load generator.
//!
//! The engine lives in [`runner`] (rate-controlled scheduling of user work)
//! and [`metrics`] (streaming per-label aggregation with approximate
//! percentiles). [`http`] and [`report`] are the transport and output
//! collaborators the `ratestorm` binary wires around it; [`args`] and
//! [`config`] hold its command-line and file configuration.
pub mod args;
pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod shutdown;

#[cfg(feature = "fuzzing")]
pub mod fuzzing;
