//! # Location Polling
//!
//! While a carrier is on the road, sample the device position every few seconds and
//! append it to the tracking ledger.
//!
//! - [`LocationProvider`] is the device boundary; [`ScriptedLocationProvider`] replays
//!   a fixed route.
//! - [`LocationPoller`] owns at most one background task. Ticks run inside that task
//!   one after the other, so two samples for the same order never overlap.
//! - A failed or timed-out sample is logged and the next tick tries again. Recording
//!   retries transport failures a bounded number of times, then drops the sample.

pub mod error;
pub mod location;
pub mod poller;

pub use error::*;
pub use location::*;
pub use poller::*;
