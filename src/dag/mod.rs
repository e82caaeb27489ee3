// src/dag/mod.rs

//! Walking a forest of task nodes.
//!
//! - [`graph`] collects every node reachable from a set of roots and puts
//!   them in dependency order.
//! - [`runner`] is a sequential scheduler driving each node through its
//!   lifecycle and applying its fail behaviour.

pub mod graph;
pub mod runner;

pub use graph::{TaskGraph, collect};
pub use runner::{RunReport, Runner, TaskFailure, TaskOutcome};
