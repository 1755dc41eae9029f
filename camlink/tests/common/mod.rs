// Shared helpers for integration tests. Each aggregator pulls this in with
// `#[path = "common/mod.rs"] mod common;`.
#![allow(dead_code)]

pub mod fixtures;
pub mod helpers;
