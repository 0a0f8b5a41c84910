//! Integration tests for driver-portal
//!
//! These tests verify the interaction between the gate, its SQL storage,
//! the HTTP middleware and the alert channels.

pub mod alert_channel_tests;
pub mod counter_store_tests;
pub mod gate_tests;
pub mod middleware_tests;
