//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod approval;
pub mod data_service;
pub mod event_logger;
pub mod llm_gateway;
pub mod progress;
pub mod result_repository;
pub mod solver_service;
