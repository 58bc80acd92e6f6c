//! inbox-triage: LLM-assisted support email intake with Hexagonal Architecture.

pub mod adapters;
pub mod bootstrap;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
