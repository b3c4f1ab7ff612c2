//! Core services: enumeration, the shared queue and sink, workers, and the supervisor

pub mod context;
pub mod enumerate;
pub mod matcher;
pub mod paths;
pub mod progress;
pub mod queue;
pub mod sink;
pub mod supervisor;
pub mod worker;
