//! Error classification - pure decision logic, no I/O

pub mod error_classifier;

pub use error_classifier::ErrorClassifierImpl;
