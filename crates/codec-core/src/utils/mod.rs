//! Utility functions shared by the codecs

pub mod validation;

pub use validation::*;
