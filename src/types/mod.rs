//! Type definitions for the spam classifier

pub mod classification;
pub mod label;

pub use classification::Classification;
pub use label::Label;
