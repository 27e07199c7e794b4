//! Post-demosaic normalization passes.

pub mod white_balance;

pub use white_balance::{stretch_channels, HistogramStretch};
