#![doc = include_str!("../README.md")]

pub mod bfv;
pub mod error;
pub mod modmath;
pub mod ntt;
pub mod sampling;

mod wide;

pub use bfv::{BfvMultiplier, RelinearizationKey};
pub use error::FheError;
pub use ntt::NttContext;
