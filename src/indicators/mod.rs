#![allow(dead_code)]
pub mod adx;
pub mod moving_average;
pub mod rsi;
pub mod std_dev;

pub use adx::*;
pub use moving_average::*;
pub use rsi::*;
pub use std_dev::*;

pub trait Indicator {
    fn name(&self) -> &'static str;
    fn is_ready(&self) -> bool;
    fn reset(&mut self);
}
