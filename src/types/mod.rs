#![allow(dead_code)]
pub mod candle;
pub mod signal;

pub use candle::*;
pub use signal::*;
