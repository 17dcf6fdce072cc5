mod duty_cycle;

pub use duty_cycle::*;
