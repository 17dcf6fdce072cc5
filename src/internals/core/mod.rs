pub mod motor_bridge;
pub mod ports;
pub mod ramp;
