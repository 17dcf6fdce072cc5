use std::time::Duration;

use self::adapters::{SerialPortWriter, VescAdapter};
use crate::internals::core::ports::MotorDriveError;

pub mod adapters;
pub mod task;

pub struct VescModule {
    pub motor_drive_adapter: VescAdapter<SerialPortWriter>,
}

impl VescModule {
    pub fn initialize(
        path: &str,
        baud_rate: u32,
        timeout: Duration,
    ) -> Result<Self, MotorDriveError> {
        Ok(Self {
            motor_drive_adapter: VescAdapter::open_serial(path, baud_rate, timeout)?,
        })
    }
}
