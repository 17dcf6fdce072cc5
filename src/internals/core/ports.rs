use common::physical::DutyCycle;
use thiserror::Error;

/// Sink for human readable log records emitted by components.
pub trait LogPort: Send + Sync {
    fn info(&self, message: &str);
}

impl<T: LogPort + ?Sized> LogPort for std::sync::Arc<T> {
    fn info(&self, message: &str) {
        (**self).info(message)
    }
}

/// Lifecycle surface every component exposes to the framework.
pub trait Component {
    fn name(&self) -> &str;

    /// Invoked once before the component starts handling commands.
    fn init(&mut self);
}

/// Receives commands carrying a single integer argument.
pub trait CommandHandler: Send + Sync {
    fn handle_cmd(&self, arg: i32);
}

#[derive(Error, Debug)]
pub enum MotorDriveError {
    #[error("Failed to open serial port '{path}'. Error: {source}")]
    Open {
        path: String,
        source: serialport::Error,
    },

    #[error("Failed to encode command for the motor controller: {0}")]
    Encode(String),

    #[error("Failed to write to the motor controller. Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Motor controller link is poisoned.")]
    Poisoned,
}

/// Drives a motor controller.
pub trait MotorDrivePort: Send + Sync {
    fn set_duty_cycle(&self, duty: DutyCycle) -> Result<(), MotorDriveError>;

    /// Refresh the controller's command timeout without changing its output.
    fn keep_alive(&self) -> Result<(), MotorDriveError>;
}
