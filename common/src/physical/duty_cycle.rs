use core::fmt::Display;
use thiserror_no_std::Error;

/// Scale used by the motor controller to carry a duty cycle as an integer.
pub const DUTY_CYCLE_SCALE: f32 = 100_000f32;

/// Represents a signed PWM duty cycle in the range -1.0 to 1.0.
/// Negative values drive the motor in reverse.
///
/// ```
/// use common::physical::DutyCycle;
/// let duty = DutyCycle::try_from(0.25f32).expect("Failed to get DutyCycle representation");
/// assert_eq!(duty.value(), 0.25f32);
/// assert_eq!(duty.scaled(), 25_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct DutyCycle {
    value: f32,
}

/// Represents errors in creating a `DutyCycle`.
#[derive(Debug, Error, PartialEq)]
pub enum DutyCycleError {
    /// The value was NaN or outside of -1.0 to 1.0.
    #[error("Duty cycle outside of valid range (-1.0 to 1.0)!")]
    OutOfRange,
}

impl DutyCycle {
    /// Motor stopped.
    pub const ZERO: DutyCycle = DutyCycle { value: 0f32 };

    /// Get the underlying duty cycle value.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Integer representation sent over the wire.
    pub fn scaled(&self) -> i32 {
        (self.value * DUTY_CYCLE_SCALE) as i32
    }
}

impl TryFrom<f32> for DutyCycle {
    type Error = DutyCycleError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        if value.is_nan() || value < -1f32 || value > 1f32 {
            return Err(DutyCycleError::OutOfRange);
        }
        Ok(Self { value })
    }
}

impl From<DutyCycle> for f32 {
    fn from(duty: DutyCycle) -> Self {
        duty.value
    }
}

impl Display for DutyCycle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2}", self.value)
    }
}
