use std::time::Duration;

use common::physical::DutyCycle;
use derive_more::Display;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::{ConfigError, RampConfig};

use super::ports::{MotorDriveError, MotorDrivePort};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RampPhase {
    #[display(fmt = "up")]
    Up,
    #[display(fmt = "down")]
    Down,
    #[display(fmt = "stop")]
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RampStep {
    /// Command a duty cycle, then wait `dwell`.
    SetDuty {
        phase: RampPhase,
        duty: DutyCycle,
        dwell: Duration,
    },
    /// Leave the current duty cycle in place for `dwell`.
    Hold { duty: DutyCycle, dwell: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampOutcome {
    Completed,
    Cancelled,
}

#[derive(Error, Debug)]
pub enum RampError {
    #[error("Invalid ramp configuration. Error: {0}")]
    Config(#[from] ConfigError),

    #[error("Motor drive failed during the ramp. Error: {0}")]
    Drive(#[from] MotorDriveError),
}

/// Ordered steps that take a motor from rest to a target duty cycle and back.
#[derive(Debug, Clone, PartialEq)]
pub struct RampPlan {
    steps: Vec<RampStep>,
}

impl RampPlan {
    pub fn new(config: &RampConfig) -> Result<Self, RampError> {
        let target = config.validate()?;
        let increment = target.value() / config.steps as f32;

        let duty_at = |i: u32| -> Result<DutyCycle, RampError> {
            // Clamp against float drift past the target on the last step.
            let raw = if i == config.steps {
                target.value()
            } else {
                increment * i as f32
            };
            DutyCycle::try_from(raw)
                .map_err(|_| RampError::Config(ConfigError::InvalidTargetDuty(raw)))
        };

        let mut steps = Vec::with_capacity(config.steps as usize * 2 + 3);

        for i in 1..=config.steps {
            steps.push(RampStep::SetDuty {
                phase: RampPhase::Up,
                duty: duty_at(i)?,
                dwell: config.step_delay,
            });
        }

        steps.push(RampStep::Hold {
            duty: target,
            dwell: config.hold,
        });

        for i in (0..=config.steps).rev() {
            steps.push(RampStep::SetDuty {
                phase: RampPhase::Down,
                duty: duty_at(i)?,
                dwell: config.step_delay,
            });
        }

        steps.push(RampStep::SetDuty {
            phase: RampPhase::Stop,
            duty: DutyCycle::ZERO,
            dwell: Duration::ZERO,
        });

        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[RampStep] {
        &self.steps
    }
}

/// Execute a ramp plan against a motor drive.
/// The motor is commanded to zero if the token is cancelled or the drive fails.
#[tracing::instrument(skip_all)]
pub async fn run_ramp<D: MotorDrivePort + ?Sized>(
    token: CancellationToken,
    drive: &D,
    plan: &RampPlan,
) -> Result<RampOutcome, RampError> {
    info!("Started ramp with {} steps.", plan.steps().len());

    for step in plan.steps() {
        if token.is_cancelled() {
            warn!("Cancelled. Stopping motor.");
            stop_motor(drive);
            return Ok(RampOutcome::Cancelled);
        }

        let dwell = match *step {
            RampStep::SetDuty { phase, duty, dwell } => {
                info!("Setting duty ({}): {}", phase, duty);
                if let Err(e) = drive.set_duty_cycle(duty) {
                    error!("Failed to set duty cycle. Error: {}", e);
                    stop_motor(drive);
                    return Err(e.into());
                }
                dwell
            }
            RampStep::Hold { duty, dwell } => {
                info!("Holding duty {} for {:?}", duty, dwell);
                dwell
            }
        };

        if dwell.is_zero() {
            continue;
        }

        tokio::select! {
            biased;
            _ = token.cancelled() => {
                warn!("Cancelled. Stopping motor.");
                stop_motor(drive);
                return Ok(RampOutcome::Cancelled);
            },
            _ = tokio::time::sleep(dwell) => {}
        }
    }

    info!("Ramp complete.");
    Ok(RampOutcome::Completed)
}

fn stop_motor<D: MotorDrivePort + ?Sized>(drive: &D) {
    match drive.set_duty_cycle(DutyCycle::ZERO) {
        Ok(_) => debug!("Motor stopped."),
        Err(e) => error!("Failed to stop motor. Error: {}", e),
    }
}
