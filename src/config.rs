use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use common::physical::DutyCycle;
use thiserror::Error;

pub const DEFAULT_COMPONENT_NAME: &str = "motorBridge0";
pub const DEFAULT_PORT: &str = "/dev/ttyACM1";
pub const DEFAULT_BAUD_RATE: u32 = 115_200;
pub const DEFAULT_SERIAL_TIMEOUT: Duration = Duration::from_millis(50);
pub const MAX_RAMP_STEPS: u32 = 10_000;
pub const DEFAULT_HEARTBEAT_PERIOD: Duration = Duration::from_millis(100);

#[derive(Parser, Debug, Clone)]
#[command(name = "motor_bridge", version, about = "MotorBridge component host and VESC ramp bench")]
pub struct CliConfig {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub mode: Mode,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Mode {
    /// Deliver commands to a MotorBridge component.
    Command(CommandArgs),

    /// Ramp a VESC motor up to a duty cycle, hold it, and ramp back down.
    Ramp(RampArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CommandArgs {
    #[arg(long, default_value = DEFAULT_COMPONENT_NAME)]
    pub name: String,

    /// Command arguments, delivered in order.
    #[arg(required = true, allow_negative_numbers = true)]
    pub args: Vec<i32>,
}

#[derive(Args, Debug, Clone)]
pub struct RampArgs {
    #[arg(long, default_value = DEFAULT_PORT)]
    pub port: String,

    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,

    /// Number of steps between zero and the target duty cycle.
    #[arg(long, default_value_t = 10)]
    pub steps: u32,

    #[arg(long, default_value_t = 200)]
    pub step_delay_ms: u64,

    #[arg(long, default_value_t = 0.5, allow_negative_numbers = true)]
    pub target_duty: f32,

    #[arg(long, default_value_t = 2000)]
    pub hold_ms: u64,

    #[arg(long, default_value_t = 100)]
    pub heartbeat_ms: u64,
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("A ramp needs at least one step.")]
    NoSteps,

    #[error("A ramp can have at most {} steps, got {0}.", MAX_RAMP_STEPS)]
    TooManySteps(u32),

    #[error("Target duty cycle {0} is outside of -1.0 to 1.0.")]
    InvalidTargetDuty(f32),

    #[error("Heartbeat period can't be zero.")]
    ZeroHeartbeat,
}

/// Shape of a duty cycle ramp.
#[derive(Debug, Clone, PartialEq)]
pub struct RampConfig {
    pub steps: u32,
    pub step_delay: Duration,
    pub target_duty: f32,
    pub hold: Duration,
}

impl Default for RampConfig {
    fn default() -> Self {
        Self {
            steps: 10,
            step_delay: Duration::from_millis(200),
            target_duty: 0.5,
            hold: Duration::from_secs(2),
        }
    }
}

impl RampConfig {
    pub fn validate(&self) -> Result<DutyCycle, ConfigError> {
        if self.steps == 0 {
            return Err(ConfigError::NoSteps);
        }
        if self.steps > MAX_RAMP_STEPS {
            return Err(ConfigError::TooManySteps(self.steps));
        }
        DutyCycle::try_from(self.target_duty)
            .map_err(|_| ConfigError::InvalidTargetDuty(self.target_duty))
    }
}

impl RampArgs {
    pub fn ramp_config(&self) -> RampConfig {
        RampConfig {
            steps: self.steps,
            step_delay: Duration::from_millis(self.step_delay_ms),
            target_duty: self.target_duty,
            hold: Duration::from_millis(self.hold_ms),
        }
    }

    pub fn heartbeat_period(&self) -> Result<Duration, ConfigError> {
        if self.heartbeat_ms == 0 {
            return Err(ConfigError::ZeroHeartbeat);
        }
        Ok(Duration::from_millis(self.heartbeat_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_defaults_match_bench_constants() {
        let cli = CliConfig::parse_from(["motor_bridge", "ramp"]);
        let Mode::Ramp(args) = cli.mode else {
            panic!("Expected ramp mode");
        };

        assert_eq!(args.port, DEFAULT_PORT);
        assert_eq!(args.baud, DEFAULT_BAUD_RATE);
        assert_eq!(args.ramp_config(), RampConfig::default());
        assert_eq!(args.heartbeat_period(), Ok(DEFAULT_HEARTBEAT_PERIOD));
    }

    #[test]
    fn test_command_mode_accepts_negative_arguments() {
        let cli = CliConfig::parse_from(["motor_bridge", "-v", "command", "42", "-1"]);
        assert_eq!(cli.verbose, 1);
        let Mode::Command(args) = cli.mode else {
            panic!("Expected command mode");
        };

        assert_eq!(args.name, DEFAULT_COMPONENT_NAME);
        assert_eq!(args.args, vec![42, -1]);
    }

    #[test]
    fn test_validate() {
        let config = RampConfig::default();
        assert_eq!(config.validate().unwrap().value(), 0.5);

        let config = RampConfig {
            steps: 0,
            ..RampConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoSteps));

        let config = RampConfig {
            steps: MAX_RAMP_STEPS + 1,
            ..RampConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManySteps(MAX_RAMP_STEPS + 1))
        );

        let config = RampConfig {
            steps: MAX_RAMP_STEPS,
            ..RampConfig::default()
        };
        assert!(config.validate().is_ok());

        let config = RampConfig {
            target_duty: 1.5,
            ..RampConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidTargetDuty(1.5)));
    }
}
