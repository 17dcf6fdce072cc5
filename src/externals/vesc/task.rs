use std::{sync::Arc, time::Duration};

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, trace, warn};

use crate::internals::core::ports::MotorDrivePort;

/// Task: Keep the motor controller from timing out while a ramp holds a
/// duty cycle. Sends a keep alive every `period` until cancelled.
/// Failed writes are logged and retried on the next tick.
#[tracing::instrument(skip_all)]
pub async fn task_vesc_heartbeat<D: MotorDrivePort + ?Sized>(
    token: CancellationToken,
    drive: Arc<D>,
    period: Duration,
) {
    info!("Started.");

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                warn!("Cancelled.");
                break;
            },
            _ = interval.tick() => {
                match drive.keep_alive() {
                    Ok(_) => trace!("Sent keep alive."),
                    Err(e) => warn!("Failed to send keep alive. Error: {}", e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use common::physical::DutyCycle;

    use super::*;
    use crate::internals::core::ports::MotorDriveError;

    #[derive(Default)]
    struct CountingDrive {
        alive: AtomicUsize,
        fail: bool,
    }

    impl MotorDrivePort for CountingDrive {
        fn set_duty_cycle(&self, _duty: DutyCycle) -> Result<(), MotorDriveError> {
            Ok(())
        }

        fn keep_alive(&self) -> Result<(), MotorDriveError> {
            self.alive.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(MotorDriveError::Poisoned);
            }
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_sends_keep_alive_each_period_until_cancelled() {
        let drive = Arc::new(CountingDrive::default());
        let token = CancellationToken::new();

        let handle = tokio::spawn(task_vesc_heartbeat(
            token.clone(),
            drive.clone(),
            Duration::from_millis(100),
        ));

        // Ticks at 0, 100, 200, 300, 400 ms.
        tokio::time::sleep(Duration::from_millis(450)).await;
        token.cancel();
        handle.await.unwrap();

        assert_eq!(drive.alive.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keeps_running_after_failures() {
        let drive = Arc::new(CountingDrive {
            fail: true,
            ..CountingDrive::default()
        });
        let token = CancellationToken::new();

        let handle = tokio::spawn(task_vesc_heartbeat(
            token.clone(),
            drive.clone(),
            Duration::from_millis(100),
        ));

        tokio::time::sleep(Duration::from_millis(250)).await;
        token.cancel();
        handle.await.unwrap();

        assert_eq!(drive.alive.load(Ordering::SeqCst), 3);
    }
}
