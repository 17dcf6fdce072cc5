use std::sync::Arc;

use tokio::sync::mpsc::Receiver;
use tokio_stream::{wrappers::ReceiverStream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{internals::core::ports::CommandHandler, models::command::Command};

/// Task: Deliver commands to a handler in the order they are queued.
/// Stops when cancelled or once every sender has been dropped.
/// Returns how many commands were delivered.
#[tracing::instrument(skip_all)]
pub async fn task_dispatch_commands<H: CommandHandler + ?Sized>(
    token: CancellationToken,
    handler: Arc<H>,
    rx_commands: Receiver<Command>,
) -> usize {
    info!("Started.");

    let mut commands = ReceiverStream::new(rx_commands);
    let mut delivered = 0usize;

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                warn!("Cancelled.");
                break;
            },
            next = commands.next() => match next {
                Some(command) => {
                    debug!("Delivering {}.", command);
                    handler.handle_cmd(command.arg);
                    delivered += 1;
                },
                None => {
                    debug!("Command channel closed.");
                    break;
                }
            },
        }
    }

    delivered
}
