use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use motor_bridge::{
    config::{CliConfig, CommandArgs, Mode, RampArgs, DEFAULT_SERIAL_TIMEOUT},
    externals::{
        event_logging::EventLoggingModule,
        vesc::{task::task_vesc_heartbeat, VescModule},
    },
    internals::core::{
        motor_bridge::MotorBridge,
        ports::Component,
        ramp::{run_ramp, RampOutcome, RampPlan},
    },
    logging::init_tracing,
    models::command::Command,
    tasks::command_dispatch::task_dispatch_commands,
};
use tokio::{signal, sync::mpsc};
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CliConfig::parse();
    init_tracing(cli.verbose)?;

    let tracker = TaskTracker::new();
    let token = CancellationToken::new();

    let token_clone = token.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = token_clone.cancelled() => {}
            res = signal::ctrl_c() => {
                match res {
                    Ok(_) => {
                        warn!("Received ctrl-c.");
                    },
                    Err(e) => {
                        error!("Failed to listen for ctrl_c. Error: {}", e);
                    }
                };
                token_clone.cancel();
            },
        }
    });

    let result = match cli.mode {
        Mode::Command(args) => run_command_mode(args, token.clone(), &tracker).await,
        Mode::Ramp(args) => run_ramp_mode(args, token.clone(), &tracker).await,
    };

    token.cancel();
    tracker.close();
    tracker.wait().await;

    result
}

/// Construct the component, initialise it, and feed it every command argument.
async fn run_command_mode(
    args: CommandArgs,
    token: CancellationToken,
    tracker: &TaskTracker,
) -> Result<()> {
    let EventLoggingModule { log_adapter } = EventLoggingModule::initialize();

    let mut bridge = MotorBridge::new(args.name, log_adapter);
    bridge.init();
    info!("Component '{}' ready.", bridge.name());
    let bridge = Arc::new(bridge);

    let (tx_commands, rx_commands) = mpsc::channel(32);

    let token_clone = token.clone();
    let handle = tracker.spawn(async move {
        task_dispatch_commands(token_clone, bridge, rx_commands).await
    });

    for arg in args.args {
        if let Err(e) = tx_commands.send(Command::new(arg)).await {
            warn!("Failed to queue command. Error: {}", e);
            break;
        }
    }
    drop(tx_commands);

    let delivered = handle.await?;
    info!("Delivered {} commands.", delivered);
    Ok(())
}

/// Ramp the motor up, hold, and ramp down while a heartbeat keeps the controller alive.
async fn run_ramp_mode(
    args: RampArgs,
    token: CancellationToken,
    tracker: &TaskTracker,
) -> Result<()> {
    let plan = RampPlan::new(&args.ramp_config())?;
    let heartbeat_period = args.heartbeat_period()?;

    info!("Connecting to VESC at {} ...", args.port);
    let VescModule {
        motor_drive_adapter,
    } = VescModule::initialize(&args.port, args.baud, DEFAULT_SERIAL_TIMEOUT)?;
    info!("Connected to VESC.");
    let drive = Arc::new(motor_drive_adapter);

    let heartbeat_token = token.child_token();
    let token_clone = heartbeat_token.clone();
    let drive_clone = drive.clone();
    tracker.spawn(async move {
        task_vesc_heartbeat(token_clone, drive_clone, heartbeat_period).await
    });

    let outcome = run_ramp(token, drive.as_ref(), &plan).await;
    heartbeat_token.cancel();

    match outcome? {
        RampOutcome::Completed => info!("Test complete."),
        RampOutcome::Cancelled => warn!("Ramp cancelled. Motor commanded to stop."),
    }
    Ok(())
}
