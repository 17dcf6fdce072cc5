use anyhow::Result;
use tracing::level_filters::LevelFilter;

/// Map the `-v` count onto a maximum log level.
pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the global tracing subscriber. Must be called once, before any task starts.
pub fn init_tracing(verbose: u8) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(false)
        .with_max_level(level_for_verbosity(verbose))
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
