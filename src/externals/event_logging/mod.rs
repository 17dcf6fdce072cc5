use self::adapters::TracingLogAdapter;

pub mod adapters;

pub struct EventLoggingModule {
    pub log_adapter: TracingLogAdapter,
}

impl EventLoggingModule {
    pub fn initialize() -> Self {
        Self {
            log_adapter: TracingLogAdapter {},
        }
    }
}
