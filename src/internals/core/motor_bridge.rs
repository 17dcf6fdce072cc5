use super::ports::{CommandHandler, Component, LogPort};

/// Reports every command it receives through its log sink.
/// Holds no state beyond its name, so commands may arrive from any thread.
pub struct MotorBridge<L: LogPort> {
    name: String,
    log: L,
}

impl<L: LogPort> MotorBridge<L> {
    pub fn new(name: impl Into<String>, log: L) -> Self {
        Self {
            name: name.into(),
            log,
        }
    }

    pub fn log(&self) -> &L {
        &self.log
    }
}

impl<L: LogPort> Component for MotorBridge<L> {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self) {}
}

impl<L: LogPort> CommandHandler for MotorBridge<L> {
    fn handle_cmd(&self, arg: i32) {
        self.log
            .info(&format!("MotorBridge received command arg={}", arg));
    }
}

#[cfg(test)]
mod tests {
    use crate::externals::event_logging::adapters::MemoryLogAdapter;

    use super::*;

    #[test]
    fn test_logs_argument() {
        let mut bridge = MotorBridge::new("motorBridge0", MemoryLogAdapter::new());
        bridge.init();
        bridge.handle_cmd(42);

        assert_eq!(
            bridge.log().records(),
            vec!["MotorBridge received command arg=42".to_string()]
        );
    }

    #[test]
    fn test_works_without_init() {
        let bridge = MotorBridge::new("motorBridge0", MemoryLogAdapter::new());
        bridge.handle_cmd(-1);

        assert_eq!(
            bridge.log().records(),
            vec!["MotorBridge received command arg=-1".to_string()]
        );
    }

    #[test]
    fn test_one_record_per_command_for_extreme_values() {
        for arg in [0, -1, 1, i32::MIN, i32::MAX] {
            let bridge = MotorBridge::new("motorBridge0", MemoryLogAdapter::new());
            bridge.handle_cmd(arg);

            assert_eq!(
                bridge.log().records(),
                vec![format!("MotorBridge received command arg={}", arg)]
            );
        }
        let bridge = MotorBridge::new("motorBridge0", MemoryLogAdapter::new());
        bridge.handle_cmd(i32::MIN);
        assert_eq!(
            bridge.log().records()[0],
            "MotorBridge received command arg=-2147483648"
        );
    }

    #[test]
    fn test_init_does_not_change_behaviour() {
        let plain = MotorBridge::new("plain", MemoryLogAdapter::new());
        let mut initialized = MotorBridge::new("initialized", MemoryLogAdapter::new());
        initialized.init();
        initialized.init();

        for arg in [7, -7, 0] {
            plain.handle_cmd(arg);
            initialized.handle_cmd(arg);
        }

        assert_eq!(plain.log().records(), initialized.log().records());
    }

    #[test]
    fn test_instances_do_not_share_state() {
        let first = MotorBridge::new("motorBridge0", MemoryLogAdapter::new());
        let second = MotorBridge::new("motorBridge1", MemoryLogAdapter::new());

        first.handle_cmd(1);
        second.handle_cmd(2);

        assert_eq!(first.name(), "motorBridge0");
        assert_eq!(second.name(), "motorBridge1");
        assert_eq!(
            first.log().records(),
            vec!["MotorBridge received command arg=1".to_string()]
        );
        assert_eq!(
            second.log().records(),
            vec!["MotorBridge received command arg=2".to_string()]
        );
    }

    #[test]
    fn test_concurrent_commands_each_log_once() {
        let bridge = std::sync::Arc::new(MotorBridge::new("motorBridge0", MemoryLogAdapter::new()));

        let handles = (0..8)
            .map(|arg| {
                let bridge = bridge.clone();
                std::thread::spawn(move || bridge.handle_cmd(arg))
            })
            .collect::<Vec<_>>();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut records = bridge.log().records();
        records.sort();
        let mut expected = (0..8)
            .map(|arg| format!("MotorBridge received command arg={}", arg))
            .collect::<Vec<_>>();
        expected.sort();
        assert_eq!(records, expected);
    }
}
