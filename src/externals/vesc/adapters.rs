use std::{io::Write, sync::Mutex, time::Duration};

use common::{packet::VescCommand, physical::DutyCycle};
use serialport::SerialPort;
use tracing::{debug, instrument, trace};

use crate::internals::core::ports::{MotorDriveError, MotorDrivePort};

pub type SerialPortWriter = Box<dyn SerialPort>;

/// Talks to a VESC motor controller over any byte sink.
/// The sink is locked for the duration of a single frame.
pub struct VescAdapter<W: Write + Send> {
    link: Mutex<W>,
}

impl<W: Write + Send> VescAdapter<W> {
    pub fn new(link: W) -> Self {
        Self {
            link: Mutex::new(link),
        }
    }

    /// Give back the underlying sink.
    pub fn into_inner(self) -> W {
        match self.link.into_inner() {
            Ok(link) => link,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[instrument(skip_all)]
    fn send(&self, command: VescCommand) -> Result<(), MotorDriveError> {
        let frame = command
            .to_frame()
            .map_err(|e| MotorDriveError::Encode(e.to_string()))?;

        let mut link = self.link.lock().map_err(|_| MotorDriveError::Poisoned)?;
        link.write_all(frame.as_slice())?;
        link.flush()?;

        trace!("Wrote {} byte frame for {:?}.", frame.len(), command);
        Ok(())
    }
}

impl VescAdapter<SerialPortWriter> {
    /// Open a serial connection to the controller.
    pub fn open_serial(
        path: &str,
        baud_rate: u32,
        timeout: Duration,
    ) -> Result<Self, MotorDriveError> {
        let port = serialport::new(path, baud_rate)
            .timeout(timeout)
            .open()
            .map_err(|source| MotorDriveError::Open {
                path: path.to_owned(),
                source,
            })?;
        debug!("Opened motor controller port '{}' at {} baud.", path, baud_rate);
        Ok(Self::new(port))
    }
}

impl<W: Write + Send> MotorDrivePort for VescAdapter<W> {
    fn set_duty_cycle(&self, duty: DutyCycle) -> Result<(), MotorDriveError> {
        self.send(VescCommand::SetDuty(duty))
    }

    fn keep_alive(&self) -> Result<(), MotorDriveError> {
        self.send(VescCommand::Alive)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use common::packet::{decode_frame, COMM_ALIVE, COMM_SET_DUTY};

    use super::*;

    struct BrokenLink;

    impl Write for BrokenLink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "unplugged"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writes_duty_then_alive_frames() {
        let adapter = VescAdapter::new(Vec::new());
        adapter
            .set_duty_cycle(DutyCycle::try_from(0.5f32).unwrap())
            .unwrap();
        adapter.keep_alive().unwrap();

        let written = adapter.into_inner();
        let (first, used) = decode_frame(&written).unwrap();
        assert_eq!(first.as_slice(), &[COMM_SET_DUTY, 0x00, 0x00, 0xC3, 0x50]);

        let (second, rest) = decode_frame(&written[used..]).unwrap();
        assert_eq!(second.as_slice(), &[COMM_ALIVE]);
        assert_eq!(used + rest, written.len());
    }

    #[test]
    fn test_write_failure_is_reported() {
        let adapter = VescAdapter::new(BrokenLink);
        let result = adapter.set_duty_cycle(DutyCycle::ZERO);
        assert!(matches!(result, Err(MotorDriveError::Io(_))));
    }
}
