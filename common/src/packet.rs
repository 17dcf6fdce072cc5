use heapless::Vec;
use thiserror_no_std::Error;

use crate::physical::DutyCycle;

/// Start byte of a frame whose payload length fits in one byte.
pub const START_SHORT: u8 = 0x02;

/// Start byte of a frame carrying a two byte payload length.
pub const START_LONG: u8 = 0x03;

/// Terminates every frame.
pub const END: u8 = 0x03;

/// Largest payload the motor controller accepts.
pub const MAX_PAYLOAD: usize = 512;

/// Start, two length bytes, two crc bytes and the end byte.
pub const MAX_FRAME: usize = MAX_PAYLOAD + 6;

pub type Payload = Vec<u8, MAX_PAYLOAD>;
pub type Frame = Vec<u8, MAX_FRAME>;

/// Command ids understood by the motor controller.
pub const COMM_SET_DUTY: u8 = 5;
pub const COMM_ALIVE: u8 = 30;

/// Commands sent from the host to a VESC motor controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VescCommand {
    /// Drive the motor at a fixed duty cycle.
    SetDuty(DutyCycle),

    /// Keep the controller from timing out and releasing the motor.
    Alive,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PacketError {
    #[error("Payload can't be empty.")]
    EmptyPayload,

    #[error("Payload longer than the controller accepts.")]
    PayloadTooLong,

    #[error("Not enough bytes for a complete frame.")]
    Incomplete,

    #[error("Invalid start byte {0:#04x}.")]
    InvalidStartByte(u8),

    #[error("Invalid end byte {0:#04x}.")]
    InvalidEndByte(u8),

    #[error("Checksum mismatch. Expected {expected:#06x}, found {found:#06x}.")]
    CrcMismatch { expected: u16, found: u16 },
}

/// CRC-16/XMODEM as used by the motor controller firmware.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if (crc & 0x8000) != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

impl VescCommand {
    /// Command id followed by the big endian body.
    pub fn payload(&self) -> Payload {
        let mut payload = Payload::new();
        match self {
            VescCommand::SetDuty(duty) => {
                // NOTE: capacity is far above 5 bytes so these can't fail.
                let _ = payload.push(COMM_SET_DUTY);
                let _ = payload.extend_from_slice(&duty.scaled().to_be_bytes());
            }
            VescCommand::Alive => {
                let _ = payload.push(COMM_ALIVE);
            }
        }
        payload
    }

    /// Encode this command as a complete frame ready to be written.
    pub fn to_frame(&self) -> Result<Frame, PacketError> {
        encode_frame(&self.payload())
    }
}

/// Wrap a payload with start byte, length, checksum and end byte.
pub fn encode_frame(payload: &[u8]) -> Result<Frame, PacketError> {
    if payload.is_empty() {
        return Err(PacketError::EmptyPayload);
    }
    if payload.len() > MAX_PAYLOAD {
        return Err(PacketError::PayloadTooLong);
    }

    let mut frame = Frame::new();
    let crc = crc16(payload).to_be_bytes();
    let length = payload.len() as u16;

    if length <= u8::MAX as u16 {
        frame
            .extend_from_slice(&[START_SHORT, length as u8])
            .map_err(|_| PacketError::PayloadTooLong)?;
    } else {
        frame
            .push(START_LONG)
            .map_err(|_| PacketError::PayloadTooLong)?;
        frame
            .extend_from_slice(&length.to_be_bytes())
            .map_err(|_| PacketError::PayloadTooLong)?;
    }

    frame
        .extend_from_slice(payload)
        .and_then(|_| frame.extend_from_slice(&crc))
        .map_err(|_| PacketError::PayloadTooLong)?;
    frame.push(END).map_err(|_| PacketError::PayloadTooLong)?;

    Ok(frame)
}

/// Decode the first frame in `buffer`.
/// Returns the payload and the number of bytes the frame used.
pub fn decode_frame(buffer: &[u8]) -> Result<(Payload, usize), PacketError> {
    let (length, header) = match buffer.first() {
        None => return Err(PacketError::Incomplete),
        Some(&START_SHORT) => match buffer.get(1) {
            None => return Err(PacketError::Incomplete),
            Some(&length) => (length as usize, 2),
        },
        Some(&START_LONG) => match (buffer.get(1), buffer.get(2)) {
            (Some(&hi), Some(&lo)) => (u16::from_be_bytes([hi, lo]) as usize, 3),
            _ => return Err(PacketError::Incomplete),
        },
        Some(&other) => return Err(PacketError::InvalidStartByte(other)),
    };

    if length == 0 {
        return Err(PacketError::EmptyPayload);
    }
    if length > MAX_PAYLOAD {
        return Err(PacketError::PayloadTooLong);
    }

    let total = header + length + 3;
    if buffer.len() < total {
        return Err(PacketError::Incomplete);
    }

    let body = &buffer[header..header + length];
    let found = u16::from_be_bytes([buffer[header + length], buffer[header + length + 1]]);
    let end = buffer[total - 1];

    if end != END {
        return Err(PacketError::InvalidEndByte(end));
    }

    let expected = crc16(body);
    if expected != found {
        return Err(PacketError::CrcMismatch { expected, found });
    }

    let mut payload = Payload::new();
    payload
        .extend_from_slice(body)
        .map_err(|_| PacketError::PayloadTooLong)?;

    Ok((payload, total))
}
