//! MAC command framework.
//!
//! MAC commands ride along data frames, below the application payload.
//! Each command starts with a one byte command identifier ([`Cid`]); the
//! parameter bytes that follow depend on the identifier and on whether the
//! command travels uplink (device to server) or downlink.
//!
//! Only `RXTimingSetup` has modeled parameters. Other recognised
//! identifiers are carried as [`MacCommand::Unmodeled`] so a frame can
//! still be walked, but they refuse to encode or describe themselves.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::MacCommandError;

/// MAC command identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Cid {
    LinkCheckCmd = 0x02,
    LinkAdrCmd = 0x03,
    DutyCycleCmd = 0x04,
    RxParamCmd = 0x05,
    DevStatusCmd = 0x06,
    NewChannelCmd = 0x07,
    RxTimingCmd = 0x08,
}

impl Cid {
    pub fn value(&self) -> u8 {
        *self as u8
    }

    /// Command family name, as LoRaWAN 1.0.2 spells it.
    pub fn name(&self) -> &'static str {
        match self {
            Cid::LinkCheckCmd => "LinkCheck",
            Cid::LinkAdrCmd => "LinkADR",
            Cid::DutyCycleCmd => "DutyCycle",
            Cid::RxParamCmd => "RXParamSetup",
            Cid::DevStatusCmd => "DevStatus",
            Cid::NewChannelCmd => "NewChannel",
            Cid::RxTimingCmd => "RXTimingSetup",
        }
    }

    /// Parameter bytes following the identifier (LoRaWAN 1.0.2).
    pub fn payload_len(&self, direction: Direction) -> usize {
        match (self, direction) {
            (Cid::LinkCheckCmd, Direction::Uplink) => 0,
            (Cid::LinkCheckCmd, Direction::Downlink) => 2,
            (Cid::LinkAdrCmd, Direction::Uplink) => 1,
            (Cid::LinkAdrCmd, Direction::Downlink) => 4,
            (Cid::DutyCycleCmd, Direction::Uplink) => 0,
            (Cid::DutyCycleCmd, Direction::Downlink) => 1,
            (Cid::RxParamCmd, Direction::Uplink) => 1,
            (Cid::RxParamCmd, Direction::Downlink) => 4,
            (Cid::DevStatusCmd, Direction::Uplink) => 2,
            (Cid::DevStatusCmd, Direction::Downlink) => 0,
            (Cid::NewChannelCmd, Direction::Uplink) => 1,
            (Cid::NewChannelCmd, Direction::Downlink) => 5,
            (Cid::RxTimingCmd, Direction::Uplink) => 0,
            (Cid::RxTimingCmd, Direction::Downlink) => 1,
        }
    }

    /// Full wire length including the identifier byte.
    pub fn wire_len(&self, direction: Direction) -> usize {
        1 + self.payload_len(direction)
    }
}

impl TryFrom<u8> for Cid {
    type Error = MacCommandError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x02 => Ok(Cid::LinkCheckCmd),
            0x03 => Ok(Cid::LinkAdrCmd),
            0x04 => Ok(Cid::DutyCycleCmd),
            0x05 => Ok(Cid::RxParamCmd),
            0x06 => Ok(Cid::DevStatusCmd),
            0x07 => Ok(Cid::NewChannelCmd),
            0x08 => Ok(Cid::RxTimingCmd),
            other => Err(MacCommandError::UnknownCid(other)),
        }
    }
}

/// Frame direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Device to network server; carries answers (and LinkCheckReq).
    Uplink,
    /// Network server to device; carries requests.
    Downlink,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Uplink => write!(f, "uplink"),
            Direction::Downlink => write!(f, "downlink"),
        }
    }
}

/// Operation a command can refuse with [`MacCommandError::Unsupported`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Encode,
    Describe,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Encode => write!(f, "encode"),
            Operation::Describe => write!(f, "describe"),
        }
    }
}

/// Highest value of the 4-bit RX1 delay field.
pub const MAX_RX_TIMING_DELAY: u8 = 0x0F;

/// MAC command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MacCommand {
    /// RX timing setup request
    RxTimingSetupReq {
        /// RX1 delay field (0-15)
        delay: u8,
    },
    /// RX timing setup answer
    RxTimingSetupAns,
    /// Recognised command whose parameters are not modeled
    Unmodeled {
        cid: Cid,
        direction: Direction,
        payload: Vec<u8>,
    },
}

impl MacCommand {
    /// Build a downlink `RXTimingSetupReq`.
    pub fn rx_timing_setup_req(delay: u8) -> Result<Self, MacCommandError> {
        if delay > MAX_RX_TIMING_DELAY {
            return Err(MacCommandError::InvalidParameter(format!(
                "RX timing delay {} exceeds {}",
                delay, MAX_RX_TIMING_DELAY
            )));
        }
        Ok(MacCommand::RxTimingSetupReq { delay })
    }

    /// Build an uplink `RXTimingSetupAns`.
    pub fn rx_timing_setup_ans() -> Self {
        MacCommand::RxTimingSetupAns
    }

    pub fn cid(&self) -> Cid {
        match self {
            MacCommand::RxTimingSetupReq { .. } | MacCommand::RxTimingSetupAns => Cid::RxTimingCmd,
            MacCommand::Unmodeled { cid, .. } => *cid,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            MacCommand::RxTimingSetupReq { .. } => Direction::Downlink,
            MacCommand::RxTimingSetupAns => Direction::Uplink,
            MacCommand::Unmodeled { direction, .. } => *direction,
        }
    }

    /// Declared wire size in bytes, identifier included.
    pub fn length(&self) -> usize {
        match self {
            MacCommand::Unmodeled { payload, .. } => 1 + payload.len(),
            modeled => modeled.cid().wire_len(modeled.direction()),
        }
    }

    /// RX1 window delay in seconds; a zero field means one second.
    pub fn rx1_delay_secs(&self) -> Option<u8> {
        match self {
            MacCommand::RxTimingSetupReq { delay } => Some((*delay).max(1)),
            _ => None,
        }
    }

    /// Wire encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, MacCommandError> {
        match self {
            MacCommand::RxTimingSetupReq { delay } => {
                Ok(vec![Cid::RxTimingCmd.value(), delay & MAX_RX_TIMING_DELAY])
            }
            MacCommand::RxTimingSetupAns => Ok(vec![Cid::RxTimingCmd.value()]),
            MacCommand::Unmodeled { .. } => Err(self.unsupported(Operation::Encode)),
        }
    }

    /// Human readable form for logs and diagnostics.
    pub fn describe(&self) -> Result<String, MacCommandError> {
        match self {
            MacCommand::RxTimingSetupReq { delay } => Ok(format!("RXTimingSetupReq(Delay: {})", delay)),
            MacCommand::RxTimingSetupAns => Ok("RXTimingSetupAns".to_string()),
            MacCommand::Unmodeled { .. } => Err(self.unsupported(Operation::Describe)),
        }
    }

    /// Read one command from the start of `bytes`.
    ///
    /// Returns the command and the number of bytes it occupied.
    pub fn parse(bytes: &[u8], direction: Direction) -> Result<(Self, usize), MacCommandError> {
        let (&first, rest) = bytes.split_first().ok_or(MacCommandError::Empty)?;
        let cid = Cid::try_from(first)?;
        let expected = cid.payload_len(direction);
        if rest.len() < expected {
            return Err(MacCommandError::Truncated {
                cid,
                expected: 1 + expected,
                available: bytes.len(),
            });
        }
        let params = &rest[..expected];

        let command = match (cid, direction) {
            (Cid::RxTimingCmd, Direction::Downlink) => MacCommand::RxTimingSetupReq {
                delay: params[0] & MAX_RX_TIMING_DELAY,
            },
            (Cid::RxTimingCmd, Direction::Uplink) => MacCommand::RxTimingSetupAns,
            _ => MacCommand::Unmodeled {
                cid,
                direction,
                payload: params.to_vec(),
            },
        };

        Ok((command, 1 + expected))
    }

    fn unsupported(&self, operation: Operation) -> MacCommandError {
        MacCommandError::Unsupported {
            cid: self.cid(),
            direction: self.direction(),
            operation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rx_timing_req_encoding() {
        let cmd = MacCommand::rx_timing_setup_req(1).unwrap();
        assert_eq!(cmd.length(), 2);
        assert_eq!(cmd.direction(), Direction::Downlink);
        assert_eq!(cmd.to_bytes().unwrap(), vec![0x08, 0x01]);
        assert_eq!(cmd.describe().unwrap(), "RXTimingSetupReq(Delay: 1)");
    }

    #[test]
    fn test_rx_timing_ans_encoding() {
        let cmd = MacCommand::rx_timing_setup_ans();
        assert_eq!(cmd.length(), 1);
        assert_eq!(cmd.cid(), Cid::RxTimingCmd);
        assert_eq!(cmd.to_bytes().unwrap(), vec![0x08]);
        assert_eq!(cmd.describe().unwrap(), "RXTimingSetupAns");
    }

    #[test]
    fn test_rx_timing_delay_range() {
        assert!(MacCommand::rx_timing_setup_req(15).is_ok());
        assert!(matches!(
            MacCommand::rx_timing_setup_req(16),
            Err(MacCommandError::InvalidParameter(_))
        ));
        assert_eq!(
            MacCommand::rx_timing_setup_req(0).unwrap().rx1_delay_secs(),
            Some(1)
        );
        assert_eq!(
            MacCommand::rx_timing_setup_req(5).unwrap().rx1_delay_secs(),
            Some(5)
        );
    }

    #[test]
    fn test_unmodeled_fails_loudly() {
        let cmd = MacCommand::Unmodeled {
            cid: Cid::DevStatusCmd,
            direction: Direction::Uplink,
            payload: vec![0xFF, 0x0A],
        };
        assert_eq!(cmd.length(), 3);
        assert_eq!(
            cmd.to_bytes(),
            Err(MacCommandError::Unsupported {
                cid: Cid::DevStatusCmd,
                direction: Direction::Uplink,
                operation: Operation::Encode,
            })
        );
        let err = cmd.describe().unwrap_err();
        assert!(err.to_string().contains("describe"));
    }

    #[test]
    fn test_parse_rx_timing_req_masks_rfu_bits() {
        let (cmd, used) = MacCommand::parse(&[0x08, 0xF3], Direction::Downlink).unwrap();
        assert_eq!(used, 2);
        assert_eq!(cmd, MacCommand::RxTimingSetupReq { delay: 3 });
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            MacCommand::parse(&[], Direction::Uplink),
            Err(MacCommandError::Empty)
        );
        assert_eq!(
            MacCommand::parse(&[0x7F], Direction::Uplink),
            Err(MacCommandError::UnknownCid(0x7F))
        );
        assert_eq!(
            MacCommand::parse(&[0x08], Direction::Downlink),
            Err(MacCommandError::Truncated {
                cid: Cid::RxTimingCmd,
                expected: 2,
                available: 1,
            })
        );
    }

    #[test]
    fn test_cid_round_trip() {
        for value in 0x02..=0x08u8 {
            assert_eq!(Cid::try_from(value).unwrap().value(), value);
        }
        assert!(Cid::try_from(0x01).is_err());
    }
}
