//! # Command Module
//!
//! Control commands issued to the modem/radio subsystem.
//!
//! This module handles:
//! - The command vocabulary and its tab-delimited wire encoding
//! - The global sequence counter shared by every issuing task
//! - Dispatching: sequence assignment, formatting, transport hand-off

pub mod dispatcher;
pub mod sequence;

pub use dispatcher::CommandDispatcher;
pub use sequence::SequenceCounter;

/// A control command, before a sequence number is assigned.
///
/// Every dispatched command becomes one tab-delimited record of the form
/// `TYPE\tSEQ\tfield...` on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Target video bitrate
    Bitrate(u32),
    /// Target transmit power level
    TxPower(u32),
    /// Periodic liveness signal
    Heartbeat,
    /// Loss alert carrying the worst recent FEC-recovered/lost counts
    RecLost { fec_recovered: u64, lost: u64 },
    /// Free-form informational message
    Info(String),
    /// Free-form status report
    Status(String),
    /// Free-form action request (e.g. ENABLE, DISABLE, RESET)
    Action(String),
}

impl Command {
    /// Wire name of the command type.
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Bitrate(_) => "BITRATE",
            Command::TxPower(_) => "TX_PWR",
            Command::Heartbeat => "HEARTBEAT",
            Command::RecLost { .. } => "REC_LOST",
            Command::Info(_) => "INFO",
            Command::Status(_) => "STATUS",
            Command::Action(_) => "COMMAND",
        }
    }

    /// Encode the command as a wire record with the given sequence number.
    ///
    /// The record carries no trailing newline; the transport appends one.
    pub fn encode(&self, sequence: u64) -> String {
        match self {
            Command::Bitrate(bitrate) => format!("BITRATE\t{}\t{}", sequence, bitrate),
            Command::TxPower(power) => format!("TX_PWR\t{}\t{}", sequence, power),
            Command::Heartbeat => format!("HEARTBEAT\t{}\tHeartbeat received", sequence),
            Command::RecLost {
                fec_recovered,
                lost,
            } => format!("REC_LOST\t{}\t{}\t{}", sequence, fec_recovered, lost),
            Command::Info(info) => format!("INFO\t{}\t{}", sequence, info),
            Command::Status(status) => format!("STATUS\t{}\t{}", sequence, status),
            Command::Action(action) => format!("COMMAND\t{}\t{}", sequence, action),
        }
    }
}
