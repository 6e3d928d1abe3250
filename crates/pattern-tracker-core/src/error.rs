//! Error types for host interaction and stop-command parsing.
//!
//! None of these are fatal. The tracker logs them where they occur and
//! carries on with the next track, slot, or event.

use thiserror::Error;

use crate::{TrackAddress, TrackSlotAddress};

/// A command or query the host could not carry out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The track no longer exists at this bank position.
    #[error("track {0} no longer exists")]
    MissingTrack(TrackAddress),

    /// The clip slot no longer exists at this bank position.
    #[error("clip slot {0} no longer exists")]
    MissingSlot(TrackSlotAddress),

    /// The host refused or failed the call.
    #[error("host rejected the call: {0}")]
    Rejected(String),
}

/// A pattern slot name that starts with the stop keyword but is not a
/// usable stop command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StopCommandError {
    /// Nothing but whitespace follows the keyword.
    #[error("invalid stop command: expected \"{keyword}<TrackName>\"")]
    EmptyTarget {
        /// The keyword in effect when the command was parsed.
        keyword: String,
    },
}
