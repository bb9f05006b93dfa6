//! Logical channel selection.

use crate::prelude::*;

/// Raw channel number meaning "listen to all channels", as accepted by
/// [`Channel::from_number`](enum.Channel.html#method.from_number).
pub const CHANNEL_ALL: u8 = 0xFF;

/// The channel a receiver listens to.
///
/// Only one channel (or all of them) can be selected at a time.
/// The channel is only used as a filter: events handed out do not carry their channel.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum Channel {
    /// Accept channel messages addressed to a single, zero-based channel.
    Only(u4),
    /// Accept channel messages on every channel.
    All,
}
impl Channel {
    /// Select a channel from its human-facing, one-based number in `1 ..= 16`.
    ///
    /// Any number out of that range, including [`CHANNEL_ALL`](constant.CHANNEL_ALL.html),
    /// selects all channels.
    #[inline]
    pub fn from_number(number: u8) -> Channel {
        match number {
            1..=16 => Channel::Only(u4::new(number - 1)),
            _ => Channel::All,
        }
    }

    /// Get the one-based channel number, or `CHANNEL_ALL`.
    #[inline]
    pub fn number(self) -> u8 {
        match self {
            Channel::Only(ch) => ch.as_int() + 1,
            Channel::All => CHANNEL_ALL,
        }
    }

    /// Whether a channel message with the given status byte passes this filter.
    ///
    /// The channel is read off the low nibble of the status byte.
    #[inline]
    pub fn accepts(self, status: u8) -> bool {
        match self {
            Channel::Only(ch) => ch == u4::from(status),
            Channel::All => true,
        }
    }
}
impl Default for Channel {
    #[inline]
    fn default() -> Channel {
        Channel::All
    }
}
impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Channel::Only(ch) => write!(f, "channel {}", ch.as_int() + 1),
            Channel::All => write!(f, "all channels"),
        }
    }
}
