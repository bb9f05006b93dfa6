//! Reassembly of MIDI messages out of an undelimited byte stream.
//!
//! The assembler is fed one byte at a time and keeps just enough state across calls to rebuild
//! messages split over several reads, including running status (consecutive messages of the same
//! type omitting their status byte).

use crate::{
    classify::{classify, Verdict},
    dispatch::{dispatch, Handler},
    prelude::*,
};

/// The default amount of bytes a staged message may take up, status byte included.
pub const DEFAULT_STAGE_LEN: usize = 8;

/// Toggles for quirks of the historical parser that this assembler can either reproduce or fix.
///
/// The default reproduces the historical behavior exactly.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Hash)]
pub struct Quirks {
    /// Rewind the cursor after every completed message.
    ///
    /// When disabled, the cursor is only rewound after a message that was actually handed to the
    /// handler. Messages that are ignored (aftertouch, program change, system common, or messages
    /// on another channel) leave the cursor where it is, so under running status further data
    /// bytes pile up after them until the staging area overflows.
    pub reset_after_any: bool,
    /// Let System Realtime bytes other than System Reset through without touching any state.
    ///
    /// When disabled, they act like a status byte of unknown length, abandoning whatever message
    /// was being assembled.
    pub transparent_realtime: bool,
}

/// Message framing state machine.
///
/// `K` is the staging capacity, counting the status byte.
/// It must be at least 8, which is checked at compile time.
#[derive(Clone, Debug)]
pub struct Assembler<const K: usize = DEFAULT_STAGE_LEN> {
    /// Slot 0 holds the last status byte, the rest hold data bytes as they arrive.
    stage: [u8; K],
    /// Amount of data bytes received since the last status byte. Always below `K`.
    cursor: usize,
    /// Data bytes that complete the staged message, or `None` if it can never complete.
    data_len: Option<usize>,
    quirks: Quirks,
}
impl<const K: usize> Assembler<K> {
    const CHECK_CAP: () = assert!(K >= 8, "staging capacity must be at least 8 bytes");

    /// Create a fresh assembler with the given quirk handling.
    ///
    /// Until the first status byte arrives, data bytes are discarded.
    #[inline]
    pub fn new(quirks: Quirks) -> Assembler<K> {
        #[allow(clippy::let_unit_value)]
        let () = Self::CHECK_CAP;
        Assembler {
            stage: [0; K],
            cursor: 0,
            data_len: None,
            quirks,
        }
    }

    /// The quirks this assembler was created with.
    #[inline]
    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    /// Abandon the message being assembled and forget running status.
    #[inline]
    pub fn clear(&mut self) {
        self.cursor = 0;
        self.data_len = None;
    }

    /// The meaningful part of the staging area: the last status byte and the data bytes received
    /// after it.
    #[inline]
    pub fn staged(&self) -> &[u8] {
        &self.stage[..=self.cursor]
    }

    /// Feed a single byte, calling the handler if it completes a message that passes the channel
    /// filter.
    pub fn feed_byte<H: Handler + ?Sized>(&mut self, byte: u8, channel: Channel, handler: &mut H) {
        match classify(byte) {
            Verdict::Reset => {
                // Panic button: abandon everything, and make sure stray data bytes following it
                // are not taken as running status
                log::debug!("system reset");
                self.clear();
                handler.system_reset();
                return;
            }
            Verdict::Realtime(_) if self.quirks.transparent_realtime => return,
            Verdict::Realtime(_) => self.status(byte, None),
            Verdict::Status { data_len } => self.status(byte, data_len),
            Verdict::Data => self.data(byte),
        }
        match self.data_len {
            Some(len) if self.cursor >= len => {
                let dispatched = dispatch(self.staged(), channel, handler);
                if dispatched || self.quirks.reset_after_any {
                    // Make room for the next message under running status
                    self.cursor = 0;
                }
            }
            _ => {}
        }
    }

    /// Feed a slice of bytes, calling the handler whenever a message completes.
    ///
    /// Calling `feed` with many small slices is equivalent to calling `feed` with one large
    /// concatenation of them all.
    pub fn feed<H: Handler + ?Sized>(&mut self, bytes: &[u8], channel: Channel, handler: &mut H) {
        for &byte in bytes {
            self.feed_byte(byte, channel, handler);
        }
    }

    #[inline]
    fn status(&mut self, status: u8, data_len: Option<usize>) {
        if self.data_len.is_none() && self.cursor > 0 {
            log::trace!("skipped {} bytes after {:02x}", self.cursor, self.stage[0]);
        }
        self.cursor = 0;
        self.data_len = data_len;
        self.stage[0] = status;
    }

    #[inline]
    fn data(&mut self, byte: u8) {
        if self.cursor < K - 1 {
            self.cursor += 1;
        } else {
            // Too long to stage, drop it instead of overrunning the buffer
            log::debug!("abandoned message longer than {} bytes", K);
            self.cursor = 0;
        }
        self.stage[self.cursor] = byte;
    }

    #[cfg(test)]
    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    #[cfg(test)]
    pub(crate) fn data_len(&self) -> Option<usize> {
        self.data_len
    }
}
impl<const K: usize> Default for Assembler<K> {
    #[inline]
    fn default() -> Assembler<K> {
        Assembler::new(Quirks::default())
    }
}
