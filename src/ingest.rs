//! The handoff between a transport writing into a circular buffer from interrupt context and the
//! main loop draining it.
//!
//! The transport owns a fixed-size circular buffer (usually the target of a circular DMA
//! transfer). Whenever a chunk of it becomes valid, the interrupt handler calls
//! [`RxSignal::notify`](struct.RxSignal.html#method.notify) with the boundary up to which bytes
//! are valid. Later on, the main loop drains the range between the last consumed byte and that
//! boundary.

use crate::prelude::*;
use core::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};

/// The default size of the circular receive buffer.
pub const DEFAULT_BUFFER_SIZE: usize = 128;

/// Why the transport reported new data.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum RxEvent {
    /// The first half of the circular buffer was filled.
    HalfTransfer,
    /// The second half of the circular buffer was filled, and the transfer wraps around.
    TransferComplete,
    /// The line went idle before reaching either half, so an arbitrary amount of bytes is valid.
    Idle,
}
impl RxEvent {
    #[inline]
    fn encode(self) -> u8 {
        match self {
            RxEvent::HalfTransfer => 1,
            RxEvent::TransferComplete => 2,
            RxEvent::Idle => 3,
        }
    }

    #[inline]
    fn decode(code: u8) -> Option<RxEvent> {
        Some(match code {
            1 => RxEvent::HalfTransfer,
            2 => RxEvent::TransferComplete,
            3 => RxEvent::Idle,
            _ => return None,
        })
    }
}

/// The flag and boundary shared between the producing interrupt and the consuming main loop.
///
/// This is the only state touched by both sides. It is meant to live in a `static`, so that the
/// interrupt handler can reach it:
///
/// ```rust
/// use midly_rx::{RxEvent, RxSignal};
///
/// static MIDI_SIGNAL: RxSignal = RxSignal::new();
///
/// // In the receive interrupt:
/// MIDI_SIGNAL.notify(RxEvent::HalfTransfer, 64);
/// assert!(MIDI_SIGNAL.is_pending());
/// ```
///
/// The flag is edge-triggered: several notifications before a drain collapse into one, and only
/// the latest boundary is kept.
/// Consuming the flag requires atomic swaps, which some targets lack natively.
#[derive(Debug, Default)]
pub struct RxSignal {
    ready: AtomicBool,
    valid_up_to: AtomicUsize,
    last_event: AtomicU8,
}
impl RxSignal {
    /// Create a signal with no pending data.
    #[inline]
    pub const fn new() -> RxSignal {
        RxSignal {
            ready: AtomicBool::new(false),
            valid_up_to: AtomicUsize::new(0),
            last_event: AtomicU8::new(0),
        }
    }

    /// Report that the bytes of the circular buffer up to (excluding) `valid_up_to` are ready.
    ///
    /// Meant to be called from the transport's receive interrupt. Never blocks.
    #[inline]
    pub fn notify(&self, event: RxEvent, valid_up_to: usize) {
        self.valid_up_to.store(valid_up_to, Ordering::Relaxed);
        self.last_event.store(event.encode(), Ordering::Relaxed);
        self.ready.store(true, Ordering::Release);
    }

    /// Whether there is a notification that has not been drained yet.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// The kind of the latest notification, if there ever was one.
    #[inline]
    pub fn last_event(&self) -> Option<RxEvent> {
        RxEvent::decode(self.last_event.load(Ordering::Relaxed))
    }

    /// Consume the pending notification, returning a snapshot of the boundary it reported.
    ///
    /// The flag is cleared before the drain starts, so a notification arriving mid-drain stays
    /// pending for the next poll.
    #[inline]
    pub(crate) fn take(&self) -> Option<usize> {
        if self.ready.swap(false, Ordering::Acquire) {
            Some(self.valid_up_to.load(Ordering::Relaxed))
        } else {
            None
        }
    }
}

/// Tracks how much of the circular buffer has been consumed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IngestCursor {
    consumed: usize,
    capacity: usize,
    wrap_at_capacity: bool,
}
impl IngestCursor {
    /// Create a cursor over a circular buffer of the given capacity, which must be even and
    /// non-zero.
    ///
    /// If `wrap_at_capacity` is disabled the cursor wraps back to 0 as soon as it reaches
    /// `capacity - 1`, like the historical parser did. This means a boundary reported at exactly
    /// `capacity - 1` leaves the last byte of the buffer unread, and the following drain re-reads
    /// the buffer from its start.
    /// If enabled, the cursor only wraps once the whole buffer was consumed, and drains across the
    /// end of the buffer if the reported boundary is found behind the cursor.
    pub fn new(capacity: usize, wrap_at_capacity: bool) -> Result<IngestCursor> {
        ensure!(capacity > 0, err_invalid!("empty receive buffer"));
        ensure!(
            capacity % 2 == 0,
            err_invalid!("receive buffer capacity must be even")
        );
        Ok(IngestCursor {
            consumed: 0,
            capacity,
            wrap_at_capacity,
        })
    }

    /// The index of the next byte to be consumed.
    #[inline]
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// The capacity of the circular buffer.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Feed every byte between the consumed cursor and `valid_up_to` to `sink`, in order, and
    /// advance the cursor.
    ///
    /// Returns the amount of bytes fed.
    pub fn drain(&mut self, buf: &[u8], valid_up_to: usize, mut sink: impl FnMut(u8)) -> usize {
        let capacity = self.capacity.min(buf.len());
        let buf = &buf[..capacity];
        let mut end = valid_up_to;
        if end > capacity {
            log::debug!("clamped rx boundary {} to {}", end, capacity);
            end = capacity;
        }
        let start = self.consumed.min(capacity);
        let fed = if start <= end {
            buf[start..end].iter().for_each(|&byte| sink(byte));
            end - start
        } else if self.wrap_at_capacity {
            // The transport wrapped around behind us
            log::trace!("rx boundary {} behind cursor {}, draining around", end, start);
            buf[start..]
                .iter()
                .chain(buf[..end].iter())
                .for_each(|&byte| sink(byte));
            capacity - start + end
        } else {
            0
        };
        log::trace!("drained {} bytes up to {}", fed, end);
        self.consumed = end;
        let wrap_point = if self.wrap_at_capacity {
            capacity
        } else {
            capacity.saturating_sub(1)
        };
        if self.consumed >= wrap_point {
            log::debug!("rx cursor wrapped at {}", self.consumed);
            self.consumed = 0;
        }
        fed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain_all(cursor: &mut IngestCursor, buf: &[u8], valid_up_to: usize) -> Vec<u8> {
        let mut out = Vec::new();
        let fed = cursor.drain(buf, valid_up_to, |byte| out.push(byte));
        assert_eq!(fed, out.len());
        out
    }

    #[test]
    fn capacity_checks() {
        assert!(IngestCursor::new(0, false).is_err());
        assert_eq!(
            IngestCursor::new(7, true).unwrap_err().kind(),
            ErrorKind::Invalid("receive buffer capacity must be even")
        );
        assert_eq!(IngestCursor::new(8, false).unwrap().capacity(), 8);
    }

    #[test]
    fn signal_handoff() {
        let signal = RxSignal::new();
        assert_eq!(signal.take(), None);
        assert_eq!(signal.last_event(), None);
        signal.notify(RxEvent::Idle, 3);
        signal.notify(RxEvent::HalfTransfer, 4);
        assert!(signal.is_pending());
        assert_eq!(signal.last_event(), Some(RxEvent::HalfTransfer));
        assert_eq!(signal.take(), Some(4));
        assert!(!signal.is_pending());
        assert_eq!(signal.take(), None);
    }

    #[test]
    fn sequential_drains() {
        let buf: Vec<u8> = (0..8).collect();
        let mut cursor = IngestCursor::new(8, true).unwrap();
        assert_eq!(drain_all(&mut cursor, &buf, 3), [0, 1, 2]);
        assert_eq!(drain_all(&mut cursor, &buf, 3), [0u8; 0]);
        assert_eq!(drain_all(&mut cursor, &buf, 8), [3, 4, 5, 6, 7]);
        assert_eq!(cursor.consumed(), 0);
        assert_eq!(drain_all(&mut cursor, &buf, 2), [0, 1]);
    }

    #[test]
    fn clamps_boundary() {
        let buf: Vec<u8> = (0..8).collect();
        let mut cursor = IngestCursor::new(8, true).unwrap();
        assert_eq!(drain_all(&mut cursor, &buf, 100), [0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(cursor.consumed(), 0);
    }

    #[test]
    fn historical_wrap_point() {
        let buf: Vec<u8> = (0..8).collect();
        let mut cursor = IngestCursor::new(8, false).unwrap();
        // A boundary one short of the end wraps the cursor, leaving the last byte unread
        assert_eq!(drain_all(&mut cursor, &buf, 7), [0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(cursor.consumed(), 0);
        // The next boundary at the end re-reads the whole buffer
        assert_eq!(drain_all(&mut cursor, &buf, 8), [0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(cursor.consumed(), 0);
        // A boundary behind the cursor drains nothing
        assert_eq!(drain_all(&mut cursor, &buf, 5), [0, 1, 2, 3, 4]);
        assert_eq!(drain_all(&mut cursor, &buf, 2), [0u8; 0]);
        assert_eq!(cursor.consumed(), 2);
    }

    #[test]
    fn fixed_wrap_point() {
        let buf: Vec<u8> = (0..8).collect();
        let mut cursor = IngestCursor::new(8, true).unwrap();
        assert_eq!(drain_all(&mut cursor, &buf, 7), [0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(cursor.consumed(), 7);
        assert_eq!(drain_all(&mut cursor, &buf, 8), [7]);
        assert_eq!(cursor.consumed(), 0);
        // A boundary behind the cursor means the transport wrapped around
        assert_eq!(drain_all(&mut cursor, &buf, 6), [0, 1, 2, 3, 4, 5]);
        assert_eq!(drain_all(&mut cursor, &buf, 2), [6, 7, 0, 1]);
        assert_eq!(cursor.consumed(), 2);
    }
}
