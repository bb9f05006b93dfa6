//! # Overview
//!
//! `midly_rx` decodes MIDI input arriving as a raw, undelimited serial byte stream, such as a
//! 31250 baud UART feeding a circular DMA buffer on a microcontroller.
//!
//! Bytes are processed incrementally: messages split across several reads are reassembled,
//! running status is honored, SysEx dumps are skipped, and a single channel (or all of them) can
//! be selected. Complete messages are decoded into one of five events, handed to a
//! [`Handler`](trait.Handler.html):
//!
//! - Note on
//! - Note off (including note on messages with zero velocity)
//! - Control change
//! - Pitch bend
//! - System reset
//!
//! Every other message is consumed and silently ignored.
//!
//! # Receiving from a transport
//!
//! The [`MidiRx`](struct.MidiRx.html) type owns a [`Transport`](trait.Transport.html) and a
//! handler. The transport reports new data through a shared [`RxSignal`](struct.RxSignal.html),
//! usually from an interrupt, and the main loop calls `MidiRx::poll` to decode it:
//!
//! ```rust
//! use midly_rx::{Channel, Config, MidiRx, Result, RxEvent, RxSignal, Transport, num::u7};
//!
//! struct Synth;
//! impl midly_rx::Handler for Synth {
//!     fn note_on(&mut self, note: u7, velocity: u7) {
//!         println!("playing note {} at velocity {}", note, velocity);
//!     }
//!     fn system_reset(&mut self) {
//!         println!("panic! silencing everything");
//!     }
//! }
//!
//! # struct Uart([u8; 128]);
//! # impl Transport<'static> for Uart {
//! #     fn listen(&mut self, _signal: &'static RxSignal) -> Result<()> { Ok(()) }
//! #     fn rx_buffer(&self) -> &[u8] { &self.0 }
//! # }
//! static SIGNAL: RxSignal = RxSignal::new();
//!
//! # let uart = Uart([0; 128]);
//! let config = Config::new(Channel::from_number(1));
//! let mut midi: MidiRx<_, _> = MidiRx::new(uart, &SIGNAL, config, Synth).unwrap();
//! # SIGNAL.notify(RxEvent::Idle, 0);
//! loop {
//!     midi.poll();
//!     // Other main loop work...
//! #   break;
//! }
//! ```
//!
//! # Decoding bytes directly
//!
//! Bytes that do not come through a circular buffer can be fed straight into an
//! [`Assembler`](struct.Assembler.html):
//!
//! ```rust
//! use midly_rx::{Assembler, Channel, Event};
//!
//! let mut events = Vec::new();
//! let mut asm: Assembler = Assembler::default();
//! asm.feed(&[0x90, 60, 100, 64, 100], Channel::All, &mut |ev: Event| events.push(ev));
//! assert_eq!(events.len(), 2);
//! ```
//!
//! # Historical quirks
//!
//! By default the decoder reproduces the framing of the parser it replaces, warts included.
//! [`Config::strict`](struct.Config.html#method.strict) fixes them; see
//! [`Quirks`](struct.Quirks.html) and [`IngestCursor::new`](struct.IngestCursor.html#method.new)
//! for the details.
//!
//! # About features
//!
//! - The `std` feature
//!
//!   Enabled by default. Currently it only implements `std::error::Error` for
//!   [`Error`](struct.Error.html). Disabling it with `default-features = false` makes the crate
//!   `no_std`. The crate never allocates.
//!
//! Diagnostics are emitted through the [`log`](https://docs.rs/log) facade.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

macro_rules! bail {
    ($err:expr) => {{
        return Err($err.into());
    }};
}
macro_rules! ensure {
    ($cond:expr, $err:expr) => {{
        if !$cond {
            bail!($err)
        }
    }};
}

/// All of the errors this crate produces.
#[macro_use]
mod error;

mod prelude {
    pub(crate) use crate::{
        error::{ErrorKind, Result},
        filter::Channel,
        primitive::{u14, u4, u7},
    };
    pub(crate) use core::fmt;
}

mod assembler;
mod classify;
mod dispatch;
mod filter;
mod ingest;
mod primitive;
mod rx;

pub use crate::{
    assembler::{Assembler, Quirks, DEFAULT_STAGE_LEN},
    classify::{classify, Verdict},
    dispatch::{Event, Handler},
    error::{Error, ErrorKind, Result},
    filter::{Channel, CHANNEL_ALL},
    ingest::{IngestCursor, RxEvent, RxSignal, DEFAULT_BUFFER_SIZE},
    rx::{Config, MidiRx, Transport},
};

/// Exotically-sized integers used by the MIDI standard.
pub mod num {
    pub use crate::primitive::{u14, u4, u7};
}
