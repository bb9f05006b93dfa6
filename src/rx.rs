//! The receiver handle, tying a transport, the framing state machine and a handler together.

use crate::{
    assembler::{Assembler, Quirks, DEFAULT_STAGE_LEN},
    dispatch::Handler,
    ingest::{IngestCursor, RxSignal},
    prelude::*,
};

/// A source of raw MIDI bytes, such as a UART receiving into a circular DMA buffer.
///
/// The transport is expected to write received bytes into its circular buffer on its own, and
/// to call [`RxSignal::notify`](struct.RxSignal.html#method.notify) (typically from an interrupt
/// handler) whenever a chunk of the buffer becomes valid.
pub trait Transport<'a> {
    /// Start receiving, reporting new data through the given signal.
    ///
    /// Called once, when the receiver is created.
    fn listen(&mut self, signal: &'a RxSignal) -> Result<()>;

    /// The circular buffer received bytes are written to.
    ///
    /// Its length is the buffer capacity, and must stay the same for the lifetime of the
    /// transport.
    fn rx_buffer(&self) -> &[u8];
}

/// Receiver settings, fixed once the receiver is created.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Hash)]
pub struct Config {
    /// The channel to listen to.
    pub channel: Channel,
    /// Which framing quirks of the historical parser to reproduce.
    pub quirks: Quirks,
    /// Wrap the consumed cursor at the end of the buffer instead of one byte short of it.
    ///
    /// See [`IngestCursor::new`](struct.IngestCursor.html#method.new).
    pub wrap_at_capacity: bool,
}
impl Config {
    /// Settings reproducing the historical parser exactly, listening on the given channel.
    #[inline]
    pub fn new(channel: Channel) -> Config {
        Config {
            channel,
            quirks: Quirks::default(),
            wrap_at_capacity: false,
        }
    }

    /// Settings with every known quirk of the historical parser fixed.
    #[inline]
    pub fn strict(channel: Channel) -> Config {
        Config {
            channel,
            quirks: Quirks {
                reset_after_any: true,
                transparent_realtime: true,
            },
            wrap_at_capacity: true,
        }
    }
}

/// A MIDI input: drains a transport's circular buffer, decodes messages and calls a handler.
///
/// `K` is the staging capacity of the message assembler.
///
/// # Usage
///
/// ```rust
/// use midly_rx::{Channel, Config, Event, MidiRx, Result, RxEvent, RxSignal, Transport};
///
/// struct Uart {
///     dma_buf: [u8; 128],
/// }
/// impl Transport<'static> for Uart {
///     fn listen(&mut self, _signal: &'static RxSignal) -> Result<()> {
///         // Configure the peripheral, wire the interrupt up to `_signal.notify(..)`
///         Ok(())
///     }
///     fn rx_buffer(&self) -> &[u8] {
///         &self.dma_buf
///     }
/// }
///
/// static SIGNAL: RxSignal = RxSignal::new();
///
/// let mut uart = Uart { dma_buf: [0; 128] };
/// uart.dma_buf[..3].copy_from_slice(&[0x90, 60, 100]);
///
/// let mut notes = 0;
/// let handler = |ev: Event| {
///     if let Event::NoteOn { .. } = ev {
///         notes += 1;
///     }
/// };
/// let mut midi: MidiRx<_, _> = MidiRx::new(uart, &SIGNAL, Config::new(Channel::All), handler).unwrap();
///
/// // The interrupt fires...
/// SIGNAL.notify(RxEvent::Idle, 3);
/// // ...and the main loop picks the data up
/// midi.poll();
/// midi.poll();
/// drop(midi);
/// assert_eq!(notes, 1);
/// ```
pub struct MidiRx<'a, T, H = (), const K: usize = DEFAULT_STAGE_LEN> {
    transport: T,
    handler: H,
    signal: &'a RxSignal,
    config: Config,
    cursor: IngestCursor,
    assembler: Assembler<K>,
}
impl<'a, T, H, const K: usize> MidiRx<'a, T, H, K>
where
    T: Transport<'a>,
    H: Handler,
{
    /// Set up a receiver and arm the transport.
    ///
    /// Fails if the transport buffer capacity is zero or odd, or if the transport fails to start.
    pub fn new(mut transport: T, signal: &'a RxSignal, config: Config, handler: H) -> Result<Self> {
        let cursor = IngestCursor::new(transport.rx_buffer().len(), config.wrap_at_capacity)?;
        transport.listen(signal)?;
        log::info!(
            "midi input listening on {} ({} byte buffer, {:?})",
            config.channel,
            cursor.capacity(),
            config.quirks
        );
        Ok(MidiRx {
            transport,
            handler,
            signal,
            config,
            cursor,
            assembler: Assembler::new(config.quirks),
        })
    }

    /// Decode any data reported by the transport since the last poll.
    ///
    /// Does nothing if no new data was reported, so it can be called as often as desired.
    /// Handler hooks are called from within this method.
    pub fn poll(&mut self) {
        let valid_up_to = match self.signal.take() {
            Some(valid_up_to) => valid_up_to,
            None => return,
        };
        let MidiRx {
            transport,
            handler,
            config,
            cursor,
            assembler,
            ..
        } = self;
        let channel = config.channel;
        cursor.drain(transport.rx_buffer(), valid_up_to, |byte| {
            assembler.feed_byte(byte, channel, &mut *handler)
        });
    }

    /// Decode bytes that did not come through the transport, as if they had been drained from
    /// it.
    ///
    /// Decoder state is shared with `poll`, so a message may be split across both.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.assembler
            .feed(bytes, self.config.channel, &mut self.handler);
    }

    /// Abandon the message being assembled and forget running status, without calling the
    /// handler.
    #[inline]
    pub fn clear(&mut self) {
        self.assembler.clear();
    }
}
impl<'a, T, H, const K: usize> MidiRx<'a, T, H, K> {
    /// The settings this receiver was created with.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The channel this receiver listens to.
    #[inline]
    pub fn channel(&self) -> Channel {
        self.config.channel
    }

    /// Whether the transport reported data that was not polled yet.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.signal.is_pending()
    }

    #[inline]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[inline]
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    #[inline]
    pub fn handler(&self) -> &H {
        &self.handler
    }

    #[inline]
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Take the receiver apart, giving back the transport and the handler.
    #[inline]
    pub fn into_parts(self) -> (T, H) {
        (self.transport, self.handler)
    }

    #[cfg(test)]
    pub(crate) fn assembler(&self) -> &Assembler<K> {
        &self.assembler
    }

    #[cfg(test)]
    pub(crate) fn ingest_cursor(&self) -> &IngestCursor {
        &self.cursor
    }
}
