//! Decoded events and the hooks that receive them.

use crate::prelude::*;

/// A decoded musical event.
///
/// Events are handed to a [`Handler`](trait.Handler.html) as soon as they are decoded, and are
/// never buffered by the receiver.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum Event {
    /// A key was pressed.
    NoteOn { note: u7, velocity: u7 },
    /// A key was released.
    ///
    /// Note on messages with zero velocity are reported as note off messages with zero velocity.
    NoteOff { note: u7, velocity: u7 },
    /// A controller (knob, slider, pedal) changed its value.
    ///
    /// Both bytes are passed through exactly as they arrived, without masking off the top bit.
    ControlChange { controller: u8, value: u8 },
    /// The pitch wheel moved.
    ///
    /// The value is centered around 0, in the range `-8192 ..= 8191`.
    PitchBend { value: i16 },
    /// The sender requested a reset to the power-up state.
    ///
    /// Receivers should silence every output when this event arrives.
    SystemReset,
}
impl Event {
    /// Decode a completed channel message, status byte first.
    ///
    /// Returns `None` for message types that are not surfaced as events (aftertouch, program
    /// change, channel pressure, system common messages), and for truncated messages.
    ///
    /// Channel filtering is not applied here.
    pub fn decode(msg: &[u8]) -> Option<Event> {
        let (status, d1, d2) = match *msg {
            [status, d1, d2, ..] => (status, d1, d2),
            _ => return None,
        };
        let ev = match status >> 4 {
            0x8 => Event::NoteOff {
                note: u7::from(d1),
                velocity: u7::from(d2),
            },
            0x9 if d2 == 0 => {
                // Zero-velocity note on, implicit note off
                Event::NoteOff {
                    note: u7::from(d1),
                    velocity: u7::new(0),
                }
            }
            0x9 => Event::NoteOn {
                note: u7::from(d1),
                velocity: u7::from(d2),
            },
            0xB => Event::ControlChange {
                controller: d1,
                value: d2,
            },
            0xE => Event::PitchBend {
                value: pitch_bend(u7::from(d1), u7::from(d2)),
            },
            _ => return None,
        };
        Some(ev)
    }

    /// Invoke the handler hook corresponding to this event.
    #[inline]
    pub fn deliver<H: Handler + ?Sized>(self, handler: &mut H) {
        match self {
            Event::NoteOn { note, velocity } => handler.note_on(note, velocity),
            Event::NoteOff { note, velocity } => handler.note_off(note, velocity),
            Event::ControlChange { controller, value } => handler.control_change(controller, value),
            Event::PitchBend { value } => handler.pitch_bend(value),
            Event::SystemReset => handler.system_reset(),
        }
    }
}

/// Convert the two pitch bend data bytes into a signed, centered bend.
#[inline]
fn pitch_bend(lsb: u7, msb: u7) -> i16 {
    u14::from_halves(lsb, msb).as_int() as i16 - 0x2000
}

/// Receives decoded events.
///
/// Every hook defaults to doing nothing, so implementors only need to override the hooks they care
/// about.
/// Hooks are called synchronously, from within the call that drains the byte stream.
///
/// Any `FnMut(Event)` closure is also a handler, receiving every event as an `Event` value.
pub trait Handler {
    /// A key was pressed with a non-zero velocity.
    #[inline]
    fn note_on(&mut self, _note: u7, _velocity: u7) {}

    /// A key was released.
    #[inline]
    fn note_off(&mut self, _note: u7, _velocity: u7) {}

    /// A controller changed its value.
    #[inline]
    fn control_change(&mut self, _controller: u8, _value: u8) {}

    /// The pitch wheel moved, to a value in `-8192 ..= 8191`.
    #[inline]
    fn pitch_bend(&mut self, _value: i16) {}

    /// A System Reset byte arrived.
    #[inline]
    fn system_reset(&mut self) {}
}

/// Discards every event.
impl Handler for () {}

impl<F> Handler for F
where
    F: FnMut(Event),
{
    #[inline]
    fn note_on(&mut self, note: u7, velocity: u7) {
        self(Event::NoteOn { note, velocity })
    }
    #[inline]
    fn note_off(&mut self, note: u7, velocity: u7) {
        self(Event::NoteOff { note, velocity })
    }
    #[inline]
    fn control_change(&mut self, controller: u8, value: u8) {
        self(Event::ControlChange { controller, value })
    }
    #[inline]
    fn pitch_bend(&mut self, value: i16) {
        self(Event::PitchBend { value })
    }
    #[inline]
    fn system_reset(&mut self) {
        self(Event::SystemReset)
    }
}

/// Hand a completed message over to the handler, if it passes the channel filter and its type is
/// surfaced as an event.
///
/// Returns whether a hook was invoked.
pub(crate) fn dispatch<H: Handler + ?Sized>(msg: &[u8], channel: Channel, handler: &mut H) -> bool {
    let status = match msg.first() {
        Some(&status) => status,
        None => return false,
    };
    if !channel.accepts(status) {
        log::trace!("dropped message {:02x} outside of {}", status, channel);
        return false;
    }
    match Event::decode(msg) {
        Some(ev) => {
            ev.deliver(handler);
            true
        }
        None => {
            log::trace!("ignored message {:02x}", status);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(msg: &[u8]) -> Option<Event> {
        Event::decode(msg)
    }

    #[test]
    fn notes() {
        assert_eq!(
            decode(&[0x93, 60, 100]),
            Some(Event::NoteOn {
                note: u7::new(60),
                velocity: u7::new(100)
            })
        );
        assert_eq!(
            decode(&[0x93, 60, 0]),
            Some(Event::NoteOff {
                note: u7::new(60),
                velocity: u7::new(0)
            })
        );
        assert_eq!(
            decode(&[0x80, 0xFF, 0x85]),
            Some(Event::NoteOff {
                note: u7::new(0x7F),
                velocity: u7::new(0x05)
            })
        );
    }

    #[test]
    fn controller_is_unmasked() {
        assert_eq!(
            decode(&[0xB0, 0x87, 0xFE]),
            Some(Event::ControlChange {
                controller: 0x87,
                value: 0xFE
            })
        );
    }

    #[test]
    fn pitch_bend_range() {
        assert_eq!(decode(&[0xE0, 0x00, 0x40]), Some(Event::PitchBend { value: 0 }));
        assert_eq!(decode(&[0xE0, 0x7F, 0x7F]), Some(Event::PitchBend { value: 8191 }));
        assert_eq!(decode(&[0xE0, 0x00, 0x00]), Some(Event::PitchBend { value: -8192 }));
        assert_eq!(decode(&[0xE0, 0x01, 0x40]), Some(Event::PitchBend { value: 1 }));
    }

    #[test]
    fn undispatched() {
        assert_eq!(decode(&[0xA0, 60, 10]), None);
        assert_eq!(decode(&[0xC0, 5, 0]), None);
        assert_eq!(decode(&[0xD0, 5, 0]), None);
        assert_eq!(decode(&[0xF2, 5, 6]), None);
        assert_eq!(decode(&[0x90, 60]), None);
        assert_eq!(decode(&[]), None);
    }

    #[test]
    fn filtered_dispatch() {
        let mut seen = 0;
        let only_one = Channel::from_number(1);
        assert!(!dispatch(&[0x91, 60, 100], only_one, &mut |_ev: Event| seen += 1));
        assert!(dispatch(&[0x90, 60, 100], only_one, &mut |_ev: Event| seen += 1));
        assert!(!dispatch(&[0xC0, 1, 0], only_one, &mut |_ev: Event| seen += 1));
        assert_eq!(seen, 1);
    }
}
