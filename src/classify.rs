//! Byte classification, the single source of truth for MIDI message framing.

/// What a single byte off the wire means to the message assembler.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum Verdict {
    /// The System Reset realtime byte, `0xFF`.
    ///
    /// Honored immediately, even in the middle of another message.
    Reset,
    /// Any other System Realtime byte (`0xF8 ..= 0xFE`), such as timing clock or active sensing.
    Realtime(u8),
    /// A status byte in the range `0x80 ..= 0xF7`, starting a new message.
    Status {
        /// How many data bytes complete a message with this status.
        ///
        /// `None` for messages that can never complete on their own, such as SysEx dumps or
        /// undefined system messages. These are skipped until the next status byte arrives.
        data_len: Option<usize>,
    },
    /// A data byte, with the top bit clear.
    Data,
}

/// Classify a byte off the wire.
///
/// This function is pure and has no notion of the surrounding stream.
#[inline]
pub fn classify(byte: u8) -> Verdict {
    match byte {
        0x00..=0x7F => Verdict::Data,
        0xFF => Verdict::Reset,
        0xF8..=0xFE => Verdict::Realtime(byte),
        _ => Verdict::Status {
            data_len: data_len(byte),
        },
    }
}

/// The amount of data bytes that follow a given status byte, if known.
#[inline]
fn data_len(status: u8) -> Option<usize> {
    match status {
        0x80..=0xBF | 0xE0..=0xEF => Some(2),
        0xC0..=0xDF => Some(1),
        // MTC quarter frame, song select
        0xF1 | 0xF3 => Some(1),
        // Song position
        0xF2 => Some(2),
        // SysEx, tune request, undefined system common and realtime bytes
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths() {
        for &(status, len) in &[
            (0x80, Some(2)),
            (0x9F, Some(2)),
            (0xA3, Some(2)),
            (0xB0, Some(2)),
            (0xC5, Some(1)),
            (0xD9, Some(1)),
            (0xEF, Some(2)),
            (0xF0, None),
            (0xF1, Some(1)),
            (0xF2, Some(2)),
            (0xF3, Some(1)),
            (0xF4, None),
            (0xF6, None),
            (0xF7, None),
        ] {
            assert_eq!(
                classify(status),
                Verdict::Status { data_len: len },
                "status {:02x}",
                status
            );
        }
    }

    #[test]
    fn data_and_realtime() {
        for byte in 0x00..=0x7F {
            assert_eq!(classify(byte), Verdict::Data);
        }
        for byte in 0xF8..=0xFE {
            assert_eq!(classify(byte), Verdict::Realtime(byte));
        }
        assert_eq!(classify(0xFF), Verdict::Reset);
    }
}
