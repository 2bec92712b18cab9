//! Keyboard input decoding
//!
//! Turns the raw bytes a terminal sends in raw mode into [`Key`]s.
//! The decoder is a small streaming state machine, so escape sequences and
//! multi-byte UTF-8 characters may be split across reads.
//!
//! States:
//! - Ground: plain characters and C0 controls
//! - Escape: after ESC, waiting for `[` (CSI), `O` (SS3) or anything else
//! - Csi: collecting parameter bytes until the final byte
//! - Ss3: waiting for the single final byte
//!
//! A lone ESC is ambiguous until the next byte arrives. Callers that see
//! no further input should call [`KeyDecoder::flush`] to emit it.

use log::trace;
use qeike_core::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ground,
    Escape,
    Csi,
    Ss3,
}

/// Streaming key decoder
#[derive(Debug)]
pub struct KeyDecoder {
    state: State,
    /// CSI parameter bytes
    params: Vec<u8>,
    /// UTF-8 bytes collected for the current character
    utf8_buffer: [u8; 4],
    utf8_len: usize,
    utf8_expected: usize,
}

impl Default for KeyDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyDecoder {
    pub fn new() -> Self {
        Self {
            state: State::Ground,
            params: Vec::with_capacity(8),
            utf8_buffer: [0; 4],
            utf8_len: 0,
            utf8_expected: 0,
        }
    }

    /// Whether a partial escape sequence is buffered
    pub fn is_pending(&self) -> bool {
        self.state != State::Ground
    }

    /// Decode a chunk of bytes
    pub fn feed(&mut self, data: &[u8]) -> Vec<Key> {
        let mut keys = Vec::new();
        for &byte in data {
            self.process_byte(byte, &mut keys);
        }
        keys
    }

    /// Resolve whatever is buffered. A pending ESC becomes [`Key::Escape`];
    /// incomplete sequences are dropped.
    pub fn flush(&mut self) -> Vec<Key> {
        let mut keys = Vec::new();
        if self.state == State::Escape {
            keys.push(Key::Escape);
        } else if self.state != State::Ground {
            trace!("Dropping incomplete sequence {:?}", self.params);
        }
        self.reset();
        keys
    }

    fn reset(&mut self) {
        self.state = State::Ground;
        self.params.clear();
        self.utf8_len = 0;
        self.utf8_expected = 0;
    }

    fn process_byte(&mut self, byte: u8, keys: &mut Vec<Key>) {
        match self.state {
            State::Ground => self.process_ground(byte, keys),
            State::Escape => self.process_escape(byte, keys),
            State::Csi => self.process_csi(byte, keys),
            State::Ss3 => self.process_ss3(byte, keys),
        }
    }

    fn process_ground(&mut self, byte: u8, keys: &mut Vec<Key>) {
        if self.utf8_len > 0 {
            self.process_utf8_continuation(byte, keys);
            return;
        }

        let key = match byte {
            0x1B => {
                self.state = State::Escape;
                return;
            }
            b'\r' | b'\n' => Key::Enter,
            b'\t' => Key::Tab,
            0x7F | 0x08 => Key::Backspace,
            0x01..=0x1A => Key::Ctrl((b'a' + byte - 1) as char),
            0x00 | 0x1C..=0x1F => return,
            0x20..=0x7E => Key::Char(byte as char),
            _ => {
                self.start_utf8(byte);
                return;
            }
        };
        keys.push(key);
    }

    fn process_escape(&mut self, byte: u8, keys: &mut Vec<Key>) {
        match byte {
            b'[' => {
                self.state = State::Csi;
                self.params.clear();
            }
            b'O' => self.state = State::Ss3,
            0x1B => keys.push(Key::Escape),
            _ => {
                keys.push(Key::Escape);
                self.state = State::Ground;
                self.process_ground(byte, keys);
            }
        }
    }

    fn process_csi(&mut self, byte: u8, keys: &mut Vec<Key>) {
        match byte {
            0x30..=0x3F => self.params.push(byte),
            0x40..=0x7E => {
                self.state = State::Ground;
                if let Some(key) = self.csi_key(byte) {
                    keys.push(key);
                } else {
                    trace!("Ignoring CSI {:?} {}", self.params, byte as char);
                }
                self.params.clear();
            }
            0x1B => {
                self.params.clear();
                self.state = State::Escape;
            }
            // Intermediates and stray controls
            _ => {}
        }
    }

    fn csi_key(&self, final_byte: u8) -> Option<Key> {
        match final_byte {
            b'A' => Some(Key::Up),
            b'B' => Some(Key::Down),
            b'C' => Some(Key::Right),
            b'D' => Some(Key::Left),
            b'H' => Some(Key::Home),
            b'F' => Some(Key::End),
            b'~' => {
                // First parameter selects the key; modifiers follow after ';'
                let first = self.params.split(|&b| b == b';').next().unwrap_or(&[]);
                match first {
                    b"1" | b"7" => Some(Key::Home),
                    b"3" => Some(Key::Delete),
                    b"4" | b"8" => Some(Key::End),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn process_ss3(&mut self, byte: u8, keys: &mut Vec<Key>) {
        self.state = State::Ground;
        let key = match byte {
            b'A' => Key::Up,
            b'B' => Key::Down,
            b'C' => Key::Right,
            b'D' => Key::Left,
            b'H' => Key::Home,
            b'F' => Key::End,
            _ => {
                trace!("Ignoring SS3 {}", byte as char);
                return;
            }
        };
        keys.push(key);
    }

    fn start_utf8(&mut self, byte: u8) {
        let expected = if byte & 0b1110_0000 == 0b1100_0000 {
            2
        } else if byte & 0b1111_0000 == 0b1110_0000 {
            3
        } else if byte & 0b1111_1000 == 0b1111_0000 {
            4
        } else {
            trace!("Ignoring invalid UTF-8 start byte {:#04x}", byte);
            return;
        };
        self.utf8_buffer[0] = byte;
        self.utf8_len = 1;
        self.utf8_expected = expected;
    }

    fn process_utf8_continuation(&mut self, byte: u8, keys: &mut Vec<Key>) {
        if byte & 0b1100_0000 != 0b1000_0000 {
            // Broken sequence; start over with this byte
            self.utf8_len = 0;
            self.utf8_expected = 0;
            self.process_ground(byte, keys);
            return;
        }

        self.utf8_buffer[self.utf8_len] = byte;
        self.utf8_len += 1;
        if self.utf8_len < self.utf8_expected {
            return;
        }

        let decoded = std::str::from_utf8(&self.utf8_buffer[..self.utf8_len])
            .ok()
            .and_then(|s| s.chars().next());
        self.utf8_len = 0;
        self.utf8_expected = 0;
        if let Some(c) = decoded {
            keys.push(Key::Char(c));
        }
    }
}

/// Decode a complete byte string, flushing any trailing ESC
pub fn decode_all(data: &[u8]) -> Vec<Key> {
    let mut decoder = KeyDecoder::new();
    let mut keys = decoder.feed(data);
    keys.extend(decoder.flush());
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plain_characters() {
        assert_eq!(
            decode_all(b"jk z"),
            vec![
                Key::Char('j'),
                Key::Char('k'),
                Key::Char(' '),
                Key::Char('z')
            ]
        );
    }

    #[test]
    fn test_controls() {
        assert_eq!(
            decode_all(b"\r\n\t\x7f\x08\x03"),
            vec![
                Key::Enter,
                Key::Enter,
                Key::Tab,
                Key::Backspace,
                Key::Backspace,
                Key::Ctrl('c')
            ]
        );
    }

    #[test]
    fn test_csi_arrows() {
        assert_eq!(
            decode_all(b"\x1b[A\x1b[B\x1b[C\x1b[D"),
            vec![Key::Up, Key::Down, Key::Right, Key::Left]
        );
    }

    #[test]
    fn test_ss3_arrows() {
        assert_eq!(decode_all(b"\x1bOA\x1bOD"), vec![Key::Up, Key::Left]);
    }

    #[test]
    fn test_tilde_keys() {
        assert_eq!(
            decode_all(b"\x1b[3~\x1b[1~\x1b[4~\x1b[3;5~"),
            vec![Key::Delete, Key::Home, Key::End, Key::Delete]
        );
    }

    #[test]
    fn test_modified_arrow() {
        assert_eq!(decode_all(b"\x1b[1;5C"), vec![Key::Right]);
    }

    #[test]
    fn test_split_sequence() {
        let mut decoder = KeyDecoder::new();
        assert!(decoder.feed(b"\x1b").is_empty());
        assert!(decoder.is_pending());
        assert!(decoder.feed(b"[").is_empty());
        assert_eq!(decoder.feed(b"C"), vec![Key::Right]);
        assert!(!decoder.is_pending());
    }

    #[test]
    fn test_lone_escape() {
        let mut decoder = KeyDecoder::new();
        assert!(decoder.feed(b"\x1b").is_empty());
        assert_eq!(decoder.flush(), vec![Key::Escape]);
        assert!(decoder.flush().is_empty());

        assert_eq!(decode_all(b"\x1bq"), vec![Key::Escape, Key::Char('q')]);
        assert_eq!(decode_all(b"\x1b\x1b"), vec![Key::Escape, Key::Escape]);
    }

    #[test]
    fn test_unknown_sequences_are_dropped() {
        assert_eq!(decode_all(b"\x1b[99zq"), vec![Key::Char('q')]);
        assert_eq!(decode_all(b"\x1bOZq"), vec![Key::Char('q')]);
        assert!(decode_all(b"\x1b[12").is_empty());
    }

    #[test]
    fn test_utf8() {
        assert_eq!(decode_all("é€".as_bytes()), vec![Key::Char('é'), Key::Char('€')]);

        let mut decoder = KeyDecoder::new();
        let bytes = "€".as_bytes();
        assert!(decoder.feed(&bytes[..1]).is_empty());
        assert!(decoder.feed(&bytes[1..2]).is_empty());
        assert_eq!(decoder.feed(&bytes[2..]), vec![Key::Char('€')]);
    }

    #[test]
    fn test_invalid_utf8_recovers() {
        assert_eq!(decode_all(&[0xC3, b'a']), vec![Key::Char('a')]);
        assert_eq!(decode_all(&[0xFF, b'b']), vec![Key::Char('b')]);
    }

    proptest! {
        #[test]
        fn prop_chunking_does_not_change_keys(
            data in proptest::collection::vec(any::<u8>(), 0..128),
            split in 0usize..128,
        ) {
            let split = split.min(data.len());
            let mut decoder = KeyDecoder::new();
            let mut keys = decoder.feed(&data[..split]);
            keys.extend(decoder.feed(&data[split..]));
            keys.extend(decoder.flush());
            prop_assert_eq!(keys, decode_all(&data));
        }
    }
}
