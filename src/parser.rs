//! Line protocol of the keyboard link.
//!
//! A USB-host co-processor forwards boot-protocol keyboard reports over
//! UART, one text line per report:
//! - Report (K prefix): `K<16 hex digits>*<crc8>\n`
//! - Detach (D prefix): `D*<crc8>\n`
//!
//! The 16 hex digits are the 8 report bytes in wire order (modifiers,
//! reserved, 6 key slots). The checksum is CRC-8/SMBUS of the bytes between
//! the prefix and `*`, as 2 hex digits.

use crc::{Crc, CRC_8_SMBUS};
use heapless::Vec;

use crate::tracker::{KeyboardReport, REPORT_LEN};

/// Maximum line length for the protocol (including newline).
pub const MAX_LINE_LENGTH: usize = 32;

/// Report line without line ending: K + 16 hex + * + 2 hex.
const REPORT_LINE_LEN: usize = 20;

/// Detach line without line ending: D*XX.
const DETACH_LINE_LEN: usize = 4;

const CRC8: Crc<u8> = Crc::<u8>::new(&CRC_8_SMBUS);

/// CRC-8/SMBUS checksum of a line payload.
#[inline]
#[must_use]
pub fn calculate_crc8(data: &[u8]) -> u8 {
    CRC8.checksum(data)
}

/// Why a line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Invalid format.
    Parse,
    /// Checksum mismatch.
    Checksum,
}

/// A decoded link line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use]
pub enum LinkMessage {
    /// Current keyboard state.
    Report(KeyboardReport),
    /// The keyboard was unplugged.
    Detached,
}

/// Parse one link line. A trailing CR and/or LF is ignored.
///
/// # Example
///
/// ```
/// use keyboard_to_gamepad::parser::{parse_line, LinkMessage};
///
/// assert_eq!(parse_line(b"D*00\n"), Ok(LinkMessage::Detached));
/// ```
pub fn parse_line(line: &[u8]) -> Result<LinkMessage, LinkError> {
    let line = strip_line_ending(line);

    match line.first() {
        Some(b'K') => parse_report(line).map(LinkMessage::Report),
        Some(b'D') => {
            if line.len() != DETACH_LINE_LEN {
                return Err(LinkError::Parse);
            }
            extract_verified_payload(line)?;
            Ok(LinkMessage::Detached)
        }
        _ => Err(LinkError::Parse),
    }
}

fn parse_report(line: &[u8]) -> Result<KeyboardReport, LinkError> {
    if line.len() != REPORT_LINE_LEN {
        return Err(LinkError::Parse);
    }
    let payload = extract_verified_payload(line)?;

    let mut bytes = [0u8; REPORT_LEN];
    for (byte, pair) in bytes.iter_mut().zip(payload.chunks_exact(2)) {
        *byte = parse_hex_u8(pair)?;
    }
    Ok(KeyboardReport::from_bytes(bytes))
}

/// Encode a message as a complete link line, newline included.
///
/// Used by host-side tools and tests to produce lines the parser accepts.
pub fn encode_line(message: &LinkMessage) -> Vec<u8, MAX_LINE_LENGTH> {
    let mut line: Vec<u8, MAX_LINE_LENGTH> = Vec::new();
    let mut payload: Vec<u8, { 2 * REPORT_LEN }> = Vec::new();

    let prefix = match message {
        LinkMessage::Report(report) => {
            for byte in report.to_bytes() {
                let [hi, lo] = hex_pair(byte);
                // Capacity is exactly 2 * REPORT_LEN.
                let _ = payload.push(hi);
                let _ = payload.push(lo);
            }
            b'K'
        }
        LinkMessage::Detached => b'D',
    };

    // The longest line (REPORT_LINE_LEN + 1) fits MAX_LINE_LENGTH.
    let _ = line.push(prefix);
    let _ = line.extend_from_slice(&payload);
    let _ = line.push(b'*');
    let _ = line.extend_from_slice(&hex_pair(calculate_crc8(&payload)));
    let _ = line.push(b'\n');
    line
}

/// Strip trailing CR and/or LF from a line.
#[inline]
fn strip_line_ending(line: &[u8]) -> &[u8] {
    let mut end = line.len();
    if end > 0 && line[end - 1] == b'\n' {
        end -= 1;
    }
    if end > 0 && line[end - 1] == b'\r' {
        end -= 1;
    }
    &line[..end]
}

/// Verify the checksum after `*`, returning the payload slice.
///
/// The input line should have line endings already stripped.
#[inline]
fn extract_verified_payload(line: &[u8]) -> Result<&[u8], LinkError> {
    let checksum_pos = line
        .iter()
        .rposition(|&b| b == b'*')
        .ok_or(LinkError::Parse)?;

    if checksum_pos + 3 != line.len() {
        return Err(LinkError::Parse);
    }

    let payload = &line[1..checksum_pos];
    let received = parse_hex_u8(&line[checksum_pos + 1..])?;

    if calculate_crc8(payload) != received {
        return Err(LinkError::Checksum);
    }

    Ok(payload)
}

/// Parse a 2-character hex string as u8.
#[inline]
fn parse_hex_u8(s: &[u8]) -> Result<u8, LinkError> {
    if s.len() != 2 {
        return Err(LinkError::Parse);
    }
    let high = hex_digit(s[0])?;
    let low = hex_digit(s[1])?;
    Ok((high << 4) | low)
}

/// Convert a hex character to its value.
#[inline]
fn hex_digit(b: u8) -> Result<u8, LinkError> {
    match b {
        b'0'..=b'9' => Ok(b - b'0'),
        b'A'..=b'F' => Ok(b - b'A' + 10),
        b'a'..=b'f' => Ok(b - b'a' + 10),
        _ => Err(LinkError::Parse),
    }
}

#[inline]
fn hex_pair(byte: u8) -> [u8; 2] {
    const DIGITS: &[u8; 16] = b"0123456789ABCDEF";
    [DIGITS[usize::from(byte >> 4)], DIGITS[usize::from(byte & 0x0F)]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keycode::KeyModifiers;

    fn report(modifiers: KeyModifiers, keys: [u8; 6]) -> KeyboardReport {
        KeyboardReport {
            modifiers,
            reserved: 0,
            keys,
        }
    }

    #[test]
    fn test_crc8_empty() {
        assert_eq!(calculate_crc8(&[]), 0x00);
    }

    #[test]
    fn test_parse_detach() {
        assert_eq!(parse_line(b"D*00\n"), Ok(LinkMessage::Detached));
        assert_eq!(parse_line(b"D*00\r\n"), Ok(LinkMessage::Detached));
    }

    #[test]
    fn test_parse_report() {
        let expected = report(KeyModifiers::LEFT_SHIFT, [0x04, 0x2C, 0, 0, 0, 0]);
        let line = encode_line(&LinkMessage::Report(expected));
        assert_eq!(&line[..17], b"K0200042C00000000");
        assert_eq!(parse_line(&line), Ok(LinkMessage::Report(expected)));
    }

    #[test]
    fn test_parse_lowercase_hex() {
        let expected = report(KeyModifiers::empty(), [0x2C, 0, 0, 0, 0, 0]);
        let payload = b"00002c0000000000";
        let mut line: Vec<u8, MAX_LINE_LENGTH> = Vec::new();
        line.push(b'K').unwrap();
        line.extend_from_slice(payload).unwrap();
        line.push(b'*').unwrap();
        line.extend_from_slice(&hex_pair(calculate_crc8(payload))).unwrap();
        assert_eq!(parse_line(&line), Ok(LinkMessage::Report(expected)));
    }

    #[test]
    fn test_checksum_mismatch() {
        let line = encode_line(&LinkMessage::Report(report(
            KeyModifiers::empty(),
            [0x04, 0, 0, 0, 0, 0],
        )));
        let mut bad: Vec<u8, MAX_LINE_LENGTH> = line.clone();
        bad[3] = b'5';
        assert_eq!(parse_line(&bad), Err(LinkError::Checksum));
    }

    #[test]
    fn test_invalid_prefix() {
        assert_eq!(parse_line(b"X*00\n"), Err(LinkError::Parse));
        assert_eq!(parse_line(b""), Err(LinkError::Parse));
        assert_eq!(parse_line(b"\n"), Err(LinkError::Parse));
    }

    #[test]
    fn test_wrong_lengths_rejected() {
        assert_eq!(parse_line(b"D1*00\n"), Err(LinkError::Parse));
        assert_eq!(parse_line(b"K0000*00\n"), Err(LinkError::Parse));
        assert_eq!(parse_line(b"D*0\n"), Err(LinkError::Parse));
    }

    #[test]
    fn test_bad_hex_digit() {
        assert_eq!(parse_line(b"D*0G\n"), Err(LinkError::Parse));
    }

    #[test]
    fn test_encoded_lines_fit_max_length() {
        let line = encode_line(&LinkMessage::Report(report(
            KeyModifiers::all(),
            [0xFF; 6],
        )));
        assert_eq!(line.len(), REPORT_LINE_LEN + 1);
        assert!(line.len() <= MAX_LINE_LENGTH);
        assert_eq!(encode_line(&LinkMessage::Detached).as_slice(), b"D*00\n");
    }
}
