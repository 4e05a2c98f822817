//! A position-tracked byte sink with PDF-specific formatted emitters.
//!
//! Wraps any [`std::io::Write`] (the Rust equivalent of the C original's
//! `write_out(data, offset, len, cookie)` platform callback) and tracks
//! cumulative position itself, since `Write` does not report it.

use std::io::{self, Write};

use tracing::warn;

/// A byte sink that tracks how many bytes it has emitted.
pub struct OutStream<W: Write> {
    sink: W,
    position: u64,
}

impl<W: Write> OutStream<W> {
    pub fn new(sink: W) -> Self {
        OutStream { sink, position: 0 }
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.sink.write_all(buf).inspect_err(|e| {
            warn!(bytes = buf.len(), error = %e, "short or failed write to output stream");
        })?;
        self.position += buf.len() as u64;
        Ok(())
    }

    /// A `std::io::Write` facade over this stream, for callers (stream
    /// producers) that need a generic sink rather than the `put_*` API.
    pub fn as_write(&mut self) -> OutStreamWriter<'_, W> {
        OutStreamWriter { out: self }
    }

    /// Emits one octet, including NUL.
    pub fn put_byte(&mut self, b: u8) -> io::Result<()> {
        self.write_all(&[b])
    }

    /// Emits a NUL-terminated string's bytes, not including the NUL.
    pub fn put_cstr(&mut self, s: &str) -> io::Result<()> {
        self.write_all(s.as_bytes())
    }

    /// Emits `len` bytes from `buf` starting at `offset`.
    pub fn put_n(&mut self, buf: &[u8], offset: usize, len: usize) -> io::Result<()> {
        self.write_all(&buf[offset..offset + len])
    }

    /// Emits a signed decimal integer; `i32::MIN` round-trips correctly.
    pub fn put_int(&mut self, value: i32) -> io::Result<()> {
        self.write_all(value.to_string().as_bytes())
    }

    /// Emits two uppercase hex digits.
    pub fn put_hex(&mut self, byte: u8) -> io::Result<()> {
        self.write_all(format!("{byte:02X}").as_bytes())
    }

    /// Emits a normalized decimal PDF real: no scientific notation, at most
    /// 10 fractional digits, round-half-away-from-zero at the 10th
    /// fractional digit, trailing zeros stripped (but at least one digit
    /// kept after `.` for non-integral values). Integral values emit as
    /// plain integers. `inf`/`-inf`/`nan` for non-finite values.
    pub fn put_float(&mut self, value: f64) -> io::Result<()> {
        self.write_all(format_real(value).as_bytes())
    }
}

/// A `std::io::Write` adapter over an [`OutStream`], returned by [`OutStream::as_write`].
pub struct OutStreamWriter<'a, W: Write> {
    out: &'a mut OutStream<W>,
}

impl<'a, W: Write> Write for OutStreamWriter<'a, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.sink.flush()
    }
}

/// Formats `value` per the PDF real-number rules (see [`OutStream::put_float`]).
pub fn format_real(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let neg = value.is_sign_negative();
    let ax = value.abs();

    if ax.fract() == 0.0 {
        // Exactly integral (also true for any magnitude beyond the f64
        // mantissa's ability to represent fractions).
        let digits = format!("{ax:.0}");
        return if neg { format!("-{digits}") } else { digits };
    }

    // Ten significant decimal digits, counted from the first nonzero one
    // (not a flat ten fractional digits: a number with nine integer digits
    // only gets one fractional digit of budget, and a tiny magnitude needs
    // as many leading zeros as it takes to reach its first nonzero digit).
    // Rendering through a wide fixed-precision format first, then cutting at
    // the digit budget by hand, keeps this decimal-exact instead of losing
    // bits to a single `* 1e10` float multiply.
    const EXTRA_PRECISION: usize = 360;
    let rendered = format!("{ax:.EXTRA_PRECISION$}");
    let (int_part, frac_part) = rendered.split_once('.').expect("fixed-precision format always has a point");
    let int_len = int_part.len();
    let mut digits: Vec<u8> = int_part.bytes().chain(frac_part.bytes()).map(|b| b - b'0').collect();

    // Never keep fewer than the whole integer part: a magnitude with more
    // than ten integer digits keeps them all and only rounds at the units
    // place.
    let first_sig = digits.iter().position(|&d| d != 0).unwrap_or(0);
    let keep_end = (first_sig + 10).max(int_len).min(digits.len());

    let round_up = digits.get(keep_end).is_some_and(|&d| d >= 5);
    digits.truncate(keep_end);

    let mut int_len = int_len;
    if round_up {
        let mut i = digits.len();
        let mut carry = true;
        while carry && i > 0 {
            i -= 1;
            digits[i] += 1;
            if digits[i] == 10 {
                digits[i] = 0;
            } else {
                carry = false;
            }
        }
        if carry {
            digits.insert(0, 1);
            int_len += 1;
        }
    }

    let mut frac_len = digits.len() - int_len;
    while frac_len > 1 && digits[int_len + frac_len - 1] == 0 {
        frac_len -= 1;
    }

    let to_str = |ds: &[u8]| -> String { ds.iter().map(|&d| (d + b'0') as char).collect() };
    let int_str = to_str(&digits[..int_len]);
    let body = if frac_len == 0 {
        int_str
    } else {
        format!("{int_str}.{}", to_str(&digits[int_len..int_len + frac_len]))
    };
    if neg { format!("-{body}") } else { body }
}
