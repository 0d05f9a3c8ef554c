//! Bit-level I/O over byte streams.
//!
//! Bits are packed most-significant first. A stream ends with one trailer
//! byte giving the number of valid bits (1..=8) in the last data byte, or 0
//! when no data byte was written. The reader looks two bytes ahead so it can
//! tell the last data byte apart and never hands out pad bits. Streams that
//! are only zero-padded, with no trailer, are not readable.

use std::collections::VecDeque;
use std::io::{self, BufReader, BufWriter, Read, Write};

pub struct BitWriter<W: Write> {
    inner: Option<BufWriter<W>>,
    current: u8,
    filled: u8,
    bytes_written: u64,
    bit_count: u64,
    closed: bool,
}

impl<W: Write> BitWriter<W> {
    pub fn new(sink: W) -> Self {
        BitWriter {
            inner: Some(BufWriter::new(sink)),
            current: 0,
            filled: 0,
            bytes_written: 0,
            bit_count: 0,
            closed: false,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        if bit {
            self.current |= 1 << (7 - self.filled);
        }
        self.filled += 1;
        self.bit_count += 1;

        if self.filled == 8 {
            let byte = self.current;
            self.current = 0;
            self.filled = 0;
            self.sink()?.write_all(&[byte])?;
            self.bytes_written += 1;
        }
        Ok(())
    }

    pub fn write_bits(&mut self, bits: &[bool]) -> io::Result<()> {
        for &bit in bits {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Number of logical bits written so far, pad bits excluded.
    pub fn bit_count(&self) -> u64 {
        self.bit_count
    }

    /// Flushes the padded last byte and the trailer, then hands back the sink.
    pub fn finish(mut self) -> io::Result<W> {
        self.close()?;
        let inner = self.inner.take().ok_or_else(closed_error)?;
        inner.into_inner().map_err(|e| e.into_error())
    }

    fn sink(&mut self) -> io::Result<&mut BufWriter<W>> {
        self.inner.as_mut().ok_or_else(closed_error)
    }

    fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let last_valid = if self.filled > 0 {
            let byte = self.current;
            self.sink()?.write_all(&[byte])?;
            self.bytes_written += 1;
            self.filled
        } else if self.bytes_written > 0 {
            8
        } else {
            0
        };
        let sink = self.sink()?;
        sink.write_all(&[last_valid])?;
        sink.flush()
    }
}

impl<W: Write> Drop for BitWriter<W> {
    fn drop(&mut self) {
        if !self.closed && self.inner.is_some() {
            if let Err(e) = self.close() {
                log::warn!("failed to flush bit writer on drop: {e}");
            }
        }
    }
}

fn closed_error() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "bit writer already closed")
}

pub struct BitReader<R: Read> {
    inner: BufReader<R>,
    ahead: VecDeque<u8>,
    eof: bool,
    current: u8,
    remaining: u8,
    loaded_data: bool,
    bits_read: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(source: R) -> Self {
        BitReader {
            inner: BufReader::new(source),
            ahead: VecDeque::with_capacity(2),
            eof: false,
            current: 0,
            remaining: 0,
            loaded_data: false,
            bits_read: 0,
        }
    }

    /// True while unread data bits remain.
    pub fn has_next(&mut self) -> io::Result<bool> {
        if self.remaining > 0 {
            return Ok(true);
        }
        self.fill()?;
        // only the trailer, or nothing, is left
        if self.ahead.len() < 2 {
            // a stream without data bytes is exactly [0]
            if !self.loaded_data && self.ahead.front().is_some_and(|&b| b != 0) {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("lone trailer byte {} with no data", self.ahead[0]),
                ));
            }
            return Ok(false);
        }
        let Some(byte) = self.ahead.pop_front() else {
            return Ok(false);
        };
        self.fill()?;
        let valid = if self.ahead.len() == 1 { self.ahead[0] } else { 8 };
        if valid == 0 || valid > 8 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid trailer byte {valid}"),
            ));
        }
        self.current = byte;
        self.remaining = valid;
        self.loaded_data = true;
        Ok(true)
    }

    pub fn read_bit(&mut self) -> io::Result<bool> {
        if !self.has_next()? {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no bits left in stream",
            ));
        }
        let bit = self.current & 0x80 != 0;
        self.current <<= 1;
        self.remaining -= 1;
        self.bits_read += 1;
        Ok(bit)
    }

    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    fn fill(&mut self) -> io::Result<()> {
        while self.ahead.len() < 2 {
            match self.next_byte()? {
                Some(byte) => self.ahead.push_back(byte),
                None => break,
            }
        }
        Ok(())
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if self.eof {
            return Ok(None);
        }
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(None);
                }
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}
