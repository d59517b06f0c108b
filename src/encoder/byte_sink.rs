//! Bounded write buffer in front of the output stream.
//!
//! Encoders append big-endian fields with [ByteSink::push_be_uint] and [ByteSink::push_bytes],
//! and retrofit length fields with [ByteSink::backpatch] once the enclosed content is known.
//! Offsets handed out by the sink are positions in the output stream, so they stay valid when
//! the front of the buffer is flushed.
//!
//! A record under construction is bracketed by [ByteSink::begin_record] and
//! [ByteSink::end_record]. Flushes only write out bytes of completed records, which keeps the
//! length fields of the open record in the buffer until they have been patched.
use crate::error::MrtGenError;
use crate::log_category;
use crate::logging::LogContext;
use bytes::{Buf, BufMut, BytesMut};
use std::io::{ErrorKind, Write};

/// Size of the write buffer.
pub const DEFAULT_CAPACITY: usize = 256 * 1024;

/// Result of a single flush attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// No completed bytes are left in the buffer.
    Drained,
    /// Bytes are still pending; the caller may retry later.
    Pending,
}

pub struct ByteSink<W: Write> {
    buf: BytesMut,
    capacity: usize,
    writer: W,
    /// Stream position of the first buffered byte.
    base: usize,
    /// Buffer index where the open record starts.
    record_start: Option<usize>,
    /// Set once the downstream reader went away.
    closed: bool,
    log_ctx: LogContext,
}

impl<W: Write> ByteSink<W> {
    pub fn new(writer: W, log_ctx: LogContext) -> Self {
        Self::with_capacity(writer, DEFAULT_CAPACITY, log_ctx)
    }

    pub fn with_capacity(writer: W, capacity: usize, log_ctx: LogContext) -> Self {
        ByteSink {
            buf: BytesMut::with_capacity(capacity),
            capacity,
            writer,
            base: 0,
            record_start: None,
            closed: false,
            log_ctx,
        }
    }

    /// Number of bytes waiting to be written.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Stream position the next pushed byte will land at.
    pub fn position(&self) -> usize {
        self.base + self.buf.len()
    }

    /// Bytes waiting to be written.
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    /// Whether the buffer has crossed 90% of its capacity.
    pub fn needs_flush(&self) -> bool {
        self.buf.len() >= self.capacity * 9 / 10
    }

    /// Log switches the sink was created with.
    pub fn log_ctx(&self) -> LogContext {
        self.log_ctx
    }

    /// Whether a broken pipe has been seen on the output.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Unwraps the output stream, dropping whatever is still buffered.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Appends the low `length` bytes of `value`, most significant byte first.
    pub fn push_be_uint(&mut self, length: usize, value: u64) -> Result<(), MrtGenError> {
        if !(1..=8).contains(&length) {
            return Err(MrtGenError::InvalidFieldWidth(length));
        }
        self.reserve(length)?;
        self.buf.put_uint(value, length);
        Ok(())
    }

    #[inline]
    pub fn push_u8(&mut self, value: u8) -> Result<(), MrtGenError> {
        self.push_be_uint(1, value as u64)
    }

    #[inline]
    pub fn push_u16(&mut self, value: u16) -> Result<(), MrtGenError> {
        self.push_be_uint(2, value as u64)
    }

    #[inline]
    pub fn push_u32(&mut self, value: u32) -> Result<(), MrtGenError> {
        self.push_be_uint(4, value as u64)
    }

    /// Appends raw bytes.
    pub fn push_bytes(&mut self, data: &[u8]) -> Result<(), MrtGenError> {
        self.reserve(data.len())?;
        self.buf.put_slice(data);
        Ok(())
    }

    /// Overwrites `length` bytes at stream position `offset` with the big-endian encoding of
    /// `value`. The write position does not move.
    pub fn backpatch(&mut self, offset: usize, length: usize, value: u64) -> Result<(), MrtGenError> {
        if !(1..=8).contains(&length) {
            return Err(MrtGenError::InvalidFieldWidth(length));
        }
        let start = offset
            .checked_sub(self.base)
            .ok_or(MrtGenError::InvalidBackpatch { offset })?;
        let end = start + length;
        if end > self.buf.len() {
            return Err(MrtGenError::InvalidBackpatch { offset });
        }
        let bytes = value.to_be_bytes();
        self.buf[start..end].copy_from_slice(&bytes[8 - length..]);
        Ok(())
    }

    /// Marks the start of a record and returns its stream position.
    pub fn begin_record(&mut self) -> usize {
        self.record_start = Some(self.buf.len());
        self.position()
    }

    /// Marks the open record as complete and eligible for flushing.
    pub fn end_record(&mut self) {
        self.record_start = None;
    }

    /// Drops everything pushed since [ByteSink::begin_record].
    pub fn abort_record(&mut self) {
        if let Some(start) = self.record_start.take() {
            log_category!(
                self.log_ctx,
                Io,
                debug,
                "dropping {} bytes of unfinished record",
                self.buf.len() - start
            );
            self.buf.truncate(start);
        }
    }

    /// Attempts a single write of all completed bytes.
    pub fn flush(&mut self) -> FlushOutcome {
        let committed = self.record_start.unwrap_or(self.buf.len());
        if committed == 0 {
            return match self.buf.is_empty() {
                true => FlushOutcome::Drained,
                false => FlushOutcome::Pending,
            };
        }

        if self.closed {
            self.consume(committed);
            return FlushOutcome::Drained;
        }

        match self.writer.write(&self.buf[..committed]) {
            Ok(0) => {
                log_category!(self.log_ctx, Io, debug, "output accepted no bytes");
                FlushOutcome::Pending
            }
            Ok(written) => {
                self.consume(written);
                log_category!(
                    self.log_ctx,
                    Io,
                    debug,
                    "flushed {} bytes, {} pending",
                    written,
                    self.buf.len()
                );
                match written < committed {
                    true => FlushOutcome::Pending,
                    false => FlushOutcome::Drained,
                }
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::Interrupted => {
                log_category!(
                    self.log_ctx,
                    Io,
                    trace,
                    "write blocked, {} bytes pending",
                    committed
                );
                FlushOutcome::Pending
            }
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                log_category!(
                    self.log_ctx,
                    Io,
                    info,
                    "output closed, discarding {} bytes",
                    committed
                );
                self.closed = true;
                self.consume(committed);
                FlushOutcome::Drained
            }
            Err(e) => {
                log_category!(self.log_ctx, Error, error, "write failed: {}", e);
                FlushOutcome::Pending
            }
        }
    }

    /// Flushes before a field of `len` bytes if the buffer is near capacity, then checks the
    /// field fits.
    fn reserve(&mut self, len: usize) -> Result<(), MrtGenError> {
        if self.needs_flush() || self.buf.len() + len > self.capacity {
            self.flush();
        }
        let available = self.capacity.saturating_sub(self.buf.len());
        if len > available {
            log_category!(
                self.log_ctx,
                Error,
                error,
                "write buffer overflow, {} bytes needed, {} available",
                len,
                available
            );
            return Err(MrtGenError::BufferOverflow {
                needed: len,
                available,
            });
        }
        Ok(())
    }

    /// Drops `n` bytes from the front of the buffer and rebases the open record.
    fn consume(&mut self, n: usize) {
        self.buf.advance(n);
        self.base += n;
        if let Some(start) = self.record_start.as_mut() {
            *start -= n;
        }
    }
}
