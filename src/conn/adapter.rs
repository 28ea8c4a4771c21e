use pin_project_lite::pin_project;
use std::{
    fmt,
    io::{self, Read, Write},
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

use super::NetConn;
use crate::{
    address::NetAddr,
    close::Close,
    deadline::{
        DeadlineExceeded, SetReadDeadline, SetWriteDeadline, has_elapsed, join_deadline_results,
    },
};

type DeadlineHook<W> = fn(&mut W, Option<Instant>) -> io::Result<()>;

/// Deadline capabilities of the writer, registered at construction time.
struct WriterDeadlineHooks<W> {
    read: Option<DeadlineHook<W>>,
    write: Option<DeadlineHook<W>>,
}

impl<W> WriterDeadlineHooks<W> {
    const fn new() -> Self {
        Self {
            read: None,
            write: None,
        }
    }
}

impl<W> fmt::Debug for WriterDeadlineHooks<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterDeadlineHooks")
            .field("read", &self.read.is_some())
            .field("write", &self.write.is_some())
            .finish()
    }
}

pin_project! {
    /// A [`NetConn`] composed of a reader, a writer and a closer,
    /// plus optional addresses and read/write deadlines.
    ///
    /// Reads and writes are refused with a [`DeadlineExceeded`] timeout error
    /// once their deadline passed, and are otherwise passed through unchanged.
    /// The deadline only gates calls into the reader or writer, a call that
    /// already started is never interrupted. For the async halves every poll
    /// is such a call: a read or write that is still pending when its deadline
    /// passes fails with a timeout the next time it is polled.
    ///
    /// [`Conn`] implements [`Read`] and [`Write`] for blocking halves, as well as
    /// [`AsyncRead`] and [`AsyncWrite`] for async halves.
    ///
    /// The connection does not track whether it was closed, using it after
    /// [`Close::close`] behaves as the wrapped capabilities do.
    pub struct Conn<R, W, C> {
        #[pin]
        reader: R,
        #[pin]
        writer: W,
        closer: C,
        local: Option<Box<dyn NetAddr>>,
        remote: Option<Box<dyn NetAddr>>,
        read_deadline: Option<Instant>,
        write_deadline: Option<Instant>,
        writer_hooks: WriterDeadlineHooks<W>,
    }
}

impl<R, W, C> Conn<R, W, C> {
    /// Create a new [`Conn`] from its reader, writer and closer.
    ///
    /// The connection starts without addresses or deadlines.
    pub const fn new(reader: R, writer: W, closer: C) -> Self {
        Self {
            reader,
            writer,
            closer,
            local: None,
            remote: None,
            read_deadline: None,
            write_deadline: None,
            writer_hooks: WriterDeadlineHooks::new(),
        }
    }

    /// Attach the local address of this [`Conn`].
    #[must_use]
    pub fn with_local_addr(mut self, addr: impl NetAddr) -> Self {
        self.local = Some(Box::new(addr));
        self
    }

    /// Attach the local address of this [`Conn`].
    pub fn set_local_addr(&mut self, addr: impl NetAddr) -> &mut Self {
        self.local = Some(Box::new(addr));
        self
    }

    /// Attach the remote address of this [`Conn`].
    #[must_use]
    pub fn with_remote_addr(mut self, addr: impl NetAddr) -> Self {
        self.remote = Some(Box::new(addr));
        self
    }

    /// Attach the remote address of this [`Conn`].
    pub fn set_remote_addr(&mut self, addr: impl NetAddr) -> &mut Self {
        self.remote = Some(Box::new(addr));
        self
    }

    /// Start with the given read deadline.
    ///
    /// Unlike [`Conn::set_read_deadline`] this is never forwarded to the writer.
    #[must_use]
    pub fn with_read_deadline(mut self, deadline: Instant) -> Self {
        self.read_deadline = Some(deadline);
        self
    }

    /// Start with the given write deadline.
    ///
    /// Unlike [`Conn::set_write_deadline`] this is never forwarded to the writer.
    #[must_use]
    pub fn with_write_deadline(mut self, deadline: Instant) -> Self {
        self.write_deadline = Some(deadline);
        self
    }

    /// Local address, if any was attached.
    pub fn local_addr(&self) -> Option<&dyn NetAddr> {
        self.local.as_deref()
    }

    /// Remote address, if any was attached.
    pub fn remote_addr(&self) -> Option<&dyn NetAddr> {
        self.remote.as_deref()
    }

    /// Current read deadline.
    pub fn read_deadline(&self) -> Option<Instant> {
        self.read_deadline
    }

    /// Current write deadline.
    pub fn write_deadline(&self) -> Option<Instant> {
        self.write_deadline
    }

    /// Set the read deadline, `None` clears it.
    ///
    /// If the writer was registered as read deadline capable
    /// (see [`Conn::with_writer_read_deadline`]) the deadline is forwarded
    /// to it and its result returned. The deadline is stored regardless.
    pub fn set_read_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()> {
        self.read_deadline = deadline;
        match self.writer_hooks.read {
            Some(hook) => {
                tracing::trace!(?deadline, "conn: forward read deadline to writer");
                hook(&mut self.writer, deadline)
            }
            None => Ok(()),
        }
    }

    /// Set the write deadline, `None` clears it.
    ///
    /// If the writer was registered as write deadline capable
    /// (see [`Conn::with_writer_write_deadline`]) the deadline is forwarded
    /// to it and its result returned. The deadline is stored regardless.
    pub fn set_write_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()> {
        self.write_deadline = deadline;
        match self.writer_hooks.write {
            Some(hook) => {
                tracing::trace!(?deadline, "conn: forward write deadline to writer");
                hook(&mut self.writer, deadline)
            }
            None => Ok(()),
        }
    }

    /// Set both the read and write deadline.
    ///
    /// Both deadlines are always set. If both halves fail
    /// the error of the read half is returned.
    pub fn set_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()> {
        let read = self.set_read_deadline(deadline);
        let write = self.set_write_deadline(deadline);
        join_deadline_results(read, write)
    }

    /// Gets a reference to the reader.
    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Gets a mutable reference to the reader.
    pub fn reader_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Gets a reference to the writer.
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Gets a mutable reference to the writer.
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Gets a reference to the closer.
    pub fn closer(&self) -> &C {
        &self.closer
    }

    /// Gets a mutable reference to the closer.
    pub fn closer_mut(&mut self) -> &mut C {
        &mut self.closer
    }

    /// Consumes the [`Conn`], returning its reader, writer and closer.
    pub fn into_parts(self) -> (R, W, C) {
        (self.reader, self.writer, self.closer)
    }
}

impl<R, W: SetReadDeadline, C> Conn<R, W, C> {
    /// Forward read deadlines to the writer,
    /// e.g. when it is a socket which also does the reading.
    #[must_use]
    pub fn with_writer_read_deadline(mut self) -> Self {
        self.writer_hooks.read = Some(<W as SetReadDeadline>::set_read_deadline);
        self
    }
}

impl<R, W: SetWriteDeadline, C> Conn<R, W, C> {
    /// Forward write deadlines to the writer.
    #[must_use]
    pub fn with_writer_write_deadline(mut self) -> Self {
        self.writer_hooks.write = Some(<W as SetWriteDeadline>::set_write_deadline);
        self
    }
}

impl<R, W: SetReadDeadline + SetWriteDeadline, C> Conn<R, W, C> {
    /// Forward both read and write deadlines to the writer.
    #[must_use]
    pub fn with_writer_deadlines(self) -> Self {
        self.with_writer_read_deadline()
            .with_writer_write_deadline()
    }
}

impl<R, W, C: Close> Conn<R, W, C> {
    /// Close the connection using its closer.
    pub fn close(&mut self) -> io::Result<()> {
        self.closer.close()
    }
}

impl<R: fmt::Debug, W: fmt::Debug, C: fmt::Debug> fmt::Debug for Conn<R, W, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conn")
            .field("reader", &self.reader)
            .field("writer", &self.writer)
            .field("closer", &self.closer)
            .field("local", &self.local)
            .field("remote", &self.remote)
            .field("read_deadline", &self.read_deadline)
            .field("write_deadline", &self.write_deadline)
            .field("writer_hooks", &self.writer_hooks)
            .finish()
    }
}

fn check_deadline(deadline: Option<Instant>, direction: &'static str) -> io::Result<()> {
    if has_elapsed(deadline, Instant::now()) {
        tracing::trace!(?deadline, direction, "conn: deadline exceeded");
        return Err(DeadlineExceeded::new().into());
    }
    Ok(())
}

impl<R: Read, W, C> Read for Conn<R, W, C> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        check_deadline(self.read_deadline, "read")?;
        self.reader.read(buf)
    }

    fn read_vectored(&mut self, bufs: &mut [io::IoSliceMut<'_>]) -> io::Result<usize> {
        check_deadline(self.read_deadline, "read")?;
        self.reader.read_vectored(bufs)
    }
}

impl<R, W: Write, C> Write for Conn<R, W, C> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        check_deadline(self.write_deadline, "write")?;
        self.writer.write(buf)
    }

    fn write_vectored(&mut self, bufs: &[io::IoSlice<'_>]) -> io::Result<usize> {
        check_deadline(self.write_deadline, "write")?;
        self.writer.write_vectored(bufs)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl<R, W, C> SetReadDeadline for Conn<R, W, C> {
    #[inline]
    fn set_read_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()> {
        Self::set_read_deadline(self, deadline)
    }
}

impl<R, W, C> SetWriteDeadline for Conn<R, W, C> {
    #[inline]
    fn set_write_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()> {
        Self::set_write_deadline(self, deadline)
    }
}

impl<R, W, C: Close> Close for Conn<R, W, C> {
    #[inline]
    fn close(&mut self) -> io::Result<()> {
        Self::close(self)
    }
}

impl<R: Read, W: Write, C: Close> NetConn for Conn<R, W, C> {
    #[inline]
    fn local_addr(&self) -> Option<&dyn NetAddr> {
        Self::local_addr(self)
    }

    #[inline]
    fn remote_addr(&self) -> Option<&dyn NetAddr> {
        Self::remote_addr(self)
    }
}

impl<R: AsyncRead, W, C> AsyncRead for Conn<R, W, C> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.project();
        if let Err(err) = check_deadline(*this.read_deadline, "read") {
            return Poll::Ready(Err(err));
        }
        this.reader.poll_read(cx, buf)
    }
}

impl<R, W: AsyncWrite, C> AsyncWrite for Conn<R, W, C> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.project();
        if let Err(err) = check_deadline(*this.write_deadline, "write") {
            return Poll::Ready(Err(err));
        }
        this.writer.poll_write(cx, buf)
    }

    fn poll_write_vectored(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        bufs: &[io::IoSlice<'_>],
    ) -> Poll<io::Result<usize>> {
        let this = self.project();
        if let Err(err) = check_deadline(*this.write_deadline, "write") {
            return Poll::Ready(Err(err));
        }
        this.writer.poll_write_vectored(cx, bufs)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.project().writer.poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.project().writer.poll_shutdown(cx)
    }

    fn is_write_vectored(&self) -> bool {
        self.writer.is_write_vectored()
    }
}
