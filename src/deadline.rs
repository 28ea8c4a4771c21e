//! Deadline capabilities and the timeout error produced once a deadline passed.
//!
//! A deadline is an absolute [`Instant`], `None` meaning no deadline is set.
//! Deadlines only gate the start of an operation: an operation which
//! was already started is never interrupted.

use std::{error, fmt, io, time::Instant};

/// Capability to set the deadline for future read calls.
pub trait SetReadDeadline {
    /// Set the read deadline, `None` clears it.
    fn set_read_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()>;
}

/// Capability to set the deadline for future write calls.
pub trait SetWriteDeadline {
    /// Set the write deadline, `None` clears it.
    fn set_write_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()>;
}

impl<T: SetReadDeadline + ?Sized> SetReadDeadline for &mut T {
    #[inline]
    fn set_read_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()> {
        (**self).set_read_deadline(deadline)
    }
}

impl<T: SetWriteDeadline + ?Sized> SetWriteDeadline for &mut T {
    #[inline]
    fn set_write_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()> {
        (**self).set_write_deadline(deadline)
    }
}

impl<T: SetReadDeadline + ?Sized> SetReadDeadline for Box<T> {
    #[inline]
    fn set_read_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()> {
        (**self).set_read_deadline(deadline)
    }
}

impl<T: SetWriteDeadline + ?Sized> SetWriteDeadline for Box<T> {
    #[inline]
    fn set_write_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()> {
        (**self).set_write_deadline(deadline)
    }
}

/// An operation was attempted after its deadline.
///
/// Surfaces as an [`io::Error`] of kind [`io::ErrorKind::TimedOut`],
/// use [`is_timeout`] to detect it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct DeadlineExceeded;

impl DeadlineExceeded {
    /// Create a new [`DeadlineExceeded`] error.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl fmt::Display for DeadlineExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("timeout occurred")
    }
}

impl error::Error for DeadlineExceeded {}

impl From<DeadlineExceeded> for io::Error {
    fn from(value: DeadlineExceeded) -> Self {
        Self::new(io::ErrorKind::TimedOut, value)
    }
}

/// Check if the error is caused by an elapsed deadline.
///
/// Other [`io::ErrorKind::TimedOut`] errors, e.g. those
/// of the wrapped reader or writer, are not matched.
#[must_use]
pub fn is_timeout(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::TimedOut
        && err
            .get_ref()
            .is_some_and(|inner| inner.is::<DeadlineExceeded>())
}

/// Returns `true` if `now` is strictly after the (optional) deadline.
#[must_use]
pub fn has_elapsed(deadline: Option<Instant>, now: Instant) -> bool {
    deadline.is_some_and(|deadline| now > deadline)
}

/// Join the results of setting the read and write deadline,
/// in that order, into the result of setting both.
///
/// The read error takes precedence. When both failed
/// the write error is only recorded as a debug event.
pub(crate) fn join_deadline_results(
    read: io::Result<()>,
    write: io::Result<()>,
) -> io::Result<()> {
    match (read, write) {
        (Err(err), Err(dropped)) => {
            tracing::debug!(
                error = %dropped,
                "set deadline: write deadline error discarded in favour of read deadline error",
            );
            Err(err)
        }
        (Err(err), Ok(())) => Err(err),
        (Ok(()), write) => write,
    }
}
