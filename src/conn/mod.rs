//! Connection abstraction and the [`Conn`] adapter implementing it.
//!
//! [`NetConn`] is the contract of an open duplex channel: reading, writing,
//! closing, addressing and deadline control. [`Conn`] composes it from
//! separate capabilities, so that files, pipes, in-memory buffers and
//! test doubles can be used wherever such a connection is expected.

use std::{
    io::{self, Read, Write},
    time::Instant,
};

use crate::{
    address::NetAddr,
    close::Close,
    deadline::{SetReadDeadline, SetWriteDeadline, join_deadline_results},
};

mod adapter;
#[doc(inline)]
pub use adapter::Conn;

/// A generic bidirectional connection.
///
/// Besides the I/O and close capabilities it exposes the addresses
/// of both ends and allows deadlines to be set for future reads and writes.
pub trait NetConn: Read + Write + Close + SetReadDeadline + SetWriteDeadline {
    /// Local address of the connection, if known.
    fn local_addr(&self) -> Option<&dyn NetAddr>;

    /// Remote address of the connection, if known.
    fn remote_addr(&self) -> Option<&dyn NetAddr>;

    /// Set both the read and write deadline.
    ///
    /// The write deadline is set even if setting the read deadline failed.
    /// An error of the read half is returned in favour of an error of the write half,
    /// which is then only logged.
    fn set_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()> {
        let read = self.set_read_deadline(deadline);
        let write = self.set_write_deadline(deadline);
        join_deadline_results(read, write)
    }
}

impl<T: NetConn + ?Sized> NetConn for Box<T> {
    #[inline]
    fn local_addr(&self) -> Option<&dyn NetAddr> {
        (**self).local_addr()
    }

    #[inline]
    fn remote_addr(&self) -> Option<&dyn NetAddr> {
        (**self).remote_addr()
    }

    #[inline]
    fn set_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()> {
        (**self).set_deadline(deadline)
    }
}
