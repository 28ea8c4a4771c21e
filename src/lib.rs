//! Turn any combination of a reader, a writer and a closer into a network connection.
//!
//! [`Conn`] composes separately supplied capabilities (files, pipes,
//! in-memory buffers, test doubles, ...) into a single [`NetConn`]:
//! an open duplex channel with local and remote addresses and read and write deadlines.
//!
//! | capability | blocking | async |
//! |-|-|-|
//! | read | [`std::io::Read`] | [`tokio::io::AsyncRead`] |
//! | write | [`std::io::Write`] | [`tokio::io::AsyncWrite`] |
//! | close | [`Close`] (e.g. [`closer_fn`]) | [`Close`] |
//! | deadline forwarding (writer, optional) | [`SetReadDeadline`] / [`SetWriteDeadline`] | idem |
//!
//! Once a deadline passed, new reads or writes fail with a timeout
//! error (see [`deadline::is_timeout`]) without touching the wrapped reader or writer.
//! All other errors are passed through unchanged.
//!
//! # Example
//!
//! ```
//! use ioconn::{Conn, FileAddr, closer_fn};
//! use std::io::{self, Cursor, Read};
//!
//! let mut conn = Conn::new(Cursor::new(b"hello".to_vec()), io::sink(), closer_fn(|| Ok(())))
//!     .with_local_addr(FileAddr::new("/tmp/x"));
//!
//! let mut buf = [0u8; 5];
//! conn.read_exact(&mut buf)?;
//! assert_eq!(&buf, b"hello");
//! assert_eq!(conn.local_addr().map(|addr| addr.to_string()).as_deref(), Some("file:///tmp/x"));
//!
//! conn.close()?;
//! # Ok::<(), io::Error>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(test), warn(clippy::print_stdout, clippy::dbg_macro))]

pub mod address;
pub mod close;
pub mod conn;
pub mod deadline;

#[doc(inline)]
pub use address::{Addr, FileAddr, NetAddr};
#[doc(inline)]
pub use close::{Close, CloserFn, closer_fn};
#[doc(inline)]
pub use conn::{Conn, NetConn};
#[doc(inline)]
pub use deadline::{DeadlineExceeded, SetReadDeadline, SetWriteDeadline};
