//! Close capability of a [`Conn`].
//!
//! [`Conn`]: crate::Conn

use std::{fmt, io};

/// The close capability, analogous to what dropping a socket does,
/// but explicit and fallible.
pub trait Close {
    /// Close the underlying resource(s).
    fn close(&mut self) -> io::Result<()>;
}

impl<C: Close + ?Sized> Close for &mut C {
    #[inline]
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

impl<C: Close + ?Sized> Close for Box<C> {
    #[inline]
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Returns a new [`CloserFn`] with the given closure.
///
/// This lets you use any function or closure returning an [`io::Result`]
/// as the [`Close`] capability of a [`Conn`].
///
/// [`Conn`]: crate::Conn
pub fn closer_fn<F>(f: F) -> CloserFn<F>
where
    F: FnMut() -> io::Result<()>,
{
    CloserFn { f }
}

/// A [`Close`] implemented by a closure.
///
/// See [`closer_fn`] for more details.
#[derive(Copy, Clone)]
pub struct CloserFn<F> {
    f: F,
}

impl<F> fmt::Debug for CloserFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloserFn")
            .field("f", &format_args!("{}", std::any::type_name::<F>()))
            .finish()
    }
}

impl<F> Close for CloserFn<F>
where
    F: FnMut() -> io::Result<()>,
{
    #[inline]
    fn close(&mut self) -> io::Result<()> {
        (self.f)()
    }
}
