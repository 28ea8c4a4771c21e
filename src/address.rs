//! Address types which can be attached to a [`Conn`].
//!
//! [`NetAddr`] is the minimal contract: a network kind label
//! (e.g. `"tcp"`, `"udp"`, `"file"`) and a display form (via [`Display`]).
//!
//! [`Conn`]: crate::Conn
//! [`Display`]: fmt::Display

use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

/// A network endpoint address.
///
/// The string form of the address is provided by its [`Display`] implementation.
///
/// [`Display`]: fmt::Display
pub trait NetAddr: fmt::Display + fmt::Debug + Send + Sync + 'static {
    /// Name of the network, e.g. `"tcp"` or `"file"`.
    fn network(&self) -> &str;
}

impl<A: NetAddr + ?Sized> NetAddr for Box<A> {
    #[inline]
    fn network(&self) -> &str {
        (**self).network()
    }
}

impl<A: NetAddr + ?Sized> NetAddr for Arc<A> {
    #[inline]
    fn network(&self) -> &str {
        (**self).network()
    }
}

/// A [`NetAddr`] identifying a file, which should be a full path.
///
/// The path is not validated in any way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileAddr(String);

impl FileAddr {
    /// Network name used by all [`FileAddr`] values.
    pub const NETWORK: &'static str = "file";

    /// Create a new [`FileAddr`] for the given path.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Raw path of this [`FileAddr`], without the `file://` scheme.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.0
    }
}

impl From<String> for FileAddr {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for FileAddr {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for FileAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file://{}", self.0)
    }
}

impl NetAddr for FileAddr {
    #[inline]
    fn network(&self) -> &str {
        Self::NETWORK
    }
}

/// Generic [`NetAddr`], a network name paired with its display form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Addr {
    network: String,
    address: String,
}

impl Addr {
    /// Create a new [`Addr`].
    #[must_use]
    pub fn new(network: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            address: address.into(),
        }
    }

    /// Display form of this address, as given at creation.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

impl NetAddr for Addr {
    #[inline]
    fn network(&self) -> &str {
        &self.network
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_file_addr() {
        let addr = FileAddr::new("/tmp/x");
        assert_eq!(addr.network(), "file");
        assert_eq!(addr.to_string(), "file:///tmp/x");
        assert_eq!(addr.path(), "/tmp/x");
    }

    #[test]
    fn test_file_addr_relative_path_not_validated() {
        let addr = FileAddr::from("foo/../bar");
        assert_eq!(addr.to_string(), "file://foo/../bar");
    }

    #[test]
    fn test_addr() {
        let addr = Addr::new("udp", "1.2.3.4:53");
        assert_eq!(addr.network(), "udp");
        assert_eq!(addr.to_string(), "1.2.3.4:53");
        assert_eq!(addr.address(), "1.2.3.4:53");
    }

    #[test]
    fn test_erased_addr() {
        let addrs: Vec<Box<dyn NetAddr>> = vec![
            Box::new(FileAddr::new("/dev/null")),
            Box::new(Arc::new(Addr::new("pipe", "stdin"))),
        ];
        let rendered: Vec<_> = addrs
            .iter()
            .map(|addr| format!("{}:{addr}", addr.network()))
            .collect();
        assert_eq!(rendered, ["file:file:///dev/null", "pipe:stdin"]);
    }

    #[test]
    fn test_serde() {
        let addr = FileAddr::new("/var/run/app.sock");
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, r#""/var/run/app.sock""#);
        assert_eq!(serde_json::from_str::<FileAddr>(&json).unwrap(), addr);

        let addr: Addr =
            serde_json::from_str(r#"{"network":"tcp","address":"127.0.0.1:80"}"#).unwrap();
        assert_eq!(addr, Addr::new("tcp", "127.0.0.1:80"));
    }

    #[quickcheck]
    fn file_addr_is_always_file_scheme(path: String) -> bool {
        let addr = FileAddr::new(path.clone());
        addr.network() == "file" && addr.to_string() == format!("file://{path}")
    }

    #[quickcheck]
    fn addr_is_verbatim(network: String, address: String) -> bool {
        let addr = Addr::new(network.clone(), address.clone());
        addr.network() == network && addr.to_string() == address
    }
}
