// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Unix datagram transport to a local PTP daemon.
//!
//! ptp4l listens for management messages on a Unix datagram socket
//! (`uds_address`, usually `/var/run/ptp4l`). A client binds its own socket path so
//! the daemon can reply, sends the request to the daemon path, and waits for the
//! answer with [`SockUnix::poll`].
//!
//! The socket is created through `socket2` and converted into a std
//! [`UnixDatagram`] once bound. The bound path is unlinked on [`SockUnix::close`]
//! and on drop.

use std::mem::MaybeUninit;
use std::os::unix::io::AsRawFd;
use std::os::unix::net::UnixDatagram;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use ptp_proto::Buffer;
use socket2::{Domain, SockAddr, SockRef, Socket, Type};

use crate::config::ConfigFile;
use crate::error::{MngError, TransportError};

/// Longest socket path accepted, the size of `sun_path` minus the NUL.
pub const MAX_ADDRESS_LEN: usize = 107;

/// Unix datagram socket bound to a local path and aimed at one peer.
#[derive(Debug, Default)]
pub struct SockUnix {
    sock: Option<UnixDatagram>,
    self_addr: PathBuf,
    peer_addr: PathBuf,
}

// Full length of the next datagram, left queued. MSG_TRUNC makes Linux
// report the real size even with no room to copy into.
fn pending_len(sock: &UnixDatagram) -> Result<usize, MngError> {
    let mut empty: [MaybeUninit<u8>; 0] = [];
    loop {
        match SockRef::from(sock).recv_with_flags(&mut empty, libc::MSG_PEEK | libc::MSG_TRUNC) {
            Ok(len) => return Ok(len),
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
}

fn check_len(path: &Path) -> Result<(), MngError> {
    let len = path.as_os_str().len();
    if len > MAX_ADDRESS_LEN {
        return Err(TransportError::AddressTooLong { len }.into());
    }
    Ok(())
}

/// Compute the default client socket path for a file name prefix.
///
/// Root uses `/var/run/<prefix>.<pid>`. Other users use
/// `/var/run/user/<uid>/<prefix>.<pid>` when that runtime directory exists, and
/// `$HOME/.<prefix>.<pid>` otherwise.
pub fn default_address_for(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    // SAFETY: getuid has no preconditions and cannot fail.
    let uid = unsafe { libc::getuid() };
    if uid == 0 {
        return PathBuf::from(format!("/var/run/{prefix}.{pid}"));
    }
    let run_dir = PathBuf::from(format!("/var/run/user/{uid}"));
    if run_dir.is_dir() {
        return run_dir.join(format!("{prefix}.{pid}"));
    }
    let home = std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/tmp"));
    home.join(format!(".{prefix}.{pid}"))
}

impl SockUnix {
    /// Create an uninitialized socket with no addresses.
    pub fn new() -> Self {
        SockUnix::default()
    }

    /// Default self address for a management client, see [`default_address_for`].
    pub fn default_self_address() -> PathBuf {
        default_address_for("pmc")
    }

    /// Whether [`init`](SockUnix::init) succeeded and the socket is open.
    pub fn is_initialized(&self) -> bool {
        self.sock.is_some()
    }

    /// Path this socket binds to.
    pub fn self_address(&self) -> &Path {
        &self.self_addr
    }

    /// Path requests are sent to.
    pub fn peer_address(&self) -> &Path {
        &self.peer_addr
    }

    /// Use the default self address.
    pub fn set_default_self_address(&mut self) -> Result<(), MngError> {
        self.set_self_address(SockUnix::default_self_address())
    }

    /// Set the path to bind. Only allowed before [`init`](SockUnix::init).
    pub fn set_self_address<P: AsRef<Path>>(&mut self, path: P) -> Result<(), MngError> {
        if self.is_initialized() {
            return Err(TransportError::AlreadyInitialized.into());
        }
        let path = path.as_ref();
        check_len(path)?;
        self.self_addr = path.to_path_buf();
        Ok(())
    }

    /// Set the peer (daemon) path.
    pub fn set_peer_address<P: AsRef<Path>>(&mut self, path: P) -> Result<(), MngError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(TransportError::EmptyAddress.into());
        }
        check_len(path)?;
        self.peer_addr = path.to_path_buf();
        Ok(())
    }

    /// Set the peer path from the config file's `uds_address`.
    pub fn set_peer_address_from_config(
        &mut self,
        cfg: &ConfigFile,
        section: Option<&str>,
    ) -> Result<(), MngError> {
        self.set_peer_address(cfg.uds_address(section))
    }

    /// Bind the socket to the self address.
    ///
    /// A stale file left at the self path by an earlier process is removed first.
    pub fn init(&mut self) -> Result<(), MngError> {
        if self.is_initialized() {
            return Err(TransportError::AlreadyInitialized.into());
        }
        if self.self_addr.as_os_str().is_empty() {
            return Err(TransportError::EmptyAddress.into());
        }
        match std::fs::remove_file(&self.self_addr) {
            Ok(()) => debug!("removed stale socket {}", self.self_addr.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        let socket = Socket::new(Domain::UNIX, Type::DGRAM, None)?;
        socket.bind(&SockAddr::unix(&self.self_addr)?)?;
        self.sock = Some(socket.into());
        debug!("bound management socket {}", self.self_addr.display());
        Ok(())
    }

    fn socket(&self) -> Result<&UnixDatagram, MngError> {
        self.sock
            .as_ref()
            .ok_or(MngError::Transport(TransportError::NotInitialized))
    }

    /// Send exactly `data` to the peer.
    pub fn send(&self, data: &[u8]) -> Result<(), MngError> {
        let sock = self.socket()?;
        if self.peer_addr.as_os_str().is_empty() {
            return Err(TransportError::NoPeer.into());
        }
        let sent = sock.send_to(data, &self.peer_addr)?;
        if sent != data.len() {
            return Err(TransportError::ShortSend {
                expected: data.len(),
                sent,
            }
            .into());
        }
        debug!("sent {} bytes to {}", sent, self.peer_addr.display());
        Ok(())
    }

    /// Send the first `len` bytes of a buffer.
    pub fn send_buf(&self, buf: &Buffer, len: usize) -> Result<(), MngError> {
        let data = buf
            .as_slice()
            .get(..len)
            .ok_or(MngError::Build(ptp_proto::ParseError::TooSmall))?;
        self.send(data)
    }

    /// Wait until a datagram is readable.
    ///
    /// Returns `Ok(false)` when `timeout_ms` passes first. A timeout of 0 waits
    /// without limit.
    pub fn poll(&self, timeout_ms: u64) -> Result<bool, MngError> {
        let sock = self.socket()?;
        let timeout = if timeout_ms == 0 {
            -1
        } else {
            i32::try_from(timeout_ms).unwrap_or(i32::MAX)
        };
        let mut fds = libc::pollfd {
            fd: sock.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        loop {
            // SAFETY: fds points to one valid pollfd for the duration of the call.
            let ret = unsafe { libc::poll(&mut fds, 1, timeout) };
            if ret >= 0 {
                return Ok(ret > 0 && fds.revents & libc::POLLIN != 0);
            }
            let err = std::io::Error::last_os_error();
            if err.kind() != std::io::ErrorKind::Interrupted {
                return Err(err.into());
            }
        }
    }

    /// Receive one datagram from the peer into `buf`.
    ///
    /// A datagram longer than `buf` is consumed and reported as
    /// [`TransportError::Truncated`].
    pub fn receive_bytes(&self, buf: &mut [u8]) -> Result<usize, MngError> {
        let sock = self.socket()?;
        let pending = pending_len(sock)?;
        let (len, from) = sock.recv_from(buf)?;
        if from.as_pathname() != Some(self.peer_addr.as_path()) {
            warn!("dropping {} bytes from {:?}", pending, from);
            return Err(TransportError::WrongPeer.into());
        }
        if pending > buf.len() {
            warn!("datagram of {} bytes exceeds {} byte buffer", pending, buf.len());
            return Err(TransportError::Truncated {
                len: pending,
                capacity: buf.len(),
            }
            .into());
        }
        if len == 0 {
            return Err(TransportError::EmptyMessage.into());
        }
        debug!("received {} bytes", len);
        Ok(len)
    }

    /// Receive one datagram from the peer into a message buffer.
    pub fn receive(&self, buf: &mut Buffer) -> Result<usize, MngError> {
        self.receive_bytes(buf.as_mut_slice())
    }

    /// Close the socket and remove its path. Calling it again does nothing.
    pub fn close(&mut self) {
        if self.sock.take().is_some() {
            if let Err(e) = std::fs::remove_file(&self.self_addr) {
                debug!("unlink {}: {}", self.self_addr.display(), e);
            }
            debug!("closed management socket {}", self.self_addr.display());
        }
    }
}

impl Drop for SockUnix {
    fn drop(&mut self) {
        self.close();
    }
}
