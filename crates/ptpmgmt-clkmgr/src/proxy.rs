// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Clock manager proxy messages and their datagram transport.
//!
//! Every message starts with a one-octet message ID and a signed one-octet
//! acknowledge value. Requests carry `ACK_NONE`; replies carry `ACK_SUCCESS` or
//! `ACK_FAIL`. All integers are in network byte order.
//!
//! ```text
//! CONNECT     request  session_id:u16 client_id:[u8;64]
//!             reply    session_id:u16 count:u8 count x TimeBase
//! SUBSCRIBE   request  session_id:u16 index:u32 ptp_mask:u32 composite:u32
//!                      ptp_threshold:u32 sys_mask:u32 sys_threshold:u32 flags:u8
//!             reply    session_id:u16 index:u32 Event
//! NOTIFY               session_id:u16 index:u32 Event
//! DISCONNECT           session_id:u16
//!
//! TimeBase  index:u32 name:[u8;64] flags:u8 interface:[u8;64]
//!           transport_specific:u8 domain_number:u8
//! Event     master_offset:i64 gm_identity:[u8;8] as_capable:u8 synced_to_gm:u8
//!           ptp_sync_interval:i64 chrony_offset:i64 chrony_reference_id:u32
//!           chrony_polling_interval:i64
//! ```

use std::io::{self, Cursor, Read};
use std::os::unix::io::AsRawFd;
use std::os::unix::net::UnixDatagram;
use std::path::{Path, PathBuf};
use std::time::Duration;

use byteorder::{ReadBytesExt, WriteBytesExt, BE};
use log::{debug, warn};

use crate::error::{ClkMgrError, ProxyProtocolError};
use crate::subscription::{
    ClockSyncSubscription, EventMask, PtpClockSubscription, SysClockSubscription,
};
use crate::timebase::{PtpInstance, TimeBaseRecord};

/// Message ID of the liveness probe.
pub const MSG_NULL: u8 = 1;
/// Message ID of connect.
pub const MSG_CONNECT: u8 = 2;
/// Message ID of subscribe.
pub const MSG_SUBSCRIBE: u8 = 3;
/// Message ID of notify.
pub const MSG_NOTIFY: u8 = 4;
/// Message ID of disconnect.
pub const MSG_DISCONNECT: u8 = 5;

/// Request refused.
pub const ACK_FAIL: i8 = -1;
/// Not a reply.
pub const ACK_NONE: i8 = 0;
/// Request accepted.
pub const ACK_SUCCESS: i8 = 1;

/// Session ID of a client that has not connected yet.
pub const INVALID_SESSION_ID: u16 = 0xffff;

/// Size of the fixed text slots.
pub const TEXT_FIELD_LEN: usize = 64;

/// Largest datagram the proxy sends.
pub const MAX_MESSAGE_SIZE: usize = 8192;

const TIMEBASE_FLAG_PTP: u8 = 1 << 0;
const TIMEBASE_FLAG_SYS: u8 = 1 << 1;
const SUBSCRIBE_FLAG_PTP: u8 = 1 << 0;
const SUBSCRIBE_FLAG_SYS: u8 = 1 << 1;

/// Clock state reported by the proxy.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ProxyEvent {
    /// ptp4l offset from master, nanoseconds.
    pub master_offset: i64,
    /// Grandmaster clock identity.
    pub gm_identity: [u8; 8],
    /// Port asCapable.
    pub as_capable: bool,
    /// Synced to the grandmaster.
    pub synced_to_gm: bool,
    /// ptp4l sync interval.
    pub ptp_sync_interval: i64,
    /// chrony offset, nanoseconds.
    pub chrony_offset: i64,
    /// chrony reference ID.
    pub chrony_reference_id: u32,
    /// chrony polling interval.
    pub chrony_polling_interval: i64,
}

impl ProxyEvent {
    /// Grandmaster identity as an integer, first octet most significant.
    pub fn gm_identity_u64(&self) -> u64 {
        u64::from_be_bytes(self.gm_identity)
    }

    fn write<W: WriteBytesExt>(&self, w: &mut W) -> io::Result<()> {
        w.write_i64::<BE>(self.master_offset)?;
        w.write_all(&self.gm_identity)?;
        w.write_u8(self.as_capable as u8)?;
        w.write_u8(self.synced_to_gm as u8)?;
        w.write_i64::<BE>(self.ptp_sync_interval)?;
        w.write_i64::<BE>(self.chrony_offset)?;
        w.write_u32::<BE>(self.chrony_reference_id)?;
        w.write_i64::<BE>(self.chrony_polling_interval)?;
        Ok(())
    }

    fn read<R: ReadBytesExt>(r: &mut R) -> io::Result<ProxyEvent> {
        let master_offset = r.read_i64::<BE>()?;
        let mut gm_identity = [0u8; 8];
        r.read_exact(&mut gm_identity)?;
        Ok(ProxyEvent {
            master_offset,
            gm_identity,
            as_capable: r.read_u8()? != 0,
            synced_to_gm: r.read_u8()? != 0,
            ptp_sync_interval: r.read_i64::<BE>()?,
            chrony_offset: r.read_i64::<BE>()?,
            chrony_reference_id: r.read_u32::<BE>()?,
            chrony_polling_interval: r.read_i64::<BE>()?,
        })
    }
}

/// A proxy protocol message.
#[derive(Clone, Debug, PartialEq)]
pub enum ProxyMessage {
    /// Liveness probe.
    Null,
    /// Client asks for a session.
    Connect {
        /// Current session ID, [`INVALID_SESSION_ID`] on first connect.
        session_id: u16,
        /// Client socket path.
        client_id: String,
    },
    /// Proxy grants a session and lists its time bases.
    ConnectReply {
        /// Assigned session ID.
        session_id: u16,
        /// Available time bases.
        time_bases: Vec<TimeBaseRecord>,
    },
    /// Client subscribes to a time base.
    Subscribe {
        /// Session ID.
        session_id: u16,
        /// Time base index.
        index: usize,
        /// What to report.
        subscription: ClockSyncSubscription,
    },
    /// Proxy accepts a subscription and reports the current state.
    SubscribeReply {
        /// Session ID.
        session_id: u16,
        /// Time base index.
        index: usize,
        /// Current clock state.
        event: ProxyEvent,
    },
    /// Proxy reports new clock state.
    Notify {
        /// Session ID.
        session_id: u16,
        /// Time base index.
        index: usize,
        /// New clock state.
        event: ProxyEvent,
    },
    /// Client ends its session.
    Disconnect {
        /// Session ID.
        session_id: u16,
    },
}

fn write_text<W: WriteBytesExt>(w: &mut W, text: &str) -> io::Result<()> {
    let bytes = text.as_bytes();
    if bytes.len() > TEXT_FIELD_LEN {
        return Err(ProxyProtocolError::FieldTooLong {
            len: bytes.len(),
            max: TEXT_FIELD_LEN,
        }
        .into());
    }
    let mut slot = [0u8; TEXT_FIELD_LEN];
    slot[..bytes.len()].copy_from_slice(bytes);
    w.write_all(&slot)
}

fn read_text<R: Read>(r: &mut R) -> io::Result<String> {
    let mut slot = [0u8; TEXT_FIELD_LEN];
    r.read_exact(&mut slot)?;
    let end = slot.iter().position(|&b| b == 0).unwrap_or(TEXT_FIELD_LEN);
    Ok(String::from_utf8_lossy(&slot[..end]).into_owned())
}

fn index_to_wire(index: usize) -> io::Result<u32> {
    u32::try_from(index).map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "index too large"))
}

impl ProxyMessage {
    /// Message ID on the wire.
    pub fn msg_id(&self) -> u8 {
        match self {
            ProxyMessage::Null => MSG_NULL,
            ProxyMessage::Connect { .. } | ProxyMessage::ConnectReply { .. } => MSG_CONNECT,
            ProxyMessage::Subscribe { .. } | ProxyMessage::SubscribeReply { .. } => MSG_SUBSCRIBE,
            ProxyMessage::Notify { .. } => MSG_NOTIFY,
            ProxyMessage::Disconnect { .. } => MSG_DISCONNECT,
        }
    }

    fn ack(&self) -> i8 {
        match self {
            ProxyMessage::ConnectReply { .. } | ProxyMessage::SubscribeReply { .. } => ACK_SUCCESS,
            _ => ACK_NONE,
        }
    }

    /// Serialize the message.
    pub fn encode(&self) -> io::Result<Vec<u8>> {
        let mut w = Vec::with_capacity(64);
        w.write_u8(self.msg_id())?;
        w.write_i8(self.ack())?;
        match self {
            ProxyMessage::Null => {}
            ProxyMessage::Connect {
                session_id,
                client_id,
            } => {
                w.write_u16::<BE>(*session_id)?;
                write_text(&mut w, client_id)?;
            }
            ProxyMessage::ConnectReply {
                session_id,
                time_bases,
            } => {
                w.write_u16::<BE>(*session_id)?;
                let count = u8::try_from(time_bases.len()).map_err(|_| {
                    io::Error::new(io::ErrorKind::InvalidInput, "too many time bases")
                })?;
                w.write_u8(count)?;
                for tb in time_bases {
                    w.write_u32::<BE>(index_to_wire(tb.index)?)?;
                    write_text(&mut w, &tb.name)?;
                    let mut flags = 0;
                    if tb.ptp.is_some() {
                        flags |= TIMEBASE_FLAG_PTP;
                    }
                    if tb.have_sys_clock {
                        flags |= TIMEBASE_FLAG_SYS;
                    }
                    w.write_u8(flags)?;
                    let ptp = tb.ptp.clone().unwrap_or_default();
                    write_text(&mut w, &ptp.interface_name)?;
                    w.write_u8(ptp.transport_specific)?;
                    w.write_u8(ptp.domain_number)?;
                }
            }
            ProxyMessage::Subscribe {
                session_id,
                index,
                subscription,
            } => {
                w.write_u16::<BE>(*session_id)?;
                w.write_u32::<BE>(index_to_wire(*index)?)?;
                let ptp = subscription.ptp_subscription();
                w.write_u32::<BE>(ptp.event_mask().bits())?;
                w.write_u32::<BE>(ptp.composite_event_mask().bits())?;
                w.write_u32::<BE>(ptp.clock_offset_threshold())?;
                let sys = subscription.sys_subscription();
                w.write_u32::<BE>(sys.event_mask().bits())?;
                w.write_u32::<BE>(sys.clock_offset_threshold())?;
                let mut flags = 0;
                if subscription.is_ptp_subscription_enabled() {
                    flags |= SUBSCRIBE_FLAG_PTP;
                }
                if subscription.is_sys_subscription_enabled() {
                    flags |= SUBSCRIBE_FLAG_SYS;
                }
                w.write_u8(flags)?;
            }
            ProxyMessage::SubscribeReply {
                session_id,
                index,
                event,
            }
            | ProxyMessage::Notify {
                session_id,
                index,
                event,
            } => {
                w.write_u16::<BE>(*session_id)?;
                w.write_u32::<BE>(index_to_wire(*index)?)?;
                event.write(&mut w)?;
            }
            ProxyMessage::Disconnect { session_id } => w.write_u16::<BE>(*session_id)?,
        }
        Ok(w)
    }

    /// Parse a received datagram.
    ///
    /// A reply with `ACK_FAIL` is returned as [`ProxyProtocolError::Nack`].
    pub fn decode(buf: &[u8]) -> Result<ProxyMessage, ProxyProtocolError> {
        let mut r = Cursor::new(buf);
        ProxyMessage::read(&mut r).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => ProxyProtocolError::Truncated,
            _ => e
                .into_inner()
                .and_then(|inner| inner.downcast::<ProxyProtocolError>().ok())
                .map(|b| *b)
                .unwrap_or(ProxyProtocolError::Truncated),
        })
    }

    fn read(r: &mut Cursor<&[u8]>) -> io::Result<ProxyMessage> {
        let msg_id = r.read_u8()?;
        let ack = r.read_i8()?;
        let reply = match ack {
            ACK_NONE => false,
            ACK_SUCCESS => true,
            ACK_FAIL => return Err(ProxyProtocolError::Nack(msg_id).into_io()),
            other => return Err(ProxyProtocolError::InvalidAck(other).into_io()),
        };
        let msg = match (msg_id, reply) {
            (MSG_NULL, _) => ProxyMessage::Null,
            (MSG_CONNECT, false) => ProxyMessage::Connect {
                session_id: r.read_u16::<BE>()?,
                client_id: read_text(r)?,
            },
            (MSG_CONNECT, true) => {
                let session_id = r.read_u16::<BE>()?;
                let count = r.read_u8()?;
                let mut time_bases = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    let index = r.read_u32::<BE>()? as usize;
                    let name = read_text(r)?;
                    let flags = r.read_u8()?;
                    let interface_name = read_text(r)?;
                    let transport_specific = r.read_u8()?;
                    let domain_number = r.read_u8()?;
                    time_bases.push(TimeBaseRecord {
                        index,
                        name,
                        ptp: (flags & TIMEBASE_FLAG_PTP != 0).then_some(PtpInstance {
                            interface_name,
                            transport_specific,
                            domain_number,
                        }),
                        have_sys_clock: flags & TIMEBASE_FLAG_SYS != 0,
                    });
                }
                ProxyMessage::ConnectReply {
                    session_id,
                    time_bases,
                }
            }
            (MSG_SUBSCRIBE, false) => {
                let session_id = r.read_u16::<BE>()?;
                let index = r.read_u32::<BE>()? as usize;
                let mut ptp = PtpClockSubscription::default();
                ptp.set_event_mask(EventMask::from_bits_truncate(r.read_u32::<BE>()?));
                ptp.set_composite_event_mask(EventMask::from_bits_truncate(r.read_u32::<BE>()?));
                ptp.set_clock_offset_threshold(r.read_u32::<BE>()?);
                let mut sys = SysClockSubscription::default();
                sys.set_event_mask(EventMask::from_bits_truncate(r.read_u32::<BE>()?));
                sys.set_clock_offset_threshold(r.read_u32::<BE>()?);
                let flags = r.read_u8()?;
                let mut subscription = ClockSyncSubscription::new();
                subscription.set_ptp_subscription(ptp);
                subscription.set_sys_subscription(sys);
                if flags & SUBSCRIBE_FLAG_PTP == 0 {
                    subscription.disable_ptp_subscription();
                }
                if flags & SUBSCRIBE_FLAG_SYS == 0 {
                    subscription.disable_sys_subscription();
                }
                ProxyMessage::Subscribe {
                    session_id,
                    index,
                    subscription,
                }
            }
            (MSG_SUBSCRIBE, true) => ProxyMessage::SubscribeReply {
                session_id: r.read_u16::<BE>()?,
                index: r.read_u32::<BE>()? as usize,
                event: ProxyEvent::read(r)?,
            },
            (MSG_NOTIFY, _) => ProxyMessage::Notify {
                session_id: r.read_u16::<BE>()?,
                index: r.read_u32::<BE>()? as usize,
                event: ProxyEvent::read(r)?,
            },
            (MSG_DISCONNECT, _) => ProxyMessage::Disconnect {
                session_id: r.read_u16::<BE>()?,
            },
            (other, _) => return Err(ProxyProtocolError::UnknownMessage(other).into_io()),
        };
        Ok(msg)
    }
}

impl ProxyProtocolError {
    fn into_io(self) -> io::Error {
        io::Error::new(io::ErrorKind::InvalidData, self)
    }
}

/// Client datagram socket bound to its own path and connected to the proxy.
#[derive(Debug)]
pub struct ProxyTransport {
    sock: UnixDatagram,
    path: PathBuf,
}

impl ProxyTransport {
    /// Bind `client_path` and connect to `proxy_path`.
    ///
    /// Fails at once if nothing listens on `proxy_path`.
    pub fn open(client_path: &Path, proxy_path: &Path) -> io::Result<ProxyTransport> {
        match std::fs::remove_file(client_path) {
            Ok(()) => debug!("removed stale socket {}", client_path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        let sock = UnixDatagram::bind(client_path)?;
        // From here on Drop unlinks the path, also when connect fails.
        let transport = ProxyTransport {
            sock,
            path: client_path.to_path_buf(),
        };
        transport.sock.connect(proxy_path)?;
        transport.sock.set_nonblocking(true)?;
        debug!(
            "proxy transport {} -> {}",
            client_path.display(),
            proxy_path.display()
        );
        Ok(transport)
    }

    /// Path the client is bound to.
    pub fn client_path(&self) -> &Path {
        &self.path
    }

    /// Send one message to the proxy.
    pub fn send(&self, msg: &ProxyMessage) -> io::Result<()> {
        let bytes = msg.encode()?;
        let sent = self.sock.send(&bytes)?;
        if sent != bytes.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("sent {sent} of {} bytes", bytes.len()),
            ));
        }
        debug!("sent proxy message {} ({} bytes)", msg.msg_id(), sent);
        Ok(())
    }

    fn wait_readable(&self, timeout: Duration) -> io::Result<bool> {
        let ms = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);
        let mut fds = libc::pollfd {
            fd: self.sock.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        loop {
            // SAFETY: fds points to one valid pollfd for the duration of the call.
            let ret = unsafe { libc::poll(&mut fds, 1, ms) };
            if ret >= 0 {
                return Ok(ret > 0);
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }

    fn try_recv(&self) -> Result<Option<ProxyMessage>, ClkMgrError> {
        let mut buf = [0u8; MAX_MESSAGE_SIZE];
        match self.sock.recv(&mut buf) {
            Ok(n) => {
                let msg = ProxyMessage::decode(&buf[..n])?;
                debug!("received proxy message {} ({} bytes)", msg.msg_id(), n);
                Ok(Some(msg))
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Wait up to `timeout` for one message.
    ///
    /// Returns `Ok(None)` if nothing arrived in time.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<ProxyMessage>, ClkMgrError> {
        if !self.wait_readable(timeout)? {
            return Ok(None);
        }
        self.try_recv()
    }

    /// Read every message already queued, without blocking.
    ///
    /// Malformed messages are logged and skipped.
    pub fn drain(&self) -> io::Result<Vec<ProxyMessage>> {
        let mut out = Vec::new();
        loop {
            match self.try_recv() {
                Ok(Some(msg)) => out.push(msg),
                Ok(None) => return Ok(out),
                Err(ClkMgrError::Io(e)) => return Err(e),
                Err(e) => warn!("dropping proxy message: {e}"),
            }
        }
    }
}

impl Drop for ProxyTransport {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            debug!("unlink {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> ProxyEvent {
        ProxyEvent {
            master_offset: -42,
            gm_identity: [0xc4, 0x7d, 0x46, 0xff, 0xfe, 0x20, 0xac, 0xae],
            as_capable: true,
            synced_to_gm: false,
            ptp_sync_interval: 125_000,
            chrony_offset: 17,
            chrony_reference_id: 0x4750_5300,
            chrony_polling_interval: 2_000_000,
        }
    }

    #[test]
    fn test_notify_layout() {
        let msg = ProxyMessage::Notify {
            session_id: 7,
            index: 1,
            event: sample_event(),
        };
        let bytes = msg.encode().unwrap();
        assert_eq!(bytes.len(), 2 + 2 + 4 + 8 + 8 + 2 + 8 + 8 + 4 + 8);
        assert_eq!(&bytes[..8], &[MSG_NOTIFY, 0, 0, 7, 0, 0, 0, 1]);
        assert_eq!(ProxyMessage::decode(&bytes).unwrap(), msg);
    }

    #[test]
    fn test_connect_reply_records() {
        let msg = ProxyMessage::ConnectReply {
            session_id: 3,
            time_bases: vec![
                TimeBaseRecord {
                    index: 1,
                    name: "med".into(),
                    ptp: Some(PtpInstance {
                        interface_name: "enp1s0".into(),
                        transport_specific: 1,
                        domain_number: 24,
                    }),
                    have_sys_clock: true,
                },
                TimeBaseRecord {
                    index: 2,
                    name: "sys only".into(),
                    ptp: None,
                    have_sys_clock: true,
                },
            ],
        };
        let bytes = msg.encode().unwrap();
        assert_eq!(bytes[1] as i8, ACK_SUCCESS);
        assert_eq!(bytes.len(), 2 + 3 + 2 * (4 + 64 + 1 + 64 + 2));
        assert_eq!(ProxyMessage::decode(&bytes).unwrap(), msg);
    }

    #[test]
    fn test_subscribe_request() {
        let mut sub = ClockSyncSubscription::new();
        let mut ptp = PtpClockSubscription::default();
        ptp.set_event_mask(EventMask::GM_OFFSET | EventMask::SYNCED_TO_GM);
        ptp.set_composite_event_mask(EventMask::COMPOSITE_ALLOWED);
        ptp.set_clock_offset_threshold(500);
        sub.set_ptp_subscription(ptp);
        let msg = ProxyMessage::Subscribe {
            session_id: 9,
            index: 2,
            subscription: sub,
        };
        let bytes = msg.encode().unwrap();
        assert_eq!(bytes.len(), 2 + 2 + 4 + 5 * 4 + 1);
        assert_eq!(*bytes.last().unwrap(), SUBSCRIBE_FLAG_PTP);
        assert_eq!(ProxyMessage::decode(&bytes).unwrap(), msg);
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(ProxyMessage::decode(&[]), Err(ProxyProtocolError::Truncated));
        assert_eq!(
            ProxyMessage::decode(&[MSG_NOTIFY, 0, 0]),
            Err(ProxyProtocolError::Truncated)
        );
        assert_eq!(
            ProxyMessage::decode(&[99, 0]),
            Err(ProxyProtocolError::UnknownMessage(99))
        );
        assert_eq!(
            ProxyMessage::decode(&[MSG_CONNECT, ACK_FAIL as u8]),
            Err(ProxyProtocolError::Nack(MSG_CONNECT))
        );
        assert_eq!(
            ProxyMessage::decode(&[MSG_CONNECT, 5]),
            Err(ProxyProtocolError::InvalidAck(5))
        );
    }

    #[test]
    fn test_text_field_too_long() {
        let msg = ProxyMessage::Connect {
            session_id: INVALID_SESSION_ID,
            client_id: "x".repeat(TEXT_FIELD_LEN + 1),
        };
        let err = msg.encode().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_transport_unreachable_proxy() {
        let dir = tempfile::tempdir().unwrap();
        let client = dir.path().join("client");
        let err = ProxyTransport::open(&client, &dir.path().join("no-proxy")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(!client.exists());
    }

    #[test]
    fn test_transport_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let proxy_path = dir.path().join("proxy");
        let proxy = UnixDatagram::bind(&proxy_path).unwrap();
        let client_path = dir.path().join("client");
        let transport = ProxyTransport::open(&client_path, &proxy_path).unwrap();

        assert!(transport
            .recv_timeout(Duration::from_millis(10))
            .unwrap()
            .is_none());
        transport.send(&ProxyMessage::Null).unwrap();
        let mut buf = [0u8; 64];
        let n = proxy.recv(&mut buf).unwrap();
        assert_eq!(&buf[..n], &[MSG_NULL, 0]);

        let notify = ProxyMessage::Notify {
            session_id: 1,
            index: 1,
            event: sample_event(),
        };
        let bytes = notify.encode().unwrap();
        proxy.send_to(&bytes, &client_path).unwrap();
        proxy.send_to(&[77, 0], &client_path).unwrap();
        proxy.send_to(&bytes, &client_path).unwrap();
        let got = transport.recv_timeout(Duration::from_millis(500)).unwrap();
        assert_eq!(got, Some(notify.clone()));
        let rest = transport.drain().unwrap();
        assert_eq!(rest, vec![notify]);

        drop(transport);
        assert!(!client_path.exists());
    }
}
