// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Shared helpers for integration tests: a ptp4l stand-in on a Unix datagram socket.

// Integration test helpers are `pub` so each `tests/*.rs` file can import them
// via `mod common`, but clippy flags them as unreachable outside the crate.
#![allow(unreachable_pub)]
#![allow(dead_code)]

use std::os::unix::net::UnixDatagram;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use ptp_client::{Session, SockUnix};
use ptp_proto::tlv::UserDescription;
use ptp_proto::{Message, MngTlv};

const ACTION_GET: u8 = 0;
const ACTION_SET: u8 = 1;
const ACTION_RESPONSE: u8 = 2;
const ACTION_COMMAND: u8 = 3;
const ACTION_ACKNOWLEDGE: u8 = 4;

const PRIORITY1: u16 = 0x2005;
const PRIORITY2: u16 = 0x2006;
const USER_DESCRIPTION: u16 = 0x0002;

/// Daemon identity placed in every reply header.
pub const DAEMON_CLOCK: [u8; 8] = [0xc4, 0x7d, 0x46, 0xff, 0xfe, 0x20, 0xac, 0xae];

/// How the mock daemon answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Behavior {
    /// Answer like ptp4l.
    Normal,
    /// Answer every request with a WRONG_VALUE error status.
    ErrorStatus,
    /// Answer with the request's sequence plus one.
    WrongSequence,
    /// Answer every request as PRIORITY2.
    WrongId,
    /// Never answer.
    Silent,
}

/// 48 bytes of PTP header plus management fields for a reply.
fn reply_header(total: usize, sequence: u16, action: u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(total);
    out.push(0x0d);
    out.push(0x02);
    out.extend_from_slice(&(total as u16).to_be_bytes());
    out.extend_from_slice(&[0, 0, 0x04, 0]);
    out.extend_from_slice(&[0; 12]);
    out.extend_from_slice(&DAEMON_CLOCK);
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&sequence.to_be_bytes());
    out.extend_from_slice(&[0x04, 0x7f]);
    out.extend_from_slice(&[0xff; 10]);
    out.extend_from_slice(&[1, 1, action, 0]);
    out
}

/// A MANAGEMENT TLV reply for `id` carrying `data`.
pub fn management_reply(id: u16, action: u8, sequence: u16, data: &[u8]) -> Vec<u8> {
    let mut data = data.to_vec();
    if data.len() % 2 != 0 {
        data.push(0);
    }
    let mut out = reply_header(54 + data.len(), sequence, action);
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&((2 + data.len()) as u16).to_be_bytes());
    out.extend_from_slice(&id.to_be_bytes());
    out.extend_from_slice(&data);
    out
}

/// A MANAGEMENT_ERROR_STATUS TLV reply for `id`.
pub fn error_reply(id: u16, sequence: u16, error: u16, display: &str) -> Vec<u8> {
    let mut text = vec![display.len() as u8];
    text.extend_from_slice(display.as_bytes());
    if text.len() % 2 != 0 {
        text.push(0);
    }
    let mut out = reply_header(52 + 8 + text.len(), sequence, ACTION_RESPONSE);
    out.extend_from_slice(&2u16.to_be_bytes());
    out.extend_from_slice(&((8 + text.len()) as u16).to_be_bytes());
    out.extend_from_slice(&error.to_be_bytes());
    out.extend_from_slice(&id.to_be_bytes());
    out.extend_from_slice(&[0; 4]);
    out.extend_from_slice(&text);
    out
}

struct DaemonState {
    priority1: u8,
    description: Vec<u8>,
}

impl DaemonState {
    fn answer(&mut self, req: &[u8], behavior: Behavior) -> Option<Vec<u8>> {
        if req.len() < 54 {
            return None;
        }
        let sequence = u16::from_be_bytes([req[30], req[31]]);
        let action = req[46] & 0x0f;
        let id = u16::from_be_bytes([req[52], req[53]]);
        let data = &req[54..];
        match behavior {
            Behavior::Silent => return None,
            Behavior::ErrorStatus => return Some(error_reply(id, sequence, 4, "bad value")),
            Behavior::WrongId => {
                return Some(management_reply(PRIORITY2, ACTION_RESPONSE, sequence, &[128]))
            }
            Behavior::WrongSequence => {
                return Some(management_reply(
                    id,
                    ACTION_RESPONSE,
                    sequence.wrapping_add(1),
                    &[self.priority1],
                ))
            }
            Behavior::Normal => {}
        }
        match (action, id) {
            (ACTION_SET, PRIORITY1) if !data.is_empty() => {
                self.priority1 = data[0];
                Some(management_reply(id, ACTION_RESPONSE, sequence, &[self.priority1]))
            }
            (ACTION_GET, PRIORITY1) => Some(management_reply(
                id,
                ACTION_RESPONSE,
                sequence,
                &[self.priority1],
            )),
            (ACTION_GET, USER_DESCRIPTION) => Some(management_reply(
                id,
                ACTION_RESPONSE,
                sequence,
                &self.description,
            )),
            (ACTION_COMMAND, _) => Some(management_reply(id, ACTION_ACKNOWLEDGE, sequence, &[])),
            (ACTION_SET, _) => Some(error_reply(id, sequence, 5, "")),
            _ => Some(error_reply(id, sequence, 2, "")),
        }
    }
}

/// A mock ptp4l answering management requests on a thread.
pub struct MockDaemon {
    /// Socket path the daemon listens on.
    pub path: PathBuf,
    requests: Arc<AtomicUsize>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl MockDaemon {
    /// Start a daemon listening at `dir/ptp4l`.
    pub fn spawn(dir: &Path, behavior: Behavior) -> MockDaemon {
        let path = dir.join("ptp4l");
        let sock = UnixDatagram::bind(&path).unwrap();
        sock.set_read_timeout(Some(Duration::from_millis(20))).unwrap();
        let requests = Arc::new(AtomicUsize::new(0));
        let stop = Arc::new(AtomicBool::new(false));
        let (req_count, stop_flag) = (requests.clone(), stop.clone());
        let description = MngTlv::UserDescription(UserDescription {
            user_description: "mock;lab".into(),
        })
        .to_vec()
        .unwrap();
        let handle = std::thread::spawn(move || {
            let mut state = DaemonState {
                priority1: 128,
                description,
            };
            let mut buf = [0u8; 1500];
            while !stop_flag.load(Ordering::Relaxed) {
                let Ok((n, from)) = sock.recv_from(&mut buf) else {
                    continue;
                };
                req_count.fetch_add(1, Ordering::Relaxed);
                let (Some(reply), Some(client)) = (state.answer(&buf[..n], behavior), from.as_pathname())
                else {
                    continue;
                };
                let _ = sock.send_to(&reply, client);
            }
        });
        MockDaemon {
            path,
            requests,
            stop,
            handle: Some(handle),
        }
    }

    /// Number of requests received so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }
}

impl Drop for MockDaemon {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// A session bound inside `dir` and aimed at `daemon`.
pub fn session_for(dir: &Path, daemon: &MockDaemon) -> Session {
    let mut sock = SockUnix::new();
    sock.set_self_address(dir.join("pmc.sock")).unwrap();
    sock.set_peer_address(&daemon.path).unwrap();
    sock.init().unwrap();
    Session::with_socket(sock, Message::new())
}
