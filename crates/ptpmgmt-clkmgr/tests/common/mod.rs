// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Shared helpers for integration tests: a clock manager proxy stand-in.

// Integration test helpers are `pub` so each `tests/*.rs` file can import them
// via `mod common`, but clippy flags them as unreachable outside the crate.
#![allow(unreachable_pub)]
#![allow(dead_code)]

use std::os::unix::net::UnixDatagram;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use clkmgr_client::proxy::{ProxyEvent, ProxyMessage, ACK_FAIL, MSG_CONNECT, MSG_SUBSCRIBE};
use clkmgr_client::{ClockManager, PtpInstance, TimeBaseRecord};

/// Session ID the mock hands out.
pub const SESSION_ID: u16 = 1;

/// Grandmaster identity in the mock's events.
pub const GM_IDENTITY: [u8; 8] = [0xc4, 0x7d, 0x46, 0xff, 0xfe, 0x20, 0xac, 0xae];

/// How the mock proxy answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProxyBehavior {
    /// Answer like the proxy.
    Normal,
    /// Refuse connect requests.
    NackConnect,
    /// Refuse subscribe requests.
    NackSubscribe,
    /// Never answer.
    Silent,
}

/// Clock state reported in subscribe replies.
pub fn initial_event() -> ProxyEvent {
    ProxyEvent {
        master_offset: 50,
        gm_identity: GM_IDENTITY,
        as_capable: true,
        synced_to_gm: true,
        ptp_sync_interval: 125_000,
        chrony_offset: 20,
        chrony_reference_id: u32::from_be_bytes(*b"GPS\0"),
        chrony_polling_interval: 1_000_000,
    }
}

/// Time bases the mock offers: `med` with PTP and system clock, `low` with
/// the system clock only.
pub fn time_bases() -> Vec<TimeBaseRecord> {
    vec![
        TimeBaseRecord {
            index: 1,
            name: "med".into(),
            ptp: Some(PtpInstance {
                interface_name: "enp1s0".into(),
                transport_specific: 1,
                domain_number: 0,
            }),
            have_sys_clock: true,
        },
        TimeBaseRecord {
            index: 2,
            name: "low".into(),
            ptp: None,
            have_sys_clock: true,
        },
    ]
}

#[derive(Default)]
struct Counters {
    connects: AtomicUsize,
    subscribes: AtomicUsize,
    disconnects: AtomicUsize,
}

/// A mock proxy answering on a thread.
pub struct MockProxy {
    /// Socket path the proxy listens on.
    pub path: PathBuf,
    sock: Arc<UnixDatagram>,
    client: Arc<Mutex<Option<PathBuf>>>,
    counters: Arc<Counters>,
    answering: Arc<AtomicBool>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

fn reply_for(msg: &ProxyMessage, behavior: ProxyBehavior, counters: &Counters) -> Option<Vec<u8>> {
    match msg {
        ProxyMessage::Connect { .. } => {
            counters.connects.fetch_add(1, Ordering::Relaxed);
            if behavior == ProxyBehavior::NackConnect {
                return Some(vec![MSG_CONNECT, ACK_FAIL as u8]);
            }
            ProxyMessage::ConnectReply {
                session_id: SESSION_ID,
                time_bases: time_bases(),
            }
            .encode()
            .ok()
        }
        ProxyMessage::Subscribe { index, .. } => {
            counters.subscribes.fetch_add(1, Ordering::Relaxed);
            if behavior == ProxyBehavior::NackSubscribe {
                return Some(vec![MSG_SUBSCRIBE, ACK_FAIL as u8]);
            }
            ProxyMessage::SubscribeReply {
                session_id: SESSION_ID,
                index: *index,
                event: initial_event(),
            }
            .encode()
            .ok()
        }
        ProxyMessage::Disconnect { .. } => {
            counters.disconnects.fetch_add(1, Ordering::Relaxed);
            None
        }
        _ => None,
    }
}

impl MockProxy {
    /// Start a proxy listening at `dir/clkmgr`.
    pub fn spawn(dir: &Path, behavior: ProxyBehavior) -> MockProxy {
        let path = dir.join("clkmgr");
        let sock = UnixDatagram::bind(&path).unwrap();
        sock.set_read_timeout(Some(Duration::from_millis(20))).unwrap();
        let sock = Arc::new(sock);
        let client = Arc::new(Mutex::new(None));
        let counters = Arc::new(Counters::default());
        let answering = Arc::new(AtomicBool::new(behavior != ProxyBehavior::Silent));
        let stop = Arc::new(AtomicBool::new(false));

        let (t_sock, t_client, t_counters, t_answering, t_stop) = (
            sock.clone(),
            client.clone(),
            counters.clone(),
            answering.clone(),
            stop.clone(),
        );
        let handle = std::thread::spawn(move || {
            let mut buf = [0u8; 2048];
            while !t_stop.load(Ordering::Relaxed) {
                let Ok((n, from)) = t_sock.recv_from(&mut buf) else {
                    continue;
                };
                let Ok(msg) = ProxyMessage::decode(&buf[..n]) else {
                    continue;
                };
                let Some(from) = from.as_pathname().map(Path::to_path_buf) else {
                    continue;
                };
                *t_client.lock().unwrap() = Some(from.clone());
                if !t_answering.load(Ordering::Relaxed) {
                    continue;
                }
                if let Some(reply) = reply_for(&msg, behavior, &t_counters) {
                    let _ = t_sock.send_to(&reply, &from);
                }
            }
        });
        MockProxy {
            path,
            sock,
            client,
            counters,
            answering,
            stop,
            handle: Some(handle),
        }
    }

    /// Push a notification to the last client seen.
    pub fn notify(&self, index: usize, event: ProxyEvent) {
        let client = self.client.lock().unwrap().clone().unwrap();
        let bytes = ProxyMessage::Notify {
            session_id: SESSION_ID,
            index,
            event,
        }
        .encode()
        .unwrap();
        self.sock.send_to(&bytes, client).unwrap();
    }

    /// Stop answering requests.
    pub fn go_silent(&self) {
        self.answering.store(false, Ordering::Relaxed);
    }

    /// Connect requests answered or refused so far, heartbeats included.
    pub fn connects(&self) -> usize {
        self.counters.connects.load(Ordering::Relaxed)
    }

    /// Subscribe requests seen so far.
    pub fn subscribes(&self) -> usize {
        self.counters.subscribes.load(Ordering::Relaxed)
    }

    /// Disconnect messages seen so far.
    pub fn disconnects(&self) -> usize {
        self.counters.disconnects.load(Ordering::Relaxed)
    }
}

impl Drop for MockProxy {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// A manager bound inside `dir` and aimed at `proxy`, with short timeouts.
pub fn manager_for(dir: &Path, proxy: &MockProxy) -> ClockManager {
    ClockManager::builder()
        .proxy_address(&proxy.path)
        .client_address(dir.join("client"))
        .connect_timeout(Duration::from_millis(300))
        .subscribe_timeout(Duration::from_millis(300))
        .build()
}

/// Poll `cond` for up to a second.
pub fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    cond()
}
