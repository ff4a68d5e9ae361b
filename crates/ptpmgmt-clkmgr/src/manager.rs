// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Clock manager client session.
//!
//! A [`ClockManager`] connects to the clock manager proxy, learns the time
//! bases it offers, subscribes to clock events and waits for them.
//!
//! # Liveness
//!
//! The proxy is considered alive while notifications keep arriving. After
//! `liveness_timeout` without one, [`ClockManager::status_wait`] re-sends a
//! CONNECT as a heartbeat. If that is not answered within another
//! `liveness_timeout` the connection is marked down and the wait returns
//! [`StatusWaitResult::LostConnection`].
//!
//! # Examples
//!
//! ```no_run
//! use clkmgr_client::{ClockManager, ClockSyncData, ClockSyncSubscription, StatusWaitResult};
//!
//! # fn main() -> Result<(), clkmgr_client::ClkMgrError> {
//! let mut mgr = ClockManager::builder().proxy_address("/var/run/clkmgr").build();
//! mgr.connect()?;
//! let mut data = ClockSyncData::new();
//! mgr.subscribe(&ClockSyncSubscription::new(), 1, &mut data)?;
//! if mgr.status_wait(10, 1, &mut data) == StatusWaitResult::EventDetected {
//!     println!("offset {}", data.ptp().clock_offset());
//! }
//! mgr.disconnect();
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use log::{debug, info, warn};

use crate::error::{ClkMgrError, ProxyProtocolError};
use crate::event::ClockSyncData;
use crate::proxy::{ProxyMessage, ProxyTransport, INVALID_SESSION_ID, MSG_CONNECT};
use crate::state::TimeBaseState;
use crate::subscription::ClockSyncSubscription;
use crate::timebase::TimeBaseConfigurations;

/// Default proxy socket path.
pub const DEFAULT_PROXY_ADDRESS: &str = "/var/run/clkmgr";

/// Outcome of [`ClockManager::status_wait`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(i8)]
pub enum StatusWaitResult {
    /// The proxy stopped answering, or the client was never connected.
    LostConnection = -1,
    /// Timeout without a new event. The output data is left untouched.
    NoEventDetected = 0,
    /// A subscribed event happened. The output data holds the new state.
    EventDetected = 1,
    /// Unknown or unsubscribed time base, or a timeout below -1.
    InvalidArgument = -2,
}

impl StatusWaitResult {
    /// True for results that should end a wait loop.
    pub fn is_fatal(self) -> bool {
        matches!(
            self,
            StatusWaitResult::LostConnection | StatusWaitResult::InvalidArgument
        )
    }

    /// Numeric code.
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Builder for configuring a [`ClockManager`].
#[derive(Clone, Debug)]
pub struct ClockManagerBuilder {
    proxy_address: PathBuf,
    client_address: Option<PathBuf>,
    connect_timeout: Duration,
    subscribe_timeout: Duration,
    liveness_timeout: Duration,
    poll_interval: Duration,
}

impl Default for ClockManagerBuilder {
    fn default() -> Self {
        ClockManagerBuilder {
            proxy_address: PathBuf::from(DEFAULT_PROXY_ADDRESS),
            client_address: None,
            connect_timeout: Duration::from_secs(5),
            subscribe_timeout: Duration::from_secs(5),
            liveness_timeout: Duration::from_millis(200),
            poll_interval: Duration::from_millis(10),
        }
    }
}

impl ClockManagerBuilder {
    /// Proxy socket path.
    pub fn proxy_address(mut self, path: impl AsRef<Path>) -> Self {
        self.proxy_address = path.as_ref().to_path_buf();
        self
    }

    /// Client socket path. Defaults to a per-process path like the
    /// management client uses, with prefix `clkmgr`.
    pub fn client_address(mut self, path: impl AsRef<Path>) -> Self {
        self.client_address = Some(path.as_ref().to_path_buf());
        self
    }

    /// How long to wait for the connect reply.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// How long to wait for a subscribe reply.
    pub fn subscribe_timeout(mut self, timeout: Duration) -> Self {
        self.subscribe_timeout = timeout;
        self
    }

    /// Silence after which the proxy is probed, and how long the probe waits.
    pub fn liveness_timeout(mut self, timeout: Duration) -> Self {
        self.liveness_timeout = timeout;
        self
    }

    /// Sleep between iterations of a status wait.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Create the manager. Does not connect.
    pub fn build(self) -> ClockManager {
        let client_address = self
            .client_address
            .unwrap_or_else(|| ptp_client::sock::default_address_for("clkmgr"));
        ClockManager {
            proxy_address: self.proxy_address,
            client_address,
            connect_timeout: self.connect_timeout,
            subscribe_timeout: self.subscribe_timeout,
            liveness_timeout: self.liveness_timeout,
            poll_interval: self.poll_interval,
            transport: None,
            session_id: INVALID_SESSION_ID,
            time_bases: TimeBaseConfigurations::default(),
            states: HashMap::new(),
            last_connect: None,
        }
    }
}

/// Client session with the clock manager proxy.
#[derive(Debug)]
pub struct ClockManager {
    proxy_address: PathBuf,
    client_address: PathBuf,
    connect_timeout: Duration,
    subscribe_timeout: Duration,
    liveness_timeout: Duration,
    poll_interval: Duration,
    transport: Option<ProxyTransport>,
    session_id: u16,
    time_bases: TimeBaseConfigurations,
    states: HashMap<usize, TimeBaseState>,
    last_connect: Option<Instant>,
}

fn now_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

impl ClockManager {
    /// Create a builder with default settings.
    pub fn builder() -> ClockManagerBuilder {
        ClockManagerBuilder::default()
    }

    /// Whether a session with the proxy is up.
    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// Session ID assigned by the proxy, `0xffff` when not connected.
    pub fn session_id(&self) -> u16 {
        self.session_id
    }

    /// Client socket path.
    pub fn client_address(&self) -> &Path {
        &self.client_address
    }

    /// Time bases reported by the proxy on connect.
    pub fn time_base_configs(&self) -> &TimeBaseConfigurations {
        &self.time_bases
    }

    fn connect_request(&self) -> ProxyMessage {
        ProxyMessage::Connect {
            session_id: self.session_id,
            client_id: self.client_address.to_string_lossy().into_owned(),
        }
    }

    fn send(&self, msg: &ProxyMessage) -> Result<(), ClkMgrError> {
        let transport = self.transport.as_ref().ok_or(ClkMgrError::NotConnected)?;
        transport.send(msg)?;
        Ok(())
    }

    /// Receive until `pick` returns a value or `timeout` runs out.
    ///
    /// Malformed messages are skipped. A refused request ends the wait with
    /// `Protocol(Nack)`.
    fn wait_for<T>(
        &mut self,
        timeout: Duration,
        mut pick: impl FnMut(&mut Self, ProxyMessage) -> Option<T>,
    ) -> Result<Option<T>, ClkMgrError> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let transport = self.transport.as_ref().ok_or(ClkMgrError::NotConnected)?;
            match transport.recv_timeout(remaining) {
                Ok(Some(msg)) => {
                    if let Some(v) = pick(self, msg) {
                        return Ok(Some(v));
                    }
                }
                Ok(None) => {}
                Err(ClkMgrError::Protocol(e @ ProxyProtocolError::Nack(_))) => {
                    return Err(e.into())
                }
                Err(ClkMgrError::Protocol(e)) => warn!("ignoring proxy message: {e}"),
                Err(e) => return Err(e),
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
        }
    }

    /// Apply a message that is not the reply being waited for.
    fn handle_unsolicited(&mut self, msg: ProxyMessage) {
        match msg {
            ProxyMessage::Notify { index, event, .. } => match self.states.get_mut(&index) {
                Some(state) if state.is_subscribed() => state.apply(&event, now_ns()),
                _ => debug!("notify for unsubscribed time base {index}"),
            },
            ProxyMessage::ConnectReply { .. } => self.last_connect = Some(Instant::now()),
            other => debug!("ignoring proxy message {}", other.msg_id()),
        }
    }

    /// Connect to the proxy and fetch the time base table.
    ///
    /// Does nothing if already connected.
    pub fn connect(&mut self) -> Result<(), ClkMgrError> {
        if self.is_connected() {
            debug!("already connected, session {}", self.session_id);
            return Ok(());
        }
        self.transport = Some(ProxyTransport::open(
            &self.client_address,
            &self.proxy_address,
        )?);
        self.session_id = INVALID_SESSION_ID;
        let result = self.send(&self.connect_request()).and_then(|()| {
            self.wait_for(self.connect_timeout, |mgr, msg| match msg {
                ProxyMessage::ConnectReply {
                    session_id,
                    time_bases,
                } => Some((session_id, time_bases)),
                other => {
                    mgr.handle_unsolicited(other);
                    None
                }
            })
        });
        match result {
            Ok(Some((session_id, time_bases))) => {
                self.session_id = session_id;
                self.time_bases = TimeBaseConfigurations::from_records(time_bases);
                self.last_connect = Some(Instant::now());
                info!(
                    "connected to {} as session {}, {} time base(s)",
                    self.proxy_address.display(),
                    session_id,
                    self.time_bases.len()
                );
                Ok(())
            }
            Ok(None) => {
                self.transport = None;
                Err(ClkMgrError::ConnectTimeout)
            }
            Err(e) => {
                self.transport = None;
                Err(e)
            }
        }
    }

    /// Subscribe to time base `index` and fill `out` with its current state.
    pub fn subscribe(
        &mut self,
        subscription: &ClockSyncSubscription,
        index: usize,
        out: &mut ClockSyncData,
    ) -> Result<(), ClkMgrError> {
        if !self.is_connected() {
            return Err(ClkMgrError::NotConnected);
        }
        let record = self
            .time_bases
            .record(index)
            .ok_or(ClkMgrError::InvalidTimeBase(index))?;
        let mut state = TimeBaseState::new(
            *subscription,
            record.have_ptp(),
            record.have_sys_clock(),
        );

        // Any earlier subscription on `index` stays in place until the
        // proxy accepts the new one.
        let request = ProxyMessage::Subscribe {
            session_id: self.session_id,
            index,
            subscription: *subscription,
        };
        let result = self.send(&request).and_then(|()| {
            self.wait_for(self.subscribe_timeout, |mgr, msg| match msg {
                ProxyMessage::SubscribeReply { index: i, event, .. } if i == index => Some(event),
                other => {
                    mgr.handle_unsolicited(other);
                    None
                }
            })
        });
        let event = result?.ok_or(ClkMgrError::SubscribeTimeout)?;
        state.apply(&event, now_ns());
        state.set_subscribed(true);
        *out = state.snapshot_data();
        self.states.insert(index, state);
        debug!("subscribed to time base {index}");
        Ok(())
    }

    /// [`subscribe`](Self::subscribe) by time base name.
    pub fn subscribe_by_name(
        &mut self,
        subscription: &ClockSyncSubscription,
        name: &str,
        out: &mut ClockSyncData,
    ) -> Result<(), ClkMgrError> {
        let index = self
            .time_bases
            .name_to_index(name)
            .ok_or_else(|| ClkMgrError::UnknownTimeBase(name.to_string()))?;
        self.subscribe(subscription, index, out)
    }

    /// Drop the transport after the proxy stopped answering.
    fn mark_lost(&mut self) {
        warn!("lost connection to {}", self.proxy_address.display());
        self.transport = None;
        self.session_id = INVALID_SESSION_ID;
        self.states.clear();
        self.last_connect = None;
    }

    fn is_recent(t: Option<Instant>, window: Duration) -> bool {
        t.is_some_and(|t| t.elapsed() < window)
    }

    /// Whether the proxy is alive, probing it with a CONNECT if it has been
    /// quiet for too long.
    fn check_liveness(&mut self, index: usize) -> bool {
        let last_notification = self
            .states
            .get(&index)
            .and_then(TimeBaseState::last_notification);
        if Self::is_recent(last_notification, self.liveness_timeout)
            || Self::is_recent(self.last_connect, self.liveness_timeout)
        {
            return true;
        }
        debug!("no notification for {:?}, probing proxy", self.liveness_timeout);
        if let Err(e) = self.send(&self.connect_request()) {
            warn!("heartbeat send failed: {e}");
            return false;
        }
        match self.wait_for(self.liveness_timeout, |mgr, msg| match msg {
            ProxyMessage::ConnectReply { .. } => Some(()),
            other => {
                mgr.handle_unsolicited(other);
                None
            }
        }) {
            Ok(Some(())) => {
                self.last_connect = Some(Instant::now());
                true
            }
            Ok(None) => false,
            Err(ClkMgrError::Protocol(ProxyProtocolError::Nack(MSG_CONNECT))) => {
                warn!("proxy refused heartbeat");
                false
            }
            Err(e) => {
                warn!("heartbeat failed: {e}");
                false
            }
        }
    }

    /// Wait for a subscribed event on time base `index`.
    ///
    /// `timeout_secs` is -1 to wait forever, 0 to check once without
    /// blocking, or a number of seconds. On [`StatusWaitResult::EventDetected`] `out` holds the new
    /// state; otherwise it is left as it was.
    pub fn status_wait(
        &mut self,
        timeout_secs: i32,
        index: usize,
        out: &mut ClockSyncData,
    ) -> StatusWaitResult {
        if !self.is_connected() {
            return StatusWaitResult::LostConnection;
        }
        if timeout_secs < -1 {
            warn!("{}", ClkMgrError::InvalidTimeout(timeout_secs));
            return StatusWaitResult::InvalidArgument;
        }
        if !self.states.get(&index).is_some_and(|s| s.is_subscribed()) {
            warn!("time base {index} is not subscribed");
            return StatusWaitResult::InvalidArgument;
        }
        let deadline = u64::try_from(timeout_secs)
            .ok()
            .map(|secs| Instant::now() + Duration::from_secs(secs));

        loop {
            let pending = match self.transport.as_ref().map(ProxyTransport::drain) {
                Some(Ok(msgs)) => msgs,
                Some(Err(e)) => {
                    warn!("proxy receive failed: {e}");
                    self.mark_lost();
                    return StatusWaitResult::LostConnection;
                }
                None => return StatusWaitResult::LostConnection,
            };
            for msg in pending {
                self.handle_unsolicited(msg);
            }

            if let Some(state) = self.states.get_mut(&index) {
                if state.is_event_changed() {
                    *out = state.snapshot_data();
                    return StatusWaitResult::EventDetected;
                }
            }

            // A zero timeout never blocks, so it skips the heartbeat probe.
            if timeout_secs != 0 && !self.check_liveness(index) {
                self.mark_lost();
                return StatusWaitResult::LostConnection;
            }

            let now = Instant::now();
            match deadline {
                Some(d) if now >= d => return StatusWaitResult::NoEventDetected,
                Some(d) => std::thread::sleep(self.poll_interval.min(d - now)),
                None => std::thread::sleep(self.poll_interval),
            }
        }
    }

    /// [`status_wait`](Self::status_wait) by time base name. An unknown name
    /// gives [`StatusWaitResult::InvalidArgument`].
    pub fn status_wait_by_name(
        &mut self,
        timeout_secs: i32,
        name: &str,
        out: &mut ClockSyncData,
    ) -> StatusWaitResult {
        match self.time_bases.name_to_index(name) {
            Some(index) => self.status_wait(timeout_secs, index, out),
            None => {
                warn!("{}", ClkMgrError::UnknownTimeBase(name.to_string()));
                StatusWaitResult::InvalidArgument
            }
        }
    }

    /// End the session. Safe to call more than once.
    pub fn disconnect(&mut self) {
        if let Some(transport) = self.transport.take() {
            let msg = ProxyMessage::Disconnect {
                session_id: self.session_id,
            };
            match transport.send(&msg) {
                Ok(()) => info!("disconnected session {}", self.session_id),
                Err(e) => warn!("disconnect: {e}"),
            }
        }
        self.session_id = INVALID_SESSION_ID;
        self.states.clear();
        self.last_connect = None;
    }
}

impl Drop for ClockManager {
    fn drop(&mut self) {
        self.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(StatusWaitResult::LostConnection.code(), -1);
        assert_eq!(StatusWaitResult::NoEventDetected.code(), 0);
        assert_eq!(StatusWaitResult::EventDetected.code(), 1);
        assert_eq!(StatusWaitResult::InvalidArgument.code(), -2);
        assert!(StatusWaitResult::LostConnection.is_fatal());
        assert!(StatusWaitResult::InvalidArgument.is_fatal());
        assert!(!StatusWaitResult::NoEventDetected.is_fatal());
        assert!(!StatusWaitResult::EventDetected.is_fatal());
    }

    #[test]
    fn test_builder_defaults() {
        let mgr = ClockManager::builder().build();
        assert_eq!(mgr.proxy_address, Path::new(DEFAULT_PROXY_ADDRESS));
        assert_eq!(mgr.connect_timeout, Duration::from_secs(5));
        assert_eq!(mgr.liveness_timeout, Duration::from_millis(200));
        assert_eq!(mgr.poll_interval, Duration::from_millis(10));
        assert!(mgr
            .client_address()
            .to_string_lossy()
            .contains(&format!("clkmgr.{}", std::process::id())));
        assert!(!mgr.is_connected());
        assert_eq!(mgr.session_id(), INVALID_SESSION_ID);
    }

    #[test]
    fn test_not_connected() {
        let mut mgr = ClockManager::builder().build();
        let mut data = ClockSyncData::new();
        let err = mgr
            .subscribe(&ClockSyncSubscription::new(), 1, &mut data)
            .unwrap_err();
        assert!(matches!(err, ClkMgrError::NotConnected));
        assert_eq!(
            mgr.status_wait(0, 1, &mut data),
            StatusWaitResult::LostConnection
        );
        mgr.disconnect();
        mgr.disconnect();
    }
}
