// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Request payload construction by action and management ID.
//!
//! SET and COMMAND requests for IDs with a dataField need a payload. A
//! [`Builder`] holds one closure per `(action, id)` that produces it on demand,
//! so a caller can prepare payloads once and send them by ID later. GET requests
//! and IDs without data never need a closure.

use std::collections::HashMap;

use log::debug;
use ptp_proto::{Action, Message, MngId, MngTlv, MsgParams};

/// What a build callback is asked to produce.
#[derive(Clone, Copy, Debug)]
pub struct BuildContext<'a> {
    /// Action being built.
    pub action: Action,
    /// Management ID being built.
    pub id: MngId,
    /// Header parameters of the message.
    pub params: &'a MsgParams,
}

/// Callback producing a request payload. `None` aborts the build.
pub type BuildFn = Box<dyn FnMut(&BuildContext<'_>) -> Option<MngTlv>>;

/// `(action, id)` to payload callback table.
#[derive(Default)]
pub struct Builder {
    callbacks: HashMap<(Action, MngId), BuildFn>,
}

impl std::fmt::Debug for Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("callbacks", &self.callbacks.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Builder {
    /// Create an empty table.
    pub fn new() -> Self {
        Builder::default()
    }

    /// Register the payload callback for `(action, id)`, replacing any earlier one.
    pub fn register<F>(&mut self, action: Action, id: MngId, f: F)
    where
        F: FnMut(&BuildContext<'_>) -> Option<MngTlv> + 'static,
    {
        self.callbacks.insert((action, id), Box::new(f));
    }

    /// Remove the callback for `(action, id)`. Returns whether one was registered.
    pub fn unregister(&mut self, action: Action, id: MngId) -> bool {
        self.callbacks.remove(&(action, id)).is_some()
    }

    /// Set `action` and `id` on `msg`, building the payload if one is needed.
    ///
    /// Returns false, leaving `msg` unmodified, when a payload is needed and no
    /// callback produced one, or when the message rejects the action.
    pub fn build_tlv(&mut self, msg: &mut Message, action: Action, id: MngId) -> bool {
        if action == Action::Get || Message::is_empty(id) {
            return msg.set_action(action, id);
        }
        let Some(callback) = self.callbacks.get_mut(&(action, id)) else {
            debug!("no builder for {} {}", action, id);
            return false;
        };
        let ctx = BuildContext {
            action,
            id,
            params: msg.params(),
        };
        match callback(&ctx) {
            Some(tlv) => msg.set_action_with(action, id, tlv),
            None => {
                debug!("builder for {} {} declined", action, id);
                false
            }
        }
    }
}
