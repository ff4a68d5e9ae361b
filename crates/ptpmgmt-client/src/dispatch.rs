// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Reply dispatch by management ID.
//!
//! A [`Dispatcher`] holds at most one handler per [`MngId`]. After a reply is
//! parsed, [`Dispatcher::call_handler`] invokes exactly one of:
//!
//! - the handler registered for the reply's ID, with the decoded TLV;
//! - the "no TLV" fallback, when the reply carried no dataField;
//! - the "no handler" fallback, when data arrived for an ID without a handler.

use std::collections::HashMap;

use log::debug;
use ptp_proto::{Message, MngId, MngTlv};

/// Handler for a decoded reply TLV.
pub type TlvHandler = Box<dyn FnMut(&Message, &MngTlv, MngId)>;

/// Fallback for replies without TLV data.
pub type NoTlvHandler = Box<dyn FnMut(&Message)>;

/// Fallback for TLV data with no registered handler.
pub type NoHandlerCallback = Box<dyn FnMut(&Message, MngId)>;

/// Which handler ran for a reply.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DispatchOutcome {
    /// The handler registered for this ID ran.
    Handled(MngId),
    /// The reply had no data; the no-TLV fallback ran.
    NoTlv,
    /// The reply had data but no handler; the no-handler fallback ran.
    NoHandler(MngId),
}

/// Management ID to handler table.
pub struct Dispatcher {
    handlers: HashMap<MngId, TlvHandler>,
    no_tlv: NoTlvHandler,
    no_tlv_callback: NoHandlerCallback,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Dispatcher {
            handlers: HashMap::new(),
            no_tlv: Box::new(|msg| debug!("reply for {} carries no data", msg.tlv_id())),
            no_tlv_callback: Box::new(|_, id| debug!("no handler for {}", id.name())),
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Create an empty dispatcher with logging fallbacks.
    pub fn new() -> Self {
        Dispatcher::default()
    }

    /// Register the handler for `id`, replacing any earlier one.
    pub fn register<F>(&mut self, id: MngId, handler: F)
    where
        F: FnMut(&Message, &MngTlv, MngId) + 'static,
    {
        self.handlers.insert(id, Box::new(handler));
    }

    /// Remove the handler for `id`. Returns whether one was registered.
    pub fn unregister(&mut self, id: MngId) -> bool {
        self.handlers.remove(&id).is_some()
    }

    /// Whether a handler is registered for `id`.
    pub fn is_registered(&self, id: MngId) -> bool {
        self.handlers.contains_key(&id)
    }

    /// Replace the fallback for replies without data.
    pub fn set_no_tlv<F>(&mut self, handler: F)
    where
        F: FnMut(&Message) + 'static,
    {
        self.no_tlv = Box::new(handler);
    }

    /// Replace the fallback for data without a handler.
    pub fn set_no_tlv_callback<F>(&mut self, handler: F)
    where
        F: FnMut(&Message, MngId) + 'static,
    {
        self.no_tlv_callback = Box::new(handler);
    }

    /// Dispatch the last parsed reply held by `msg`.
    pub fn call_handler(&mut self, msg: &Message) -> DispatchOutcome {
        self.call_handler_with(msg, msg.tlv_id(), msg.data())
    }

    /// Dispatch an explicit ID and payload.
    pub fn call_handler_with(
        &mut self,
        msg: &Message,
        id: MngId,
        tlv: Option<&MngTlv>,
    ) -> DispatchOutcome {
        let Some(tlv) = tlv else {
            (self.no_tlv)(msg);
            return DispatchOutcome::NoTlv;
        };
        match self.handlers.get_mut(&id) {
            Some(handler) => {
                debug!("dispatching {}", id);
                handler(msg, tlv, id);
                DispatchOutcome::Handled(id)
            }
            None => {
                (self.no_tlv_callback)(msg, id);
                DispatchOutcome::NoHandler(id)
            }
        }
    }
}
