// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Read the user description of a running ptp4l, then change priority1 twice.
//!
//! Each SET is followed by a GET whose reply is routed through the dispatcher.
//! Also shows the `Binary` helpers and the SUBSCRIBE_EVENTS_NP bitmask.
//!
//! Run with:
//! ```sh
//! cargo run -p ptpmgmt-client --example pmc_priority -- -f /etc/linuxptp/ptp4l.conf
//! ```

use std::process::ExitCode;

use env_logger::Env;
use ptp_client::error::MngError;
use ptp_client::{ConfigFile, Session, DEFAULT_CONFIG_FILE};
use ptp_proto::protocol::Binary;
use ptp_proto::tlv::{events, ClockDescription, Priority1, SubscribeEventsNp};
use ptp_proto::{Action, MngId, MngTlv};

const TIMEOUT_MS: u64 = 500;

struct Options {
    config: String,
    section: Option<String>,
}

fn parse_args() -> Result<Options, String> {
    let mut opts = Options {
        config: DEFAULT_CONFIG_FILE.to_string(),
        section: None,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-f" => opts.config = args.next().ok_or("-f needs a file name")?,
            "-s" => opts.section = Some(args.next().ok_or("-s needs a section name")?),
            "-h" => return Err("usage: pmc_priority [-f config] [-s section]".to_string()),
            other => return Err(format!("unknown option {other}")),
        }
    }
    Ok(opts)
}

fn set_priority1(session: &mut Session, value: u8) -> Result<(), MngError> {
    session
        .builder_mut()
        .register(Action::Set, MngId::Priority1, move |_| {
            Some(MngTlv::Priority1(Priority1 { priority1: value }))
        });
    if let Err(e) = session.build_and_exchange(Action::Set, MngId::Priority1, TIMEOUT_MS) {
        println!("set fails: {e}");
        return Err(e);
    }
    println!("set new priority {value} success");
    session.get(MngId::Priority1, TIMEOUT_MS)?;
    session.dispatch();
    Ok(())
}

fn show_helpers() {
    let mut physical_address = Binary::new();
    for (pos, val) in [0xf1, 0xf2, 0xf3, 0xf4].into_iter().enumerate() {
        physical_address.set_bin(pos, val);
    }
    println!("physicalAddress: {}", physical_address.to_id());
    println!("physicalAddress: {}", physical_address.to_hex());

    let clock = ClockDescription {
        clock_type: 0x800,
        physical_address,
        revision_data: "This is a test".into(),
        ..ClockDescription::default()
    };
    println!(
        "manufacturerIdentity: {}",
        Binary::buf_to_id(&clock.manufacturer_identity)
    );
    println!("revisionData: {}", clock.revision_data.as_str());

    let mut event = SubscribeEventsNp::default();
    event.set_event(events::NOTIFY_TIME_SYNC);
    for (name, id) in [
        ("NOTIFY_TIME_SYNC", events::NOTIFY_TIME_SYNC),
        ("NOTIFY_PORT_STATE", events::NOTIFY_PORT_STATE),
    ] {
        let have = if event.get_event(id) { "have" } else { "not" };
        println!("getEvent({name})={have}");
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let opts = match parse_args() {
        Ok(o) => o,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::from(2);
        }
    };
    println!("Use configuration file {}", opts.config);
    let cfg = match ConfigFile::read(&opts.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("fail reading configuration file: {e}");
            return ExitCode::from(2);
        }
    };
    let mut session = match Session::open(&cfg, opts.section.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("fail init socket: {e}");
            return ExitCode::from(2);
        }
    };

    session
        .dispatcher_mut()
        .register(MngId::Priority1, |_, tlv, id| {
            if let MngTlv::Priority1(p) = tlv {
                println!("Get reply for {id}");
                println!("priority1: {}", p.priority1);
            }
        });
    session
        .dispatcher_mut()
        .register(MngId::UserDescription, |_, tlv, id| {
            if let MngTlv::UserDescription(d) = tlv {
                println!("Get reply for {id}");
                println!("get user desc: {}", d.user_description.as_str());
            }
        });

    match session.get(MngId::UserDescription, TIMEOUT_MS) {
        Ok(_) => {
            session.dispatch();
        }
        Err(MngError::ErrorStatus { .. }) => println!("error message"),
        Err(MngError::Timeout) => {
            println!("timeout");
            return ExitCode::from(2);
        }
        Err(e) => println!("{e}"),
    }

    show_helpers();

    let mut status = ExitCode::SUCCESS;
    for value in [147, 153] {
        if set_priority1(&mut session, value).is_err() {
            status = ExitCode::FAILURE;
        }
    }
    session.close();
    status
}
