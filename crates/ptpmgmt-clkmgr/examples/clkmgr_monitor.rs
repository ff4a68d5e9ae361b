// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Subscribe to clock manager time bases and print every event until a
//! signal arrives.
//!
//! Run with:
//! ```sh
//! cargo run -p ptpmgmt-clkmgr --example clkmgr_monitor -- -a -t 10
//! ```

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clkmgr_client::subscription::{PtpClockSubscription, SysClockSubscription};
use clkmgr_client::{
    install_signal_handlers, CancellationToken, ClockManager, ClockSyncData,
    ClockSyncSubscription, EventMask, StatusWaitResult, TimeBaseConfigurations,
};
use env_logger::Env;

const USAGE: &str = "\
usage: clkmgr_monitor [options]
  -a          subscribe to all time bases
  -p          choose time base indices interactively
  -s <mask>   PTP event mask (default 0xf)
  -c <mask>   composite event mask (default 0x7)
  -n <mask>   chrony event mask (default 0x1)
  -l <ns>     PTP offset threshold (default 100000)
  -m <ns>     chrony offset threshold (default 100000)
  -i <secs>   idle time between waits (default 1)
  -t <secs>   status wait timeout, -1 waits forever (default 10)
  -x <path>   proxy socket path
  -h          show this help";

struct Options {
    all: bool,
    interactive: bool,
    event_mask: u32,
    composite_mask: u32,
    chrony_mask: u32,
    ptp_threshold: u32,
    chrony_threshold: u32,
    idle_secs: u64,
    timeout: i32,
    proxy: Option<String>,
}

fn parse_num<T: TryFrom<i64>>(flag: &str, value: Option<String>) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("{flag} needs a value"))?;
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => value.parse::<i64>(),
    };
    parsed
        .ok()
        .and_then(|v| T::try_from(v).ok())
        .ok_or_else(|| format!("invalid value '{value}' for {flag}"))
}

fn parse_args() -> Result<Options, String> {
    let mut opts = Options {
        all: false,
        interactive: false,
        event_mask: EventMask::ALL.bits(),
        composite_mask: EventMask::COMPOSITE_ALLOWED.bits(),
        chrony_mask: EventMask::GM_OFFSET.bits(),
        ptp_threshold: 100_000,
        chrony_threshold: 100_000,
        idle_secs: 1,
        timeout: 10,
        proxy: None,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-a" => opts.all = true,
            "-p" => opts.interactive = true,
            "-s" => opts.event_mask = parse_num("-s", args.next())?,
            "-c" => opts.composite_mask = parse_num("-c", args.next())?,
            "-n" => opts.chrony_mask = parse_num("-n", args.next())?,
            "-l" => opts.ptp_threshold = parse_num("-l", args.next())?,
            "-m" => opts.chrony_threshold = parse_num("-m", args.next())?,
            "-i" => opts.idle_secs = parse_num("-i", args.next())?,
            "-t" => opts.timeout = parse_num("-t", args.next())?,
            "-x" => opts.proxy = Some(args.next().ok_or("-x needs a path")?),
            "-h" => return Err(USAGE.to_string()),
            other => return Err(format!("unknown option {other}\n{USAGE}")),
        }
    }
    if opts.timeout < -1 {
        return Err(format!("invalid timeout {}", opts.timeout));
    }
    Ok(opts)
}

fn subscription(opts: &Options) -> ClockSyncSubscription {
    let mut ptp = PtpClockSubscription::default();
    ptp.set_event_mask(EventMask::from_bits_truncate(opts.event_mask));
    ptp.set_composite_event_mask(EventMask::from_bits_truncate(opts.composite_mask));
    ptp.set_clock_offset_threshold(opts.ptp_threshold);
    let mut sys = SysClockSubscription::default();
    sys.set_event_mask(EventMask::from_bits_truncate(opts.chrony_mask));
    sys.set_clock_offset_threshold(opts.chrony_threshold);
    let mut sub = ClockSyncSubscription::new();
    sub.set_ptp_subscription(ptp);
    sub.set_sys_subscription(sys);
    sub
}

fn print_time_bases(cfg: &TimeBaseConfigurations) {
    println!("[clkmgr] List of available clock:");
    for tb in cfg {
        println!("TimeBaseIndex: {}", tb.index);
        println!("timeBaseName: {}", tb.name);
        if let Some(ptp) = tb.ptp() {
            println!("interfaceName: {}", ptp.interface_name);
            println!("transportSpecific: {}", ptp.transport_specific);
            println!("domainNumber: {}", ptp.domain_number);
        }
        println!("have sys clock: {}\n", tb.have_sys_clock());
    }
}

fn read_indices(cfg: &TimeBaseConfigurations) -> io::Result<Vec<usize>> {
    print!("Enter the time base indices to subscribe (comma-separated, default is 1): ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let mut indices = Vec::new();
    for part in line.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.parse::<usize>() {
            Ok(i) if cfg.is_index_present(i) => indices.push(i),
            _ => println!("Invalid time base index: {part}"),
        }
    }
    if indices.is_empty() {
        indices.push(1);
    }
    Ok(indices)
}

fn print_data(index: usize, data: &ClockSyncData) {
    println!("[clkmgr][time base {index}] event table:");
    if data.have_ptp() {
        let p = data.ptp();
        println!(
            "| ptp offset in range | {:>5} | {:>4} |",
            p.is_offset_in_range(),
            p.offset_in_range_event_count()
        );
        println!(
            "| synced to gm        | {:>5} | {:>4} |",
            p.is_synced_with_gm(),
            p.synced_with_gm_event_count()
        );
        println!(
            "| as capable          | {:>5} | {:>4} |",
            p.is_as_capable(),
            p.as_capable_event_count()
        );
        println!(
            "| gm changed          | {:>5} | {:>4} |",
            p.is_gm_changed(),
            p.gm_changed_event_count()
        );
        println!(
            "| composite event     | {:>5} | {:>4} |",
            p.is_composite_event_met(),
            p.composite_event_count()
        );
        println!("| gm identity         | {} |", p.gm_identity_string());
        println!("| ptp clock offset    | {} ns |", p.clock_offset());
        println!("| ptp sync interval   | {} us |", p.sync_interval());
    }
    if data.have_sys() {
        let s = data.sys_clock();
        println!(
            "| chrony offset in range | {:>5} | {:>4} |",
            s.is_offset_in_range(),
            s.offset_in_range_event_count()
        );
        println!("| chrony clock offset | {} ns |", s.clock_offset());
        println!("| chrony reference id | {} |", s.reference_id_string());
        println!("| chrony polling interval | {} us |", s.sync_interval());
    }
    println!();
}

fn idle(token: &CancellationToken, secs: u64) {
    let until = Instant::now() + Duration::from_secs(secs);
    while !token.is_cancelled() && Instant::now() < until {
        std::thread::sleep(Duration::from_millis(100));
    }
}

fn monitor(mgr: &mut ClockManager, opts: &Options, token: &CancellationToken) -> ExitCode {
    if let Err(e) = mgr.connect() {
        eprintln!("[clkmgr] failure in connecting: {e}");
        return ExitCode::from(2);
    }
    println!("[clkmgr] connected, session ID {}", mgr.session_id());
    let cfg = mgr.time_base_configs().clone();
    print_time_bases(&cfg);

    let indices = if opts.all {
        cfg.iter().map(|tb| tb.index).collect()
    } else if opts.interactive {
        match read_indices(&cfg) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("[clkmgr] cannot read indices: {e}");
                return ExitCode::from(2);
            }
        }
    } else {
        vec![1]
    };

    let sub = subscription(opts);
    let mut data: Vec<(usize, ClockSyncData)> = Vec::with_capacity(indices.len());
    for index in indices {
        if !cfg.is_index_present(index) {
            eprintln!("[clkmgr] time base index {index} does not exist");
            return ExitCode::from(2);
        }
        let mut d = ClockSyncData::new();
        if let Err(e) = mgr.subscribe(&sub, index, &mut d) {
            eprintln!("[clkmgr] failure in subscribing to time base {index}: {e}");
            return ExitCode::from(2);
        }
        println!("[clkmgr] subscribed to time base {index}");
        print_data(index, &d);
        data.push((index, d));
    }

    while !token.is_cancelled() {
        for (index, d) in data.iter_mut() {
            match mgr.status_wait(opts.timeout, *index, d) {
                StatusWaitResult::EventDetected => print_data(*index, d),
                StatusWaitResult::NoEventDetected => {
                    println!(
                        "[clkmgr] no event status changes identified in {} seconds",
                        opts.timeout
                    );
                    idle(token, opts.idle_secs);
                }
                StatusWaitResult::LostConnection => {
                    println!("[clkmgr] terminating: lost connection to the proxy");
                    return ExitCode::SUCCESS;
                }
                StatusWaitResult::InvalidArgument => {
                    eprintln!("[clkmgr] terminating: invalid argument");
                    return ExitCode::from(2);
                }
            }
            if token.is_cancelled() {
                break;
            }
        }
    }
    println!("[clkmgr] stopped by signal");
    ExitCode::SUCCESS
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
    let token = CancellationToken::new();
    if let Err(e) = install_signal_handlers(&token) {
        eprintln!("cannot install signal handlers: {e}");
        return ExitCode::from(2);
    }

    let mut builder = ClockManager::builder();
    if let Some(proxy) = &opts.proxy {
        builder = builder.proxy_address(proxy);
    }
    let mut mgr = builder.build();
    let code = monitor(&mut mgr, &opts, &token);
    mgr.disconnect();
    code
}
