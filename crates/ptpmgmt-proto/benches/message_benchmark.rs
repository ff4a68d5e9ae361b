// Benchmarks for management message building and parsing.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use ptp_proto::tlv::Priority1;
use ptp_proto::{Action, Buffer, Message, MngId, MngTlv};

fn bench_build_get(c: &mut Criterion) {
    let mut msg = Message::new();
    msg.set_action(Action::Get, MngId::Priority1);
    let mut buf = Buffer::new(1000);
    c.bench_function("Message::build GET", |b| {
        b.iter(|| msg.build(black_box(&mut buf), black_box(1)))
    });
}

fn bench_parse_response(c: &mut Criterion) {
    let mut msg = Message::new();
    let tlv = MngTlv::Priority1(Priority1 { priority1: 147 });
    msg.set_action_with(Action::Set, MngId::Priority1, tlv);
    let mut buf = Buffer::new(1000);
    msg.build(&mut buf, 1).unwrap();
    let mut rsp = buf.as_slice()[..msg.msg_len()].to_vec();
    rsp[46] = Action::Response as u8;
    let mut reply = Message::new();
    c.bench_function("Message::parse RESPONSE", |b| {
        b.iter(|| reply.parse_bytes(black_box(&rsp)))
    });
}

criterion_group!(benches, bench_build_get, bench_parse_response);
criterion_main!(benches);
