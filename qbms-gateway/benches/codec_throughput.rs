//! Benchmarks for request building and response parsing.
//!
//! Run with: `cargo bench --bench codec_throughput`

#![allow(missing_docs, reason = "Benchmark functions are self-documenting")]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use qbms_gateway::{
    Credentials, CreditCard, RequestOptions,
    action::Action,
    builder::{RequestStamp, build_stamped},
    parser::{parse_response, underscore},
};

const CHARGE_RESPONSE: &str = include_str!("../tests/fixtures/charge_wallet_entry.xml");
const GET_RESPONSE: &str = include_str!("../tests/fixtures/get_wallet_entry.xml");
const VOID_RESPONSE: &str = include_str!("../tests/fixtures/void.xml");

fn stamp() -> RequestStamp {
    RequestStamp {
        client_date_time: chrono::Utc::now(),
        trans_request_id: "0123456789abcdef0123456789abcdef".to_owned(),
    }
}

/// Benchmark parsing captured gateway responses
fn bench_parse_response(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_response");

    for (name, action, body) in [
        ("charge", Action::ChargeWalletEntry, CHARGE_RESPONSE),
        ("get", Action::GetWalletEntry, GET_RESPONSE),
        ("void", Action::Void, VOID_RESPONSE),
    ] {
        group.throughput(Throughput::Bytes(body.len() as u64));
        group.bench_with_input(BenchmarkId::new("fixture", name), body, |b, body| {
            b.iter(|| parse_response(black_box(action), black_box(body.as_bytes())));
        });
    }

    group.finish();
}

/// Benchmark a response with many repeated siblings
fn bench_parse_repeated_siblings(c: &mut Criterion) {
    let items: String = (0..200).map(|i| format!("<LineItem>{i}</LineItem>")).collect();
    let body = format!(
        "<QBMSXML><QBMSXMLMsgsRs><CustomerWalletQueryRs statusCode=\"0\">{items}</CustomerWalletQueryRs></QBMSXMLMsgsRs></QBMSXML>"
    );

    c.bench_function("parse_repeated_siblings_200", |b| {
        b.iter(|| parse_response(black_box(Action::GetWalletEntry), black_box(body.as_bytes())));
    });
}

/// Benchmark building request documents
fn bench_build_request(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_request");
    let credentials = Credentials::new("app.example.com", "TGT-1-ticket");
    let stamp = stamp();

    let create = RequestOptions::new()
        .customer_id("3187")
        .credit_card(CreditCard::new("5105105105105100", 9, 2030, "Longbob Longsen"))
        .credit_card_address("1133 Sonora Ct.")
        .credit_card_postal_code("94086");
    let charge = RequestOptions::new()
        .customer_id("3187")
        .wallet_entry_id("102138136671000089895100")
        .amount(100_u32);
    let void = RequestOptions::new().credit_card_trans_id("YY1000045060");

    for (name, action, options) in [
        ("create", Action::CreateWalletEntry, &create),
        ("charge", Action::ChargeWalletEntry, &charge),
        ("void", Action::Void, &void),
    ] {
        group.bench_with_input(BenchmarkId::new("action", name), options, |b, options| {
            b.iter(|| build_stamped(black_box(action), black_box(options), &credentials, &stamp));
        });
    }

    group.finish();
}

/// Benchmark key normalization
fn bench_underscore(c: &mut Criterion) {
    c.bench_function("underscore_wire_names", |b| {
        b.iter(|| {
            for name in ["CreditCardTransID", "AVSStreet", "TxnAuthorizationStamp", "statusCode"] {
                black_box(underscore(black_box(name)));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_parse_response,
    bench_parse_repeated_siblings,
    bench_build_request,
    bench_underscore
);

criterion_main!(benches);
