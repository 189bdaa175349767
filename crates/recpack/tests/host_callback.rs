#![cfg(feature = "call")]

use bytes::BytesMut;
use recpack::call::{CallError, Endpoint, Envelope, HandlerError, Host};
use recpack::codec::{record, Record, Value};
use recpack::layout::{describe_layout, Layout};

/// Increments every numeric field and overwrites byte blocks with `#`.
fn bump(_layout: &Layout, record: Record) -> Result<Record, HandlerError> {
    Ok(record
        .into_iter()
        .map(|value| match value {
            Value::Int16(v) => Value::Int16(v + 1),
            Value::Int32(v) => Value::Int32(v + 1),
            Value::Int64(v) => Value::Int64(v + 1),
            Value::Float32(v) => Value::Float32(v + 1.0),
            Value::Float64(v) => Value::Float64(v + 1.0),
            Value::Bytes(b) => Value::from(vec![b'#'; b.len()]),
        })
        .collect())
}

#[test]
fn host_receives_modified_struct() {
    let mut host = Host::new();
    host.register("test_struct", bump);

    let layout = describe_layout("@if8sdh2i0q").unwrap();
    let input = record![1i32, 2.25f32, b"aaaaaaaa", 3.5f64, 6i16, 0i32, 1i32];
    let output = host.call("test_struct", &layout, &input).unwrap();

    assert_eq!(
        output,
        record![2i32, 3.25f32, b"########", 4.5f64, 7i16, 1i32, 2i32]
    );
}

#[test]
fn callee_sees_the_callers_layout() {
    let mut host = Host::new();
    host.register("inspect", |layout: &Layout, record: Record| {
        if layout.spec() != "<ii4si" || layout.size() != 16 {
            return Err(HandlerError::new(format!("unexpected layout {layout}")));
        }
        Ok(record)
    });

    let layout = describe_layout("<ii4si").unwrap();
    let rec = record![1i32, 2i32, b"bcde", 3i32];
    assert_eq!(host.call("inspect", &layout, &rec).unwrap(), rec);
}

#[test]
fn handler_failure_reaches_the_host() {
    let mut host = Host::new();
    host.register("always_fails", |_: &Layout, _: Record| {
        Err::<Record, _>(HandlerError::new("callback rejected record"))
    });

    let layout = describe_layout("i").unwrap();
    let err = host
        .call("always_fails", &layout, &record![1i32])
        .unwrap_err();
    assert!(matches!(err, CallError::Handler { ref name, .. } if name == "always_fails"));
    recpack::call::report(&err);
}

#[test]
fn endpoint_serves_wire_envelopes() {
    let mut endpoint = Endpoint::new();
    endpoint.register("test_struct", bump);

    let layout = describe_layout("ii4si").unwrap();
    let payload = recpack::codec::encode(&layout, &record![1i32, 2i32, b"bcde", 3i32]).unwrap();
    let mut wire = BytesMut::new();
    Envelope::new(layout.spec(), payload)
        .encode(&mut wire)
        .unwrap();

    let response = endpoint.dispatch_wire("test_struct", wire.freeze()).unwrap();
    let response = Envelope::decode(response).unwrap();
    assert_eq!(response.layout, "ii4si");

    let rec = recpack::codec::decode(&layout, &response.payload).unwrap();
    assert_eq!(rec, record![2i32, 3i32, b"####", 4i32]);

    // Layout string parsed once across calls.
    assert_eq!(endpoint.layouts().len(), 1);
}
