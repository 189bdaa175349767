//! Host packs a C-style struct, a registered callback unpacks it, bumps its
//! numeric fields and packs the answer back.
//!
//! Run with:
//!   cargo run --example struct-exchange --features logging -- --log-format json

use clap::Parser;
use recpack::call::{report, HandlerError, Host};
use recpack::codec::{record, Record, Value};
use recpack::layout::{describe_layout, Layout};
use recpack::logging::{init_logging, LogFormat, LogLevel};

// int a; float b; char c[8]; double d; short e; int f[2]; tail padded to int64 alignment.
const TEST_STRUCT: &str = "@if8sdh2i0q";

#[derive(Parser)]
#[command(name = "struct-exchange", about = "Host to callback record exchange demo")]
struct Cli {
    /// Log output format.
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// Minimum log level.
    #[arg(long, value_name = "LEVEL", default_value = "debug")]
    log_level: LogLevel,
}

fn bump(layout: &Layout, record: Record) -> Result<Record, HandlerError> {
    tracing::info!(layout = %layout, size = layout.size(), "callback received record");
    let values = record.into_values();
    let [a, b, _c, d, e, _f0, _f1] = values.as_slice() else {
        return Err(HandlerError::new(format!(
            "expected 7 values, got {}",
            values.len()
        )));
    };

    let int = |v: &Value| v.as_i32().ok_or_else(|| HandlerError::new("expected int32"));
    Ok(record![
        int(a)? + 1,
        b.as_f32().ok_or_else(|| HandlerError::new("expected float32"))? + 1.0,
        b"dfds1234",
        d.as_f64().ok_or_else(|| HandlerError::new("expected float64"))? + 1.0,
        e.as_i16().ok_or_else(|| HandlerError::new("expected int16"))? + 1,
        8i32,
        9i32,
    ])
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    // Plain pack/unpack.
    let small = describe_layout("i3sf")?;
    let packed = recpack::codec::encode(&small, &record![1i32, b"abc", 2.7f32])?;
    tracing::info!(bytes = ?packed, "packed i3sf");
    let unpacked = recpack::codec::decode(&small, &packed)?;
    println!("{}", serde_json::to_string(&unpacked)?);

    // Host to callback round trip.
    let mut host = Host::new();
    host.register("test_struct", bump);
    host.register("always_fails", |_: &Layout, _: Record| {
        Err::<Record, _>(HandlerError::new("callback rejected record"))
    });

    let layout = describe_layout(TEST_STRUCT)?;
    println!("{}", serde_json::to_string(&layout)?);

    let input = record![1i32, 2.2f32, b"aaaaaaaa", 3.45f64, 6i16, 0i32, 1i32];
    let output = host.call("test_struct", &layout, &input)?;
    println!(
        "{}",
        output
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );

    if let Err(err) = host.call("always_fails", &layout, &input) {
        report(&err);
    }

    Ok(())
}
