use anyhow::{anyhow, Context, Error};
use clap::Parser;
use influx_proxy_client::{
    send_point, send_raw, split_lines, FieldValue, Number, Point, ProxyConfig, DEFAULT_ENDPOINT,
};
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    // JSON file with bucket, org and optionally endpoint, takes precedence over the flags below
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, env = "INFLUX_PROXY_BUCKET")]
    bucket: Option<String>,

    #[arg(long, env = "INFLUX_PROXY_ORG")]
    org: Option<String>,

    #[arg(long, env = "INFLUX_PROXY_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    // Send line protocol read from stdin instead of a single point
    #[arg(long, conflicts_with_all = ["measurement", "tag", "field", "timestamp"])]
    stdin: bool,

    #[arg(short, long, required_unless_present = "stdin")]
    measurement: Option<String>,

    // Tag as key=value, may be repeated
    #[arg(short, long, value_parser = parse_key_value)]
    tag: Vec<(String, FieldValue)>,

    // Field as key=value, may be repeated
    #[arg(short, long, value_parser = parse_key_value, required_unless_present = "stdin")]
    field: Vec<(String, FieldValue)>,

    // Defaults to the current time in milliseconds
    #[arg(long)]
    timestamp: Option<String>,
}

fn parse_key_value(arg: &str) -> Result<(String, FieldValue), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), parse_value(value))),
        _ => Err(format!("expected key=value, got {:?}", arg)),
    }
}

fn parse_value(value: &str) -> FieldValue {
    if let Ok(int_value) = value.parse::<i64>() {
        return FieldValue::Number(Number::I64(int_value));
    }
    if let Ok(uint_value) = value.parse::<u64>() {
        return FieldValue::Number(Number::U64(uint_value));
    }
    match value.parse::<f64>() {
        Ok(float_value) if float_value.is_finite() => FieldValue::Number(Number::F64(float_value)),
        _ => FieldValue::String(value.to_string()),
    }
}

fn load_config(args: &Args) -> Result<ProxyConfig, Error> {
    if let Some(path) = &args.config {
        return ProxyConfig::from_json_file(path);
    }

    let bucket = args
        .bucket
        .clone()
        .ok_or_else(|| anyhow!("--bucket or INFLUX_PROXY_BUCKET is required"))?;
    let org = args
        .org
        .clone()
        .ok_or_else(|| anyhow!("--org or INFLUX_PROXY_ORG is required"))?;
    Ok(ProxyConfig::new(bucket, org).with_endpoint(args.endpoint.clone()))
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    tracing::debug!("Writing to {}", config.write_url());

    if args.stdin {
        let mut body = String::new();
        std::io::stdin()
            .read_to_string(&mut body)
            .context("Failed to read line protocol from stdin")?;
        let lines = split_lines(&body);
        send_raw(&config, &lines.join("\n"))?;
        println!("Sent {} lines to {}", lines.len(), config.write_url());
        return Ok(());
    }

    let timestamp = args
        .timestamp
        .unwrap_or_else(|| chrono::offset::Utc::now().timestamp_millis().to_string());
    let point = Point::new(
        args.measurement.unwrap_or_default(),
        args.tag,
        args.field,
        timestamp,
    )?;
    send_point(&config, &point)?;
    println!("Sent {}", point);
    Ok(())
}
