// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::time::Instant;

use serde_json::{json, Value};

use pacer::config::{load_config, Config};
use pacer::engine::EngineFactory;
use pacer::errors::ExecutionError;
use pacer::graph::{ComputedSource, FullStream, Input, Join, OutputNode, Summarize, Zip};
use pacer::observability::init_tracing;
use pacer::traits::Work;

const RATES: [f64; 4] = [0.01, 0.02, 0.05, 0.10];
const YEARS: [i64; 3] = [5, 10, 20];
const PRINCIPAL: f64 = 1000.0;

fn number(value: &Value) -> f64 {
    value.as_f64().unwrap_or_default()
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: {} [config.yaml|config.toml]", args[0]);
        std::process::exit(1);
    }

    let config = match args.get(1) {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };

    init_tracing(config.log_level.as_deref());

    println!("🚀 Pacer Parameter Sweep");
    println!("════════════════════════");
    println!("⚙️  Workers: {}", config.workers);
    println!("🛡️  Strict: {}", config.strict);
    println!();

    if let Err(e) = run_sweep(&config).await {
        eprintln!("❌ Sweep failed: {}", e);
        std::process::exit(1);
    }
}

/// Compound growth over every (rate, years) pair, then the mean and each
/// result's share of the total.
async fn run_sweep(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let started = Instant::now();
    let engine = EngineFactory::from_config(config);

    let rates = ComputedSource::new("rates", || Ok(RATES.iter().map(|r| json!(r)).collect()))?;

    let growth = Join::new(
        Work::new("compound", |args| {
            let rate = number(&args[0]);
            let years = args[1].as_i64().unwrap_or_default();
            let principal = number(&args[2]);
            Ok(json!(principal * (1.0 + rate).powi(years as i32)))
        }),
        vec![
            Input::from(rates),
            Input::collection(YEARS),
            Input::scalar(PRINCIPAL),
        ],
    )?;

    let rounded = Zip::new(
        Work::new("round", |args| Ok(json!((number(&args[0]) * 100.0).round() / 100.0))),
        vec![Input::from(growth.clone())],
    )?;

    let mean = Summarize::new(
        Work::new("mean", |args| {
            let values = args[0].as_array().cloned().unwrap_or_default();
            let total: f64 = values.iter().map(number).sum();
            Ok(json!(total / values.len().max(1) as f64))
        })
        .local(),
        Input::from(growth.clone()),
    )?;

    let shares = FullStream::new(
        Work::new("shares", |args| {
            let values = args[0].as_array().cloned().unwrap_or_default();
            let total: f64 = values.iter().map(number).sum();
            Ok(json!(values.iter().map(|v| number(v) / total).collect::<Vec<_>>()))
        }),
        Input::from(growth),
    )?;

    let rounded_out = OutputNode::new(Input::from(rounded));
    let mean_out = OutputNode::new(Input::from(mean));
    let shares_out = OutputNode::new(Input::from(shares));

    let table = collect(&rounded_out, &engine, config.strict).await?;
    let average = collect(&mean_out, &engine, config.strict).await?;
    let fractions = collect(&shares_out, &engine, config.strict).await?;

    println!("📊 Results ({} combinations):", table.len());
    for (i, (value, share)) in table.iter().zip(fractions.iter()).enumerate() {
        let rate = RATES[i / YEARS.len()];
        let years = YEARS[i % YEARS.len()];
        println!(
            "  rate {:>5.2} years {:>2} → {:>10} ({:.1}%)",
            rate,
            years,
            value,
            number(share) * 100.0
        );
    }
    if let Some(average) = average.first() {
        println!("\n📈 Mean: {:.2}", number(average));
    }
    println!("\n⏱️  Total Time: {:?}", started.elapsed());

    Ok(())
}

/// Gather one output, printing any failures that lenient mode left in place.
async fn collect(
    output: &OutputNode,
    engine: &pacer::engine::Engine,
    strict: bool,
) -> Result<Vec<Value>, ExecutionError> {
    let results = output.run(engine, strict).await?;
    Ok(results
        .into_iter()
        .map(|payload| match payload {
            Ok(value) => value,
            Err(failure) => {
                eprintln!("⚠️  {} at position {}: {}", failure.node(), failure.position(), failure);
                Value::Null
            }
        })
        .collect())
}
