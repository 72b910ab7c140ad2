// Copyright 2025-present Caselex Contributors
// SPDX-License-Identifier: Apache-2.0

mod cli;

use caselex::Engine;
use clap::Parser;
use cli::{Cli, OutputFormat};
use std::process::ExitCode;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let engine = match Engine::open(&cli.dict_file, &cli.postings_file, &cli.metadata_file) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("failed to open index: {err}");
            return ExitCode::FAILURE;
        }
    };

    let results = match engine.search(&cli.query, cli.topk) {
        Ok(results) => results,
        Err(err) => {
            eprintln!("query failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    match cli.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&results).unwrap());
        }
        OutputFormat::Text => {
            let line: Vec<String> = results.iter().map(u32::to_string).collect();
            println!("{}", line.join(" "));
        }
    }

    ExitCode::SUCCESS
}
