// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

mod manifest;

use manifest::ImplGenerator;
use std::env;
use std::path::PathBuf;

fn main() {
    // Initialize tracing for diagnostics
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        return;
    }

    match args[1].as_str() {
        "generate" => {
            if args.len() < 3 {
                eprintln!("Missing manifest path");
                print_help();
                std::process::exit(1);
            }
            if let Err(e) = generate(&args[2], args.get(3)) {
                eprintln!("[ERROR] {:#}", e);
                std::process::exit(1);
            }
        }
        "--help" | "-h" | "help" => {
            print_help();
        }
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_help();
            std::process::exit(1);
        }
    }
}

fn generate(manifest: &str, out_dir: Option<&String>) -> anyhow::Result<()> {
    // Output defaults to target/tycon-gen, override with the third
    // argument or the TYCON_GEN_DIR env var.
    let out_dir = match out_dir {
        Some(dir) => PathBuf::from(dir),
        None => PathBuf::from(
            std::env::var("TYCON_GEN_DIR").unwrap_or_else(|_| "target/tycon-gen".into()),
        ),
    };

    tracing::info!("Initializing implementation generator");
    let generator = ImplGenerator::new(PathBuf::from(manifest), out_dir)?;

    tracing::info!("Starting generation");
    let report = generator.generate()?;

    report.summary();

    Ok(())
}

fn print_help() {
    println!("tycon-gen v0.1");
    println!();
    println!("USAGE:");
    println!("    tycon-gen <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    generate <manifest.yaml> [out_dir]  Emit implementations for every type in the manifest");
    println!("    help                                Print this help message");
    println!();
    println!("EXAMPLES:");
    println!("    tycon-gen generate config/types.yaml");
    println!("    TYCON_GEN_DIR=src/generated tycon-gen generate config/types.yaml");
    println!();
}
