//! archive-ctl — encode record files and inspect binary payloads.

use anyhow::Result;

use archive_core::config::ArchiveConfig;

mod cmd;

fn print_usage() {
    println!("Usage: archive-ctl <command>");
    println!();
    println!("Commands:");
    println!("  encode <record.toml> <out.bin>   Serialize a record file into a payload");
    println!("  dump <file>                      Hex dump a payload");
    println!("  config                           Show the effective configuration");
    println!();
    println!("Environment:");
    println!("  ARCHIVE_CONFIG   Config file path (default: {})", ArchiveConfig::file_path().display());
    println!("  RUST_LOG         Log filter, e.g. archive_core=debug");
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = ArchiveConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        ArchiveConfig::default()
    });

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["encode", record, out]        => cmd::encode::cmd_encode(record, out, &config.flush),
        ["dump", path]                 => cmd::dump::cmd_dump(path, &config.dump),
        ["config"]                     => cmd::config::cmd_config(&config),
        ["help"] | ["--help"] | ["-h"] | [] => { print_usage(); Ok(()) }
        other => {
            eprintln!("Unknown command: {}", other.join(" "));
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}
