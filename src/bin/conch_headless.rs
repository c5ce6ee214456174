//! Conch Headless Console Runner
//!
//! Drives the console core without a renderer, for testing and
//! automation. Reads scripted console traffic from stdin or a file (one
//! message per line, with an optional provenance tag) and outputs the
//! active channel's state as text or JSON.

use std::io::{self, Read};
use std::process::ExitCode;

use conch::{ChannelSnapshot, Console, ConsoleConfig, Viewport};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut width = 1024u32;
    let mut height = 768u32;
    let mut scale: Option<f32> = None;
    let mut input_file: Option<String> = None;
    let mut output_format = OutputFormat::Text;
    let mut show_help = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-w" | "--width" => {
                i += 1;
                if i < args.len() {
                    width = args[i].parse().unwrap_or(1024);
                }
            },
            "-g" | "--height" => {
                i += 1;
                if i < args.len() {
                    height = args[i].parse().unwrap_or(768);
                }
            },
            "-s" | "--scale" => {
                i += 1;
                if i < args.len() {
                    scale = args[i].parse().ok();
                }
            },
            "-f" | "--file" => {
                i += 1;
                if i < args.len() {
                    input_file = Some(args[i].clone());
                }
            },
            "-j" | "--json" => {
                output_format = OutputFormat::Json;
            },
            "-t" | "--text" => {
                output_format = OutputFormat::Text;
            },
            "-h" | "--help" => {
                show_help = true;
            },
            _ => {
                // Treat as input file if no flag
                if input_file.is_none() && !args[i].starts_with('-') {
                    input_file = Some(args[i].clone());
                }
            },
        }
        i += 1;
    }

    if show_help {
        print_help();
        return ExitCode::SUCCESS;
    }

    // Create console
    let mut config = ConsoleConfig::default();
    if let Some(scale) = scale {
        config.set_scale(scale);
    }
    let mut console = Console::new(config);

    if let Err(e) = console.check_resize(Viewport { width, height }) {
        eprintln!("Error sizing console: {}", e);
        return ExitCode::FAILURE;
    }

    // Read input
    let input_data = match &input_file {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path, e);
                return ExitCode::FAILURE;
            },
        },
        None => {
            // Read from stdin
            let mut data = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut data) {
                eprintln!("Error reading stdin: {}", e);
                return ExitCode::FAILURE;
            }
            data
        },
    };

    // Feed messages; the clock advances a frame per message
    let mut now_ms = 0u64;
    for line in input_data.lines() {
        now_ms += 100;
        match line.split_once('|') {
            Some((tag, text)) => {
                console.print_tagged(Some(tag), &format!("{}\n", text), now_ms)
            },
            None => console.print(&format!("{}\n", line), now_ms),
        }
    }

    // Output result
    match output_format {
        OutputFormat::Text => {
            let snapshot = ChannelSnapshot::from_channel(console.active_channel());
            let tabs: Vec<String> = console
                .tabs()
                .iter()
                .map(|t| {
                    let mut label = t.name.to_string();
                    if t.current {
                        label = format!("[{}]", label);
                    }
                    if t.notify {
                        label.push('*');
                    }
                    label
                })
                .collect();
            println!("Console ({} cols x {} lines):", snapshot.line_width, snapshot.total_lines);
            println!("Tabs: {}", tabs.join(" "));
            println!("---");
            for row in &snapshot.rows {
                println!("{}", row);
            }
            println!("---");
        },
        OutputFormat::Json => {
            let snapshot = ChannelSnapshot::from_channel(console.active_channel());
            match serde_json::to_string_pretty(&snapshot) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error serializing snapshot: {}", e);
                    return ExitCode::FAILURE;
                },
            }
        },
    }

    ExitCode::SUCCESS
}

#[derive(Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

fn print_help() {
    println!("Conch Headless Console Runner");
    println!();
    println!("Usage: conch-headless [OPTIONS] [INPUT_FILE]");
    println!();
    println!("Options:");
    println!("  -w, --width <PX>   Viewport width in pixels (default: 1024)");
    println!("  -g, --height <PX>  Viewport height in pixels (default: 768)");
    println!("  -s, --scale <F>    Console font scale (default: 0.8)");
    println!("  -f, --file <PATH>  Read input from file");
    println!("  -j, --json         Output snapshot as JSON");
    println!("  -t, --text         Output snapshot as text (default)");
    println!("  -h, --help         Show this help message");
    println!();
    println!("Each input line is one console message. A 'tag|' prefix routes");
    println!("it by provenance (e.g. 'chat \"x\"|^2player: hi'); untagged lines");
    println!("go to the system channel.");
    println!();
    println!("Examples:");
    println!("  echo 'hello console' | conch-headless");
    println!("  conch-headless --json session.txt > snapshot.json");
}
