use clap::Parser;
use itertools::Itertools;
use keishiki::prelude::*;
use serde_json::Value;
use std::fs;
use std::time::Instant;

/// Resolves a form specification against a model and prints the resulting widget tree
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the form specification JSON file
    spec_path: String,
    /// Optional path to the initial model JSON file
    model_path: Option<String>,

    /// Optional path to an engine config JSON file
    #[arg(short, long)]
    config: Option<String>,

    /// Map an extension field type to a built-in control, e.g. `email=text`
    #[arg(short = 'm', long = "map")]
    type_mappings: Vec<String>,

    /// Apply a model mutation and resolve again, e.g. `country=ID` or `items.0.qty=3`
    #[arg(short, long = "set")]
    mutations: Vec<String>,

    /// Print the resolution as JSON instead of a tree
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::Builder::from_default_env().init();
    let cli = Cli::parse();
    let total_start = Instant::now();

    // --- 1. File Loading ---
    let spec_json = fs::read_to_string(&cli.spec_path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read spec file '{}': {}", cli.spec_path, e))
    });
    let spec = FormSpec::from_json(&spec_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load spec: {}", e)));

    let model = match &cli.model_path {
        Some(path) => {
            let raw = fs::read_to_string(path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to read model file '{}': {}", path, e))
            });
            serde_json::from_str(&raw)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse model JSON: {}", e)))
        }
        None => {
            println!("No model file provided. Starting from an empty model.");
            Value::Object(Default::default())
        }
    };

    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => EngineConfig::default(),
    };

    // --- 2. Resolver Setup ---
    let mut builder = TreeResolver::builder().with_config(config);
    for mapping in &cli.type_mappings {
        let (user_type, builtin) = mapping.split_once('=').unwrap_or_else(|| {
            exit_with_error(&format!("Invalid type mapping '{}', expected user=builtin", mapping))
        });
        builder = builder.with_type_mapping(user_type, builtin);
    }
    let mut form = Form::with_context(spec, FormContext::new(model), builder.build());

    // --- 3. Initial Pass ---
    run_pass(&mut form, "initial", cli.json);

    // --- 4. Mutations ---
    for mutation in &cli.mutations {
        let (path, raw_value) = mutation.split_once('=').unwrap_or_else(|| {
            exit_with_error(&format!("Invalid mutation '{}', expected path=value", mutation))
        });
        // Values that are not valid JSON are taken as plain strings.
        let value = serde_json::from_str(raw_value).unwrap_or_else(|_| Value::String(raw_value.to_string()));
        form.context_mut().set_value(path, value);
        run_pass(&mut form, &format!("after {}", mutation), cli.json);
    }

    println!("\nTotal Execution:      {:?}", total_start.elapsed());
}

fn run_pass(form: &mut Form, label: &str, json: bool) {
    let start = Instant::now();
    let resolution = form
        .resolve()
        .unwrap_or_else(|e| exit_with_error(&format!("Resolution failed: {}", e)));
    let duration = start.elapsed();

    println!("\n--- Pass: {} ({:?}) ---", label, duration);
    if json {
        let output = serde_json::to_string_pretty(&resolution)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize resolution: {}", e)));
        println!("{}", output);
    } else {
        print!("{}", DisplayTree { nodes: &resolution.nodes });
    }

    println!("Fields:     {}", resolution.leaf_names().iter().join(", "));
    println!("Recomputed: [{}]", resolution.recomputed.iter().join(", "));
    println!("Reused:     [{}]", resolution.reused.iter().join(", "));
    for diagnostic in &resolution.diagnostics {
        println!("  -> Skipped {}: {}", diagnostic.position, diagnostic.message);
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
