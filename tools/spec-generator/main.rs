use clap::Parser;
use rand::Rng;
use rand::rngs::ThreadRng;
use serde_json::{Map, Value, json};
use std::fs;

/// A CLI tool to generate random form specifications for stress runs
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated specification to
    #[arg(short, long, default_value = "generated_spec.json")]
    output: String,

    /// Optional path to write a matching random model to
    #[arg(long)]
    model: Option<String>,

    /// Number of top-level nodes
    #[arg(long, default_value_t = 10)]
    nodes: usize,

    /// Maximum nesting depth of structural nodes
    #[arg(long, default_value_t = 3)]
    depth: usize,

    /// Probability that a leaf is dynamic and watches another field
    #[arg(long, default_value_t = 0.2)]
    dynamic_ratio: f64,
}

const LEAF_TYPES: &[&str] = &[
    "text",
    "password",
    "textarea",
    "number",
    "select",
    "multiselect",
    "tags",
    "switch",
    "checkbox",
    "checkbox-group",
    "radio-group",
    "date",
    "datetime",
    "time",
    "upload",
];

struct Generator {
    rng: ThreadRng,
    dynamic_ratio: f64,
    next_field: usize,
    names: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if !(0.0..=1.0).contains(&cli.dynamic_ratio) {
        eprintln!(
            "Error: --dynamic-ratio ({}) must be between 0 and 1",
            cli.dynamic_ratio
        );
        std::process::exit(1);
    }

    println!(
        "Generating a form specification ({} top-level nodes, depth up to {})...",
        cli.nodes, cli.depth
    );

    let mut generator = Generator {
        rng: rand::rng(),
        dynamic_ratio: cli.dynamic_ratio,
        next_field: 0,
        names: Vec::new(),
    };
    let nodes: Vec<Value> = (0..cli.nodes).map(|_| generator.node(cli.depth)).collect();

    fs::write(&cli.output, serde_json::to_string_pretty(&Value::Array(nodes))?)?;
    println!(
        "Successfully generated {} fields and saved the spec to '{}'",
        generator.names.len(),
        cli.output
    );

    if let Some(model_path) = &cli.model {
        let model = generator.model();
        fs::write(model_path, serde_json::to_string_pretty(&model)?)?;
        println!("-> Saved a matching model to '{}'", model_path);
    }

    Ok(())
}

impl Generator {
    fn node(&mut self, depth: usize) -> Value {
        if depth == 0 || self.rng.random_bool(0.6) {
            return self.leaf();
        }
        let children: Vec<Value> = (0..self.rng.random_range(1..=4))
            .map(|_| self.node(depth - 1))
            .collect();
        match self.rng.random_range(0..5) {
            0 => {
                let columns = children
                    .into_iter()
                    .map(|mut child| {
                        if let Value::Object(object) = &mut child {
                            object.insert("span".to_string(), json!(self.rng.random_range(4..=24)));
                        }
                        child
                    })
                    .collect::<Vec<_>>();
                json!({"type": "row", "children": columns})
            }
            1 => json!({"type": "group", "children": children}),
            2 => json!({"type": "list", "children": children}),
            3 => json!({
                "type": "section",
                "title": format!("Section {}", self.next_field),
                "card": self.rng.random_bool(0.5),
                "children": children,
            }),
            _ => json!({"type": "divider"}),
        }
    }

    fn leaf(&mut self) -> Value {
        let name = format!("field_{}", self.next_field);
        self.next_field += 1;
        let kind = LEAF_TYPES[self.rng.random_range(0..LEAF_TYPES.len())];

        let mut leaf = Map::new();
        leaf.insert("type".to_string(), json!(kind));
        leaf.insert("name".to_string(), json!(name));
        leaf.insert("label".to_string(), json!(format!("Field {}", self.next_field)));
        if matches!(kind, "select" | "multiselect" | "tags" | "checkbox-group" | "radio-group") {
            let options: Vec<Value> = (0..self.rng.random_range(2..6))
                .map(|i| json!({"label": format!("Option {}", i), "value": i}))
                .collect();
            leaf.insert("options".to_string(), Value::Array(options));
        }
        if self.rng.random_bool(0.3) {
            leaf.insert("rules".to_string(), json!([{"required": true}]));
        }
        if !self.names.is_empty() && self.rng.random_bool(self.dynamic_ratio) {
            let watched = &self.names[self.rng.random_range(0..self.names.len())];
            leaf.insert("watch".to_string(), json!([watched]));
        }
        self.names.push(name);
        Value::Object(leaf)
    }

    fn model(&mut self) -> Value {
        let mut model = Map::new();
        for name in &self.names {
            if self.rng.random_bool(0.5) {
                model.insert(name.clone(), json!(self.rng.random_range(0..100)));
            }
        }
        Value::Object(model)
    }
}
