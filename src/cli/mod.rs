//! MW-019: CLI subcommands (init, validate, order, schema, typedefs,
//! resolve, codegen, digest, manifest-schema, completions).

use crate::core::graph::ModuleGraph;
use crate::core::{manifest, parser, resolver};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "modweave",
    version,
    about = "Module type resolution and schema composition"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a starter modweave.yaml
    Init {
        /// Directory to initialize (default: current)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Validate modweave.yaml and load every module
    Validate {
        /// Path to modweave.yaml
        #[arg(short, long, default_value = "modweave.yaml")]
        file: PathBuf,
    },

    /// Show the module install order
    Order {
        /// Path to modweave.yaml
        #[arg(short, long, default_value = "modweave.yaml")]
        file: PathBuf,
    },

    /// Install every module and list the merged schema
    Schema {
        /// Path to modweave.yaml
        #[arg(short, long, default_value = "modweave.yaml")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a module's installed type definitions as JSON
    Typedefs {
        /// Path to modweave.yaml
        #[arg(short, long, default_value = "modweave.yaml")]
        file: PathBuf,

        /// Module name (`core` for the built-in module)
        module: String,
    },

    /// Resolve a type reference as seen from a module
    Resolve {
        /// Path to modweave.yaml
        #[arg(short, long, default_value = "modweave.yaml")]
        file: PathBuf,

        /// Module name
        module: String,

        /// Type reference, e.g. `Greeter`, `[String]?`
        type_ref: String,
    },

    /// Generate a module's dependency bindings
    Codegen {
        /// Path to modweave.yaml
        #[arg(short, long, default_value = "modweave.yaml")]
        file: PathBuf,

        /// Module name
        module: String,

        /// Write generated files under this directory instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show a module's content-addressed build steps
    Digest {
        /// Path to modweave.yaml
        #[arg(short, long, default_value = "modweave.yaml")]
        file: PathBuf,

        /// Module name
        module: String,
    },

    /// Print the JSON Schema of modweave.yaml
    ManifestSchema,

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Dispatch a CLI command.
pub fn dispatch(cmd: Commands) -> Result<(), String> {
    match cmd {
        Commands::Init { path } => cmd_init(&path),
        Commands::Validate { file } => cmd_validate(&file),
        Commands::Order { file } => cmd_order(&file),
        Commands::Schema { file, json } => cmd_schema(&file, json),
        Commands::Typedefs { file, module } => cmd_typedefs(&file, &module),
        Commands::Resolve {
            file,
            module,
            type_ref,
        } => cmd_resolve(&file, &module, &type_ref),
        Commands::Codegen { file, module, out } => cmd_codegen(&file, &module, out.as_deref()),
        Commands::Digest { file, module } => cmd_digest(&file, &module),
        Commands::ManifestSchema => cmd_manifest_schema(),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "modweave", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn cmd_init(path: &Path) -> Result<(), String> {
    let manifest_path = path.join("modweave.yaml");
    if manifest_path.exists() {
        return Err(format!("{} already exists", manifest_path.display()));
    }

    let template = r#"version: "1.0"
name: my-workspace
description: "Managed by modweave"

modules:
  hello:
    source: ./hello
    sdk: go
    objects:
      Hello:
        functions:
          greet:
            returns: String
            args:
              name: String
"#;
    std::fs::write(&manifest_path, template)
        .map_err(|e| format!("cannot write {}: {}", manifest_path.display(), e))?;

    println!("Initialized modweave workspace at {}", path.display());
    println!("  Created: {}", manifest_path.display());
    Ok(())
}

fn cmd_validate(file: &Path) -> Result<(), String> {
    let manifest = parser::parse_manifest_file(file).map_err(|e| e.to_string())?;
    let errors = parser::validate_manifest(&manifest);
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("  ERROR: {}", e);
        }
        return Err(format!("{} validation error(s)", errors.len()));
    }

    // Structure is fine; loading also runs type validation and namespacing.
    let graph = load_graph(file)?;
    let server = graph.install().map_err(|e| e.to_string())?;
    println!(
        "OK: {} ({} modules, {} types)",
        manifest.name,
        graph.order().len(),
        server.len()
    );
    Ok(())
}

fn cmd_order(file: &Path) -> Result<(), String> {
    let manifest = parser::parse_manifest_file(file).map_err(|e| e.to_string())?;
    let order = resolver::install_order(&manifest).map_err(|e| e.to_string())?;
    for (i, name) in order.iter().enumerate() {
        let deps = &manifest.modules[name].dependencies;
        if deps.is_empty() {
            println!("{:>3}. {}", i + 1, name);
        } else {
            println!("{:>3}. {} (after {})", i + 1, name, deps.join(", "));
        }
    }
    Ok(())
}

fn cmd_schema(file: &Path, json: bool) -> Result<(), String> {
    let graph = load_graph(file)?;
    let server = graph.install().map_err(|e| e.to_string())?;

    if json {
        let entries: Vec<serde_json::Value> = server
            .iter()
            .map(|(name, t)| {
                serde_json::json!({
                    "name": name,
                    "kind": t.kind.label(),
                    "module": t.module,
                })
            })
            .collect();
        let out = serde_json::to_string_pretty(&entries)
            .map_err(|e| format!("JSON serialize error: {}", e))?;
        println!("{}", out);
        return Ok(());
    }

    let mut current_module = String::new();
    for (name, t) in server.iter() {
        if t.module != current_module {
            current_module.clone_from(&t.module);
            println!("{}:", current_module);
        }
        println!("  {:<10} {}", t.kind.label(), name);
    }
    println!();
    println!("Schema: {} types from {} modules.", server.len(), graph.order().len() + 1);
    Ok(())
}

fn cmd_typedefs(file: &Path, module: &str) -> Result<(), String> {
    let graph = load_graph(file)?;
    let handle = graph
        .get(module)
        .ok_or_else(|| format!("unknown module '{}'", module))?;
    let server = graph.install().map_err(|e| e.to_string())?;
    let defs = handle.type_defs(&server).map_err(|e| e.to_string())?;
    let out =
        serde_json::to_string_pretty(&defs).map_err(|e| format!("JSON serialize error: {}", e))?;
    println!("{}", out);
    Ok(())
}

fn cmd_resolve(file: &Path, module: &str, type_ref: &str) -> Result<(), String> {
    let graph = load_graph(file)?;
    match graph.resolve_ref(module, type_ref).map_err(|e| e.to_string())? {
        Some(found) => {
            let owner = found.source_mod().map_or("-", |m| m.name());
            println!("{} {} (owner: {})", found.kind_label(), found.type_def(), owner);
            Ok(())
        }
        None => Err(format!("type {:?} not found from module '{}'", type_ref, module)),
    }
}

fn cmd_codegen(file: &Path, module: &str, out: Option<&Path>) -> Result<(), String> {
    let graph = load_graph(file)?;
    let code = graph.codegen(module).map_err(|e| e.to_string())?;

    let Some(out) = out else {
        for f in &code.files {
            println!("--- {}", f.path);
            print!("{}", f.contents);
        }
        return Ok(());
    };

    for f in &code.files {
        let path = out.join(&f.path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("cannot create {}: {}", parent.display(), e))?;
        }
        std::fs::write(&path, &f.contents)
            .map_err(|e| format!("cannot write {}: {}", path.display(), e))?;
        println!("  Wrote: {}", path.display());
    }
    Ok(())
}

fn cmd_digest(file: &Path, module: &str) -> Result<(), String> {
    let graph = load_graph(file)?;
    let m = graph.module(module).map_err(|e| e.to_string())?;
    for def in m.build_definitions() {
        println!("{:<8} {}", def.op, def.digest);
    }
    Ok(())
}

fn cmd_manifest_schema() -> Result<(), String> {
    println!("{}", manifest::manifest_json_schema()?);
    Ok(())
}

fn load_graph(file: &Path) -> Result<ModuleGraph, String> {
    ModuleGraph::load_file(file).map_err(|e| e.to_string())
}
