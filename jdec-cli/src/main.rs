mod input;

use clap::{Parser, Subcommand};
use jdec_decompiler::java_emitter::emit_method;
use jdec_decompiler::{MethodCode, decompile_methods};
use jdec_ir::{BlockGraph, Statement};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use input::{ClassSource, CliError, Result};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[cfg(target_env = "msvc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "jdec", about = "JVM bytecode decompiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the basic blocks of every method
    Blocks {
        /// Path to the YAML class description
        input: PathBuf,
    },
    /// Print the reconstructed statements of every method as JSON
    Ast {
        /// Path to the YAML class description
        input: PathBuf,
    },
    /// Decompile a class to Java
    Decompile {
        /// Path to the YAML class description
        input: PathBuf,
        /// Output directory (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Blocks { input } => cmd_blocks(&input),
        Commands::Ast { input } => cmd_ast(&input),
        Commands::Decompile { input, output } => cmd_decompile(&input, output.as_deref()),
    };
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn cmd_blocks(path: &Path) -> Result<()> {
    let class = ClassSource::open(path)?;
    println!("# Class: {}", class.name);
    println!();
    for method in class.methods()? {
        println!(
            ".method {} {}",
            method.name,
            method.descriptor.as_deref().unwrap_or("()V")
        );
        for local in method.locals.iter() {
            println!("    .local {} {} {}", local.index, local.name, local.ty.descriptor());
        }
        let graph = BlockGraph::build(method.insns);
        print!("{graph}");
        println!();
    }
    Ok(())
}

#[derive(Serialize)]
struct MethodAst<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    statements: Option<&'a [Statement]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn cmd_ast(path: &Path) -> Result<()> {
    let class = ClassSource::open(path)?;
    let methods = class.methods()?;
    let results = decompile_methods(&methods);

    let asts: Vec<MethodAst> = methods
        .iter()
        .zip(&results)
        .map(|(method, result)| MethodAst {
            name: &method.name,
            statements: result.as_deref().ok(),
            error: result.as_ref().err().map(|e| e.to_string()),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&asts)?);
    Ok(())
}

fn cmd_decompile(path: &Path, output_dir: Option<&Path>) -> Result<()> {
    let class = ClassSource::open(path)?;
    let methods = class.methods()?;
    let results = decompile_methods(&methods);

    let simple_name = class.name.rsplit('/').next().unwrap_or(&class.name);
    let mut class_output = format!("class {simple_name} {{\n");
    for (i, (method, result)) in methods.iter().zip(results).enumerate() {
        if i > 0 {
            class_output.push('\n');
        }
        // A failed method still gets a declaration, with the reason as its body.
        let body = result
            .unwrap_or_else(|e| vec![Statement::Comment(format!("decompilation failed: {e}"))]);
        decompile_method_to_string(method, &body, &mut class_output);
    }
    class_output.push_str("}\n");

    if let Some(dir) = output_dir {
        let out_path = dir.join(class_name_to_path(&class.name));
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|source| CliError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&out_path, class_output).map_err(|source| CliError::Io {
            path: out_path.clone(),
            source,
        })?;
        log::info!("wrote {}", out_path.display());
    } else {
        print!("{class_output}");
    }
    Ok(())
}

fn decompile_method_to_string(method: &MethodCode, body: &[Statement], output: &mut String) {
    let descriptor = method.descriptor.as_deref().unwrap_or("()V");
    let text = match emit_method(&method.name, descriptor, &method.locals, body) {
        Ok(text) => text,
        Err(e) => {
            output.push_str(&format!(
                "    // {}: bad descriptor {descriptor:?}: {e}\n",
                method.name
            ));
            return;
        }
    };
    for line in text.lines() {
        output.push_str(&format!("    {line}\n"));
    }
}

fn sanitize_filename(name: &str) -> String {
    name.replace(['\\', ':', '*', '?', '"', '<', '>', '|'], "_")
        .replace("..", "_")
        .trim_matches('_')
        .to_string()
}

/// Convert an internal class name like `com/example/Demo` into a relative
/// path like `com/example/Demo.java`.
fn class_name_to_path(name: &str) -> PathBuf {
    let parts: Vec<&str> = name.split('/').collect();
    let mut path = PathBuf::new();
    for &dir in &parts[..parts.len() - 1] {
        path.push(sanitize_filename(dir));
    }
    path.push(format!("{}.java", sanitize_filename(parts[parts.len() - 1])));
    path
}
