use clap::{ArgAction, Parser, Subcommand};
use figstyle_codegen::{compile_with, CompileOptions, EmptyRules};
use figstyle_tree::extract::DEFAULT_MAX_DEPTH;
use figstyle_tree::{DesignFile, DesignSource, DirectorySource, ExtractOptions};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "figstyle")]
#[command(about = "figstyle: turn design documents into CSS")]
#[command(version)]
struct Cli {
    /// Treat inputs as file keys served from this directory
    #[arg(long, global = true, env = "FIGSTYLE_SOURCE_DIR")]
    source_dir: Option<PathBuf>,

    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Derive a stylesheet from a design document
    Build {
        /// Input .json file (or file key with --source-dir)
        input: String,

        /// Output path; `-` writes to stdout. Defaults to <stem>.css
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Leave out rules for nodes without any declarations
        #[arg(long)]
        skip_empty: bool,

        /// Header comment for the stylesheet
        #[arg(long)]
        header: Option<String>,

        /// Deepest tree level to visit
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,
    },

    /// Check that a design document can be read and report what it contains
    Check {
        /// Input .json file (or file key with --source-dir)
        input: String,
    },

    /// List the extracted nodes
    Nodes {
        /// Input .json file (or file key with --source-dir)
        input: String,

        /// Print the node records as JSON
        #[arg(long)]
        json: bool,

        /// Also look up each node's rendered image (needs --source-dir)
        #[arg(long, conflicts_with = "json")]
        images: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let source_dir = cli.source_dir.as_deref();
    match cli.command {
        Command::Build {
            input,
            output,
            skip_empty,
            header,
            max_depth,
        } => {
            let mut options = CompileOptions {
                extract: ExtractOptions { max_depth },
                ..CompileOptions::default()
            };
            if skip_empty {
                options.style.empty_rules = EmptyRules::Skip;
            }
            if let Some(header) = header {
                options.style.header = header;
            }
            cmd_build(&input, source_dir, output, &options);
        }
        Command::Check { input } => cmd_check(&input, source_dir),
        Command::Nodes {
            input,
            json,
            images,
        } => cmd_nodes(&input, source_dir, json, images),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

fn load(input: &str, source_dir: Option<&Path>) -> DesignFile {
    if let Some(dir) = source_dir {
        return match DirectorySource::new(dir).fetch_file(input) {
            Ok(file) => file,
            Err(e) => fail(e),
        };
    }

    let p = Path::new(input);
    if !p.exists() {
        fail(format!("file not found: {input}"));
    }
    let source = match std::fs::read_to_string(p) {
        Ok(source) => source,
        Err(e) => fail(format!("reading {input}: {e}")),
    };
    match DesignFile::from_json(&source) {
        Ok(file) => file,
        Err(e) => fail(e),
    }
}

/// Where `build` writes when no `--output` is given: next to a source file,
/// or in the working directory for a file key.
fn default_output(input: &str, source_dir: Option<&Path>) -> PathBuf {
    let path = Path::new(input);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("styles");
    if source_dir.is_some() {
        return PathBuf::from(format!("{stem}.css"));
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    dir.join(format!("{stem}.css"))
}

fn cmd_build(
    input: &str,
    source_dir: Option<&Path>,
    output: Option<PathBuf>,
    options: &CompileOptions,
) {
    let file = load(input, source_dir);
    let result = compile_with(&file.document, options);

    let out_path = output.unwrap_or_else(|| default_output(input, source_dir));
    if out_path == Path::new("-") {
        print!("{}", result.css);
        return;
    }

    if let Err(e) = std::fs::write(&out_path, &result.css) {
        fail(format!("writing {}: {e}", out_path.display()));
    }

    eprintln!(
        "Built: {} ({} nodes)",
        out_path.display(),
        result.nodes.len()
    );
}

fn cmd_check(input: &str, source_dir: Option<&Path>) {
    let file = load(input, source_dir);
    let nodes = figstyle_tree::extract_nodes(&file.document);

    let name = if file.name.is_empty() { input } else { file.name.as_str() };
    eprintln!(
        "OK: {name} ({} nodes, {} components)",
        nodes.len(),
        file.components.len()
    );
}

fn cmd_nodes(input: &str, source_dir: Option<&Path>, json: bool, images: bool) {
    let file = load(input, source_dir);
    let nodes = figstyle_tree::extract_nodes(&file.document);

    if json {
        match serde_json::to_string_pretty(&nodes) {
            Ok(text) => println!("{text}"),
            Err(e) => fail(e),
        }
        return;
    }

    let image_refs: BTreeMap<String, String> = if images {
        let Some(dir) = source_dir else {
            fail("--images needs --source-dir");
        };
        let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        if ids.is_empty() {
            BTreeMap::new()
        } else {
            match DirectorySource::new(dir).fetch_node_images(input, &ids) {
                Ok(refs) => refs,
                Err(e) => fail(e),
            }
        }
    } else {
        BTreeMap::new()
    };

    for node in &nodes {
        match image_refs.get(&node.id) {
            Some(image) => println!("{}\t{}\t{}\t{image}", node.id, node.kind.as_str(), node.name),
            None => println!("{}\t{}\t{}", node.id, node.kind.as_str(), node.name),
        }
    }
}
