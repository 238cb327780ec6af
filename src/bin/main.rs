//! kexpr CLI - expression editor support from the command line
//!
//! Usage:
//!   kexpr lsp [--websocket [ADDR]]
//!   kexpr tokens <file>
//!   kexpr complete <file> --line <L> --column <C>
//!   kexpr hover <file> --line <L> --column <C>
//!   kexpr catalog [--search <TERM>]
//!
//! Examples:
//!   kexpr lsp --websocket 127.0.0.1:9257
//!   kexpr complete expr.txt --line 1 --column 4
//!   kexpr --config kexpr.toml catalog --search round

use clap::{Parser, Subcommand};
use kexpr::catalog::{CategoryGroup, FunctionCatalog};
use kexpr::config::Settings;
use kexpr::logging::init_logging;
use kexpr::lsp::{run_stdio, run_websocket};
use kexpr::syntax::{tokenize, TokenKind};
use kexpr::{CompletionProvider, HoverProvider, Position, TextModel};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "kexpr")]
#[command(about = "kexpr - Editor support for the KNIME expression language")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to KEXPR_CONFIG, ./kexpr.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the language server
    Lsp {
        /// Serve over WebSocket instead of stdio, optionally on ADDR
        #[arg(long, value_name = "ADDR")]
        websocket: Option<Option<String>>,
    },

    /// Print the tokens of each line with their scope and color
    Tokens {
        /// Path to the expression file
        file: PathBuf,
    },

    /// Print the completion list at a position as JSON
    Complete {
        /// Path to the expression file
        file: PathBuf,

        /// 1-based line
        #[arg(long)]
        line: u32,

        /// 1-based column in UTF-16 code units
        #[arg(long)]
        column: u32,
    },

    /// Print the hover documentation at a position
    Hover {
        /// Path to the expression file
        file: PathBuf,

        /// 1-based line
        #[arg(long)]
        line: u32,

        /// 1-based column in UTF-16 code units
        #[arg(long)]
        column: u32,
    },

    /// Browse the function catalog by category
    Catalog {
        /// Only show entries whose name, keywords or category contain TERM
        #[arg(short, long)]
        search: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let settings = match Settings::load_from(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Lsp { websocket } => cmd_lsp(&settings, websocket),
        Commands::Tokens { file } => cmd_tokens(&settings, &file),
        Commands::Complete { file, line, column } => {
            cmd_complete(&settings, &file, Position::new(line, column))
        }
        Commands::Hover { file, line, column } => {
            cmd_hover(&settings, &file, Position::new(line, column))
        }
        Commands::Catalog { search } => cmd_catalog(&settings, search.as_deref()),
    }
}

fn read_source(file: &Path) -> Option<String> {
    match fs::read_to_string(file) {
        Ok(s) => Some(s),
        Err(e) => {
            eprintln!("Error reading file '{}': {}", file.display(), e);
            None
        }
    }
}

fn load_catalog(settings: &Settings) -> Option<FunctionCatalog> {
    match settings.load_catalog() {
        Ok(catalog) => Some(catalog),
        Err(e) => {
            eprintln!("Error loading function catalog: {}", e);
            None
        }
    }
}

fn cmd_lsp(settings: &Settings, websocket: Option<Option<String>>) -> ExitCode {
    let config = match settings.backend_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let addr = match websocket {
        None => None,
        Some(None) => match settings.websocket_addr() {
            Ok(addr) => Some(addr),
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        Some(Some(raw)) => match raw.parse::<SocketAddr>() {
            Ok(addr) => Some(addr),
            Err(e) => {
                eprintln!("Invalid address '{}': {}", raw, e);
                return ExitCode::FAILURE;
            }
        },
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(async move {
        match addr {
            Some(addr) => {
                if let Err(e) = run_websocket(addr, config).await {
                    eprintln!("WebSocket server error: {}", e);
                    return ExitCode::FAILURE;
                }
            }
            None => run_stdio(config).await,
        }
        ExitCode::SUCCESS
    })
}

fn cmd_tokens(settings: &Settings, file: &Path) -> ExitCode {
    let Some(source) = read_source(file) else {
        return ExitCode::FAILURE;
    };
    let theme = settings.theme();

    for (idx, (line, line_tokens)) in source.lines().zip(tokenize(&source)).enumerate() {
        println!("{:>4} | {}", idx + 1, line);
        for token in &line_tokens.tokens {
            if token.kind == TokenKind::White {
                continue;
            }
            let color = theme
                .foreground_for(token.kind)
                .map(|c| format!(" #{}", c))
                .unwrap_or_default();
            println!(
                "     | {:>3}+{:<3} {:<24} {:?}{}",
                token.start,
                token.len,
                token.kind.to_string(),
                token.text(line),
                color
            );
        }
    }
    ExitCode::SUCCESS
}

fn cmd_complete(settings: &Settings, file: &Path, position: Position) -> ExitCode {
    let Some(source) = read_source(file) else {
        return ExitCode::FAILURE;
    };
    let Some(catalog) = load_catalog(settings) else {
        return ExitCode::FAILURE;
    };

    let columns = settings.inputs.columns.clone();
    let flow_variables = settings.inputs.flow_variables.clone();
    let provider = CompletionProvider::new(
        &catalog,
        Arc::new(move || columns.clone()),
        Arc::new(move || flow_variables.clone()),
    );

    match provider.provide(&TextModel::new(&source), position) {
        Some(list) => match serde_json::to_string_pretty(&list) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Failed to serialize completions: {}", e);
                ExitCode::FAILURE
            }
        },
        None => {
            println!("suppressed");
            ExitCode::SUCCESS
        }
    }
}

fn cmd_hover(settings: &Settings, file: &Path, position: Position) -> ExitCode {
    let Some(source) = read_source(file) else {
        return ExitCode::FAILURE;
    };
    let Some(catalog) = load_catalog(settings) else {
        return ExitCode::FAILURE;
    };

    let provider = HoverProvider::new(Arc::new(catalog));
    match provider.provide(&TextModel::new(&source), position) {
        Some(content) => println!("{}", content.markdown),
        None => println!("No documentation at {}:{}", position.line, position.column),
    }
    ExitCode::SUCCESS
}

fn cmd_catalog(settings: &Settings, search: Option<&str>) -> ExitCode {
    let Some(catalog) = load_catalog(settings) else {
        return ExitCode::FAILURE;
    };
    if catalog.is_empty() {
        eprintln!("No function catalog configured (set [catalog] path in kexpr.toml)");
        return ExitCode::FAILURE;
    }

    let groups: Vec<CategoryGroup<'_>> = match search {
        Some(term) => catalog.search(term),
        None => catalog.group_by_category(),
    };
    if groups.is_empty() {
        println!("No entries found.");
        return ExitCode::SUCCESS;
    }

    for meta in FunctionCatalog::group_by_meta_category(groups) {
        println!("{}", meta.meta_category.unwrap_or("Other"));
        for group in &meta.categories {
            println!("  {} ({})", group.category.name, group.entries.len());
            for entry in &group.entries {
                println!("    {:<40} -> {}", entry.display_name(), entry.return_type());
            }
        }
        println!();
    }
    ExitCode::SUCCESS
}
