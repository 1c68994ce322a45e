//! Parses the cached attendance page and prints what kind of tree it got.
//!
//! Usage: `fair_attendance [--strict] [--json] [--tables] [PATH]`
//!
//! PATH defaults to `fair_raw.html` in the working directory.

use std::env;
use std::path::PathBuf;
use std::process;

use fair_attendance::{load_with_options, logging, LoadOptions, ParserMode, ParseTree};

struct Args {
    options: LoadOptions,
    json: bool,
    tables: bool,
}

fn usage() -> ! {
    eprintln!("Usage: fair_attendance [--strict] [--json] [--tables] [PATH]");
    eprintln!("  PATH      HTML file to parse (default: fair_raw.html)");
    eprintln!("  --strict  reject unclosed or misnested elements");
    eprintln!("  --json    print the parsed tree as JSON");
    eprintln!("  --tables  print table rows, tab separated");
    process::exit(2);
}

fn parse_args() -> Args {
    let mut args = Args {
        options: LoadOptions::default(),
        json: false,
        tables: false,
    };
    let mut input: Option<PathBuf> = None;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--strict" => args.options.mode = ParserMode::Strict,
            "--json" => args.json = true,
            "--tables" => args.tables = true,
            "-h" | "--help" => usage(),
            flag if flag.starts_with('-') => {
                eprintln!("unknown option: {flag}");
                usage();
            }
            path if input.is_none() => input = Some(PathBuf::from(path)),
            _ => usage(),
        }
    }

    if let Some(input) = input {
        args.options.input = input;
    }
    args
}

fn print_tables(tree: &ParseTree) {
    for (i, table) in tree.tables().iter().enumerate() {
        let id = table
            .id
            .as_deref()
            .map(|id| format!(" ({id})"))
            .unwrap_or_default();
        println!("# table {}{id}", i + 1);
        for row in &table.rows {
            println!("{}", row.cells.join("\t"));
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init(logging::default_level()) {
        eprintln!("logger unavailable: {err}");
    }

    let args = parse_args();
    let tree = load_with_options(&args.options)?;

    println!("{}", tree.type_name());
    log::info!(
        "{}: {} elements, {}",
        args.options.input.display(),
        tree.element_count(),
        tree.encoding()
    );

    if args.json {
        println!("{}", tree.to_json()?);
    }
    if args.tables {
        print_tables(&tree);
    }

    Ok(())
}
