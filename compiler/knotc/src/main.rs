//! Knot CLI
//!
//! Runs, evaluates and formats knot programs.

use std::path::Path;

use knotc::{eval_source, format_file, init_tracing, run_file, CliError};

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let command = &args[1];

    let result = match command.as_str() {
        "run" => {
            if args.len() < 3 {
                eprintln!("Usage: knot run <file>");
                std::process::exit(1);
            }
            run_file(Path::new(&args[2]))
        }
        "eval" => {
            if args.len() < 3 {
                eprintln!("Usage: knot eval <source>");
                eprintln!("Example: knot eval '+(1, 2)'");
                std::process::exit(1);
            }
            eval_source(&args[2])
        }
        "fmt" => {
            if args.len() < 3 {
                eprintln!("Usage: knot fmt <file>");
                std::process::exit(1);
            }
            format_file(Path::new(&args[2]))
        }
        "help" | "--help" | "-h" => {
            print_usage();
            return;
        }
        "version" | "--version" | "-v" => {
            println!("knot {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    report(result);
}

fn report(result: Result<String, CliError>) {
    match result {
        Ok(output) if output.is_empty() => {}
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("knot - an embeddable S-expression interpreter");
    eprintln!();
    eprintln!("Usage: knot <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <file>       Evaluate a program and print its result");
    eprintln!("  eval <source>    Evaluate inline source");
    eprintln!("  fmt <file>       Print the program in canonical form");
    eprintln!("  help             Show this help message");
    eprintln!("  version          Show version information");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  RUST_LOG               Enable logging (e.g. RUST_LOG=knot_eval=debug)");
    eprintln!("  KNOT_LOG_TREE          Log spans as an indented tree");
    eprintln!("  KNOT_MAX_CALL_DEPTH    Maximum closure call depth (default 10000)");
}
