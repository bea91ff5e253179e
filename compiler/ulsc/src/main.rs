//! ULS CLI
//!
//! Tokenize files and write or read token stream files.

use std::path::Path;

use ulsc::commands::{
    lex_file, parse_options, read_stream, show_header, write_stream, CliError, ReadOptions,
    WriteOptions,
};
use uls_stream::SYSTEM_SINK;

fn main() {
    ulsc::init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    if let Err(e) = SYSTEM_SINK.open(Box::new(std::io::stdout())) {
        eprintln!("error: cannot open output: {e}");
        std::process::exit(1);
    }

    let command = args[1].as_str();
    let result = match command {
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: uls lex <file>");
                std::process::exit(1);
            }
            lex_file(Path::new(&args[2]), &SYSTEM_SINK).map(|_| ())
        }
        "write" => {
            let mut write = WriteOptions::default();
            let mut read = ReadOptions::default();
            parse_options(&args[2..], &mut write, &mut read).and_then(|input| {
                let output = write_stream(&input, &write)?;
                println!("wrote {}", output.display());
                Ok(())
            })
        }
        "read" => {
            let mut write = WriteOptions::default();
            let mut read = ReadOptions::default();
            parse_options(&args[2..], &mut write, &mut read)
                .and_then(|input| read_stream(&input, &read, &SYSTEM_SINK).map(|_| ()))
        }
        "header" => {
            if args.len() < 3 {
                eprintln!("Usage: uls header <file.uls>");
                std::process::exit(1);
            }
            show_header(Path::new(&args[2]), &SYSTEM_SINK)
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        "version" | "--version" | "-v" => {
            println!("uls {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    let closed = SYSTEM_SINK.close();
    if let Err(e) = result {
        report(&e);
        std::process::exit(1);
    }
    if let Err(e) = closed {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn report(error: &CliError) {
    eprintln!("error: {error}");
    if let CliError::Usage(_) = error {
        eprintln!();
        eprintln!("Run `uls help` for usage.");
    }
}

fn print_usage() {
    println!("ULS token streams");
    println!();
    println!("Usage: uls <command> [options]");
    println!();
    println!("Commands:");
    println!("  lex <file>           Tokenize a file and list its tokens");
    println!("  write <file>         Record a file's tokens as a stream file");
    println!("  read <file.uls>      List the tokens of a stream (or raw) file");
    println!("  header <file.uls>    Show a stream file's header");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Write options:");
    println!("  -o <path>            Output file (default: <file>.uls)");
    println!("  --format=<fmt>       bin, bin-le, bin-be or txt (default: bin)");
    println!("  --tag=<name>         Tag recorded in the stream (default: <file>)");
    println!("  --no-lines           Do not record line numbers");
    println!();
    println!("Read options:");
    println!("  --template=NAME=VAL  Read identifier NAME back as VAL");
    println!("  --replay             Replay the stream through the lexer");
    println!();
    println!("Logging:");
    println!("  ULS_LOG=<filter>     Enable tracing, e.g. ULS_LOG=uls_stream=debug");
    println!();
    println!("Examples:");
    println!("  uls lex main.c");
    println!("  uls write main.c --format=txt -o main.tok");
    println!("  uls read main.uls --template=T=int");
}
