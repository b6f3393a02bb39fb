use std::{
    env, fs,
    io::{self, BufRead as _, Write as _},
    process::ExitCode,
};

use motif::{Interp, Repl, ReplOutcome, parse};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_help(prog: &str) {
    println!("Usage: {prog} [options] [file.lang]");
    println!("Options:");
    println!("  -h, --help       Show this help message");
    println!("  -v, --version    Show version");
    println!("If no file is given, starts an interactive REPL.");
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    for arg in &args[1..] {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help(&args[0]);
                return ExitCode::SUCCESS;
            }
            "-v" | "--version" => {
                println!("motif {VERSION}");
                return ExitCode::SUCCESS;
            }
            _ => {}
        }
    }

    match args.get(1) {
        Some(file) => run_file(file),
        None => {
            repl();
            ExitCode::SUCCESS
        }
    }
}

fn run_file(path: &str) -> ExitCode {
    let src = match fs::read_to_string(path) {
        Ok(src) => src,
        Err(error) => {
            eprintln!("{path}: {error}");
            return ExitCode::FAILURE;
        }
    };
    let program = match parse(&src) {
        Ok(program) => program,
        Err(error) => {
            eprintln!("{path}: {error}");
            return ExitCode::FAILURE;
        }
    };
    let mut interp = Interp::new();
    match interp.run(&program) {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn repl() {
    println!("motif v{VERSION}  (type 'exit' to quit)");
    let mut session = Repl::new();
    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        if line.trim() == "exit" {
            break;
        }
        match session.eval_line(&line) {
            ReplOutcome::Value(text) => println!("{text}"),
            ReplOutcome::Quiet => {}
            ReplOutcome::Error(message) => eprintln!("{message}"),
        }
    }
}
