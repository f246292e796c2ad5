use std::env;
use std::fs;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::Instant;

use birch::{eval_source, Result, Scope, Value, ViewModel};

/// No host bindings; bare identifiers and undeclared method calls fail with
/// a plain `NameError`/`NoMethodError` rather than resolving to anything.
#[derive(Debug)]
struct NoHost;

impl ViewModel for NoHost {
    fn call(&self, _name: &str, _args: &[Value]) -> Option<Result<Value>> {
        None
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let file_path = if args.len() > 1 { &args[1] } else { "expr.rb" };
    let source = match read_file(file_path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let scope = Scope::new(Rc::new(NoHost));
    let start = Instant::now();
    match eval_source(&source, &scope) {
        Ok(value) => {
            let elapsed = start.elapsed();
            println!("{}", value.inspect());
            eprintln!("success after: {elapsed:?}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let elapsed = start.elapsed();
            eprintln!("error after: {elapsed:?}\n{err}");
            ExitCode::FAILURE
        }
    }
}

fn read_file(file_path: &str) -> std::result::Result<String, String> {
    eprintln!("Reading file: {file_path}");
    match fs::metadata(file_path) {
        Ok(metadata) => {
            if !metadata.is_file() {
                return Err(format!("Error: {file_path} is not a file"));
            }
        }
        Err(err) => {
            return Err(format!("Error reading {file_path}: {err}"));
        }
    }
    match fs::read_to_string(file_path) {
        Ok(contents) => Ok(contents),
        Err(err) => Err(format!("Error reading file: {err}")),
    }
}
