use std::{path::PathBuf, process::exit};

use closures::{run_demo, run_script, StdoutContext};
use structopt::StructOpt;

const STACK_SIZE: usize = 1024 * 1024 * 64;

#[derive(StructOpt)]
#[structopt(name = "closures", about = "Counter factory demo and closure script runner")]
struct Cli {
    /// Script to run; omit to run the built-in counter demo.
    #[structopt(parse(from_os_str))]
    script: Option<PathBuf>,
}

fn main() {
    let args = Cli::from_args();
    let ok = match args.script {
        Some(path) => run_file(path),
        None => {
            run_demo(&mut StdoutContext);
            true
        }
    };
    if !ok {
        exit(1);
    }
}

fn run_file(path: PathBuf) -> bool {
    let file = path.display().to_string();
    let source = match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Cannot read {}: {}", file, e);
            return false;
        }
    };
    // Deeply recursive scripts need more than the main thread's stack.
    let child = std::thread::Builder::new()
        .stack_size(STACK_SIZE)
        .spawn(move || match run_script(&file, &source, &mut StdoutContext) {
            Ok(()) => true,
            Err(e) => {
                if e.eprint(&source).is_err() {
                    eprintln!("{}", e);
                }
                false
            }
        });
    match child {
        Ok(handle) => handle.join().unwrap_or(false),
        Err(e) => {
            eprintln!("Cannot start interpreter thread: {}", e);
            false
        }
    }
}
