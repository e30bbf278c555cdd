use std::{env, process};

use flint::{stdout_flint, EX_DATAERR};

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut interpreter = stdout_flint();

    match args.len() {
        n if n > 2 => {
            println!("Usage: flint [script]");
            process::exit(EX_DATAERR);
        }
        2 => interpreter.run_file(&args[1]),
        _ => interpreter.run_prompt(),
    };
}
