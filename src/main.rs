use std::env;
use std::fs;
use std::process;

use env_logger::Env;

fn main() {
  env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

  let args: Vec<String> = env::args().collect();
  if args.len() != 2 {
    let program = args.first().map(String::as_str).unwrap_or("fasm");
    eprintln!("usage: {program} <file>");
    process::exit(1);
  }
  let path = &args[1];

  let source = match fs::read_to_string(path) {
    Ok(source) => source,
    Err(err) => {
      eprintln!("{path}: {err}");
      process::exit(1);
    }
  };

  match fasm::compile(&source) {
    Ok(program) => {
      log::info!("{path}: validated");
      println!(
        "{path}: {} globals, {} functions",
        program.globals.len(),
        program.functions.len()
      );
    }
    Err(err) => {
      eprintln!("{path}: {err}");
      process::exit(1);
    }
  }
}
