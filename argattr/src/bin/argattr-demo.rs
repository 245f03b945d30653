//! ```
//! USAGE: argattr-demo --config <path> [-n] [-o <path>] [FILES...]
//! ```

use std::process::ExitCode;

use argattr::{Outcome, Parser, RegistrationError};

#[derive(Debug, Default)]
struct DemoOptions {
    config: String,
    output: String,
    dry_run: bool,
}

fn register<'a>(
    parser: &mut Parser<'a>,
    options: &'a mut DemoOptions,
) -> Result<(), RegistrationError> {
    parser.add_mandatory(
        'c',
        "config",
        "path to the configuration file",
        &mut options.config,
    )?;
    parser.add('o', "output", "where to write results", &mut options.output)?;
    parser.add(
        'n',
        "dry-run",
        "show what would happen without doing it",
        &mut options.dry_run,
    )?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let mut options = DemoOptions::default();
    let free = {
        let mut parser = Parser::new("argattr-demo", env!("CARGO_PKG_VERSION"));
        if let Err(err) = register(&mut parser, &mut options) {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
        match parser.parse_env() {
            Ok(Outcome::Continue) => parser.free().to_vec(),
            Ok(Outcome::ExitRequested(request)) => {
                return ExitCode::from(parser.respond(request) as u8);
            }
            Err(err) => {
                eprintln!("{}", err.report());
                return ExitCode::FAILURE;
            }
        }
    };

    log::info!("parsed {:?}", options);
    println!("config:  {}", options.config);
    if !options.output.is_empty() {
        println!("output:  {}", options.output);
    }
    println!("dry run: {}", options.dry_run);
    for file in free.iter() {
        println!("file:    {}", file);
    }
    ExitCode::SUCCESS
}
