use crate::commands;
use crate::config::Settings;
use crate::error::Result;
use crate::session::Session;
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::debug;

const SHELL_HELP: &str = "\
Commands:
  parse <path-or-pattern>      parse TS file(s) and cache them by basename
  load <model> [ts-file]       register a structure file or known model, attach its TS
  attach <ts-file> <model>     parse a TS file and store it under a model
  show [key] [ts-file]         show cached or discovered metadata
  list                         list registered models
  help                         show this help
  quit                         leave the session";

/// The interactive session: one registry and one cache live for the whole
/// loop, so repeated `show` calls answer from the cache.
pub fn run(settings: &Settings) -> Result<()> {
    let mut session = Session::new(true);
    println!("tsmeta interactive session. Type 'help' for commands, 'quit' to exit.");

    let stdin = io::stdin();
    let mut input = String::new();
    loop {
        print!("tsmeta> ");
        io::stdout().flush()?;

        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            // EOF ends the session like an explicit quit.
            println!();
            break;
        }
        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or("");
        let args: Vec<&str> = parts.collect();
        debug!("shell command '{command}' with {} arg(s)", args.len());

        let result = match command {
            "parse" => match args.as_slice() {
                [pattern] => {
                    commands::parse::run_in_session(pattern, false, settings, &mut session)
                }
                _ => usage("parse <path-or-pattern>"),
            },
            "load" => match args.as_slice() {
                [model] => {
                    commands::load::run_in_session(model, None, settings, &mut session)
                }
                [model, ts] => commands::load::run_in_session(
                    model,
                    Some(Path::new(ts)),
                    settings,
                    &mut session,
                ),
                _ => usage("load <model> [ts-file]"),
            },
            "attach" => match args.as_slice() {
                [ts, target] => commands::attach::run_in_session(
                    Path::new(ts),
                    target,
                    settings,
                    &mut session,
                ),
                _ => usage("attach <ts-file> <model>"),
            },
            "show" => match args.as_slice() {
                [] => commands::show::run_in_session(None, None, false, settings, &mut session),
                [key] => {
                    commands::show::run_in_session(Some(key), None, false, settings, &mut session)
                }
                [key, ts] => commands::show::run_in_session(
                    Some(key),
                    Some(Path::new(ts)),
                    false,
                    settings,
                    &mut session,
                ),
                _ => usage("show [key] [ts-file]"),
            },
            "list" => {
                if session.registry.is_empty() {
                    println!("(no models registered)");
                } else {
                    for name in session.registry.names() {
                        println!("  {name}");
                    }
                }
                Ok(())
            }
            "help" => {
                println!("{SHELL_HELP}");
                Ok(())
            }
            "quit" | "exit" => break,
            other => {
                println!("unknown command: {other} (try 'help')");
                Ok(())
            }
        };

        // Shell commands degrade to a printed diagnostic; the session
        // itself keeps running.
        if let Err(e) = result {
            println!("error: {e}");
        }
    }
    Ok(())
}

fn usage(text: &str) -> Result<()> {
    println!("usage: {text}");
    Ok(())
}
