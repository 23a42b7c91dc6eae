#![doc = include_str!("../README.md")]

mod report;
mod settings;

use std::{
    io::{stderr, stdout, Write},
    process::ExitCode,
};

use clap::{error::ErrorKind, Command};
use colored::Colorize;
use log::debug;
use splits_query::{Error, QUERY_HELP};

use crate::settings::Settings;

fn main() -> ExitCode {
    let mut command = settings::command();
    let arg_matches = match command.try_get_matches_from_mut(std::env::args_os()) {
        Ok(arg_matches) => arg_matches,
        Err(err) => return usage_failure(&mut command, err),
    };

    let settings = Settings::from_matches(&arg_matches);
    settings.init_logging();
    let color = settings.apply_color();
    debug!("{:?}", settings);

    match splits_query::run(&settings.path, &settings.query, &settings.args) {
        Ok(result) => {
            write_out(&result);
            ExitCode::SUCCESS
        }
        Err(err) => {
            write_err(&err.to_string());
            if let (true, Error::Load(load_err)) = (settings.explain, &err) {
                report::explain(&settings.path, load_err, color);
            }
            ExitCode::FAILURE
        }
    }
}

fn usage_failure(command: &mut Command, err: clap::Error) -> ExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            err.print().ok();
            ExitCode::SUCCESS
        }
        ErrorKind::MissingRequiredArgument => {
            let mut stderr = stderr().lock();
            writeln!(stderr, "{}", command.render_usage()).ok();
            writeln!(stderr, "{}", QUERY_HELP).ok();
            stderr.flush().ok();
            ExitCode::FAILURE
        }
        _ => {
            err.print().ok();
            ExitCode::FAILURE
        }
    }
}

fn write_out(result: &str) {
    let mut stdout = stdout().lock();
    stdout.write_all(result.as_bytes()).ok();
    stdout.write_all(b"\n").ok();
    stdout.flush().ok();
}

fn write_err(message: &str) {
    let mut stderr = stderr().lock();
    stderr.write_all(message.red().to_string().as_bytes()).ok();
    stderr.write_all(b"\n").ok();
    stderr.flush().ok();
}
