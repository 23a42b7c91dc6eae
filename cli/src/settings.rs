use std::{
    io::{stderr, IsTerminal},
    path::PathBuf,
};

use clap::{command, value_parser, Arg, ArgAction, ArgMatches, Command};
use splits_query::QUERY_HELP;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// Everything the command line can configure for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) path: PathBuf,
    pub(crate) query: String,
    pub(crate) args: Vec<String>,
    pub(crate) verbosity: u8,
    pub(crate) color: ColorWhen,
    pub(crate) explain: bool,
}

pub(crate) fn command() -> Command {
    command!()
        .about(
            r#"
splitq reads a JSON document describing audio splits and answers one
query about it. Results are written to standard out as a single line;
diagnostics go to standard error. Every failure exits with status 1.
"#,
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count)
                .help("log more detail to standard error; repeat for more (RUST_LOG overrides)"),
        )
        .arg(
            Arg::new("color")
                .long("color")
                .value_name("WHEN")
                .value_parser(["auto", "always", "never"])
                .default_value("auto")
                .help("colorize diagnostics (auto: only when standard error is a terminal)"),
        )
        .arg(
            Arg::new("explain")
                .long("explain")
                .action(ArgAction::SetTrue)
                .help("show where in the file a JSON syntax error was found"),
        )
        .arg(
            Arg::new("json_file")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("the JSON document to read"),
        )
        .arg(
            Arg::new("query")
                .required(true)
                .help("the query to run (see below)"),
        )
        .arg(
            Arg::new("args")
                .num_args(0..)
                .allow_hyphen_values(true)
                .allow_negative_numbers(true)
                .help("query arguments, such as a split index and field name"),
        )
        .after_help(QUERY_HELP)
}

impl Settings {
    pub(crate) fn from_matches(matches: &ArgMatches) -> Self {
        let color = match matches.get_one::<String>("color").map(String::as_str) {
            Some("always") => ColorWhen::Always,
            Some("never") => ColorWhen::Never,
            _ => ColorWhen::Auto,
        };

        Self {
            path: matches
                .get_one::<PathBuf>("json_file")
                .cloned()
                .unwrap_or_default(),
            query: matches
                .get_one::<String>("query")
                .cloned()
                .unwrap_or_default(),
            args: matches
                .get_many::<String>("args")
                .map(|args| args.cloned().collect())
                .unwrap_or_default(),
            verbosity: matches.get_count("verbose"),
            color,
            explain: matches.get_flag("explain"),
        }
    }

    pub(crate) fn log_filter(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    pub(crate) fn init_logging(&self) {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(self.log_filter()))
            .format_timestamp(None)
            .try_init()
            .ok();
    }

    /// Decides whether diagnostics are colored and tells `colored` about it.
    pub(crate) fn apply_color(&self) -> bool {
        let color = match self.color {
            ColorWhen::Always => true,
            ColorWhen::Never => false,
            ColorWhen::Auto => stderr().is_terminal(),
        };
        colored::control::set_override(color);
        color
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::error::ErrorKind;

    use super::{command, ColorWhen, Settings};

    fn settings(args: &[&str]) -> Settings {
        let matches = command()
            .try_get_matches_from(std::iter::once("splitq").chain(args.iter().copied()))
            .unwrap();
        Settings::from_matches(&matches)
    }

    #[test]
    fn command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn positionals() {
        let settings = settings(&["splits.json", "get_field", "0", "name"]);
        assert_eq!(PathBuf::from("splits.json"), settings.path);
        assert_eq!("get_field", settings.query);
        assert_eq!(vec!["0".to_string(), "name".to_string()], settings.args);
        assert_eq!(0, settings.verbosity);
        assert_eq!(ColorWhen::Auto, settings.color);
        assert!(!settings.explain);
    }

    #[test]
    fn negative_index_is_an_argument() {
        let settings = settings(&["splits.json", "get_split", "-1"]);
        assert_eq!(vec!["-1".to_string()], settings.args);
    }

    #[test]
    fn options() {
        let settings = settings(&["-vv", "--color", "never", "--explain", "a.json", "count"]);
        assert_eq!(2, settings.verbosity);
        assert_eq!("debug", settings.log_filter());
        assert_eq!(ColorWhen::Never, settings.color);
        assert!(settings.explain);
        assert!(settings.args.is_empty());
    }

    #[test]
    fn too_few_positionals() {
        for args in [vec!["splitq"], vec!["splitq", "a.json"]] {
            let err = command().try_get_matches_from(args).unwrap_err();
            assert_eq!(ErrorKind::MissingRequiredArgument, err.kind());
        }
    }

    #[test]
    fn rejects_unknown_color() {
        let err = command()
            .try_get_matches_from(["splitq", "--color", "sometimes", "a.json", "count"])
            .unwrap_err();
        assert_eq!(ErrorKind::InvalidValue, err.kind());
    }
}
