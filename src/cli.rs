use crate::data::TimeRange;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Args {
    /// Ticker to open on start
    pub ticker: Option<String>,
    /// Open the comparison view with these two tickers
    pub compare: Option<(String, String)>,
    /// Backend base URL override
    pub api: Option<String>,
    pub range: Option<TimeRange>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Run(Args),
    Help,
    Version,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub code: i32,
    pub message: String,
}

impl ParseError {
    fn usage(message: String) -> Self {
        Self {
            code: 2,
            message: format!("{message}\n\n{}", help_text(env!("CARGO_PKG_NAME"))),
        }
    }
}

#[must_use]
pub fn help_text(bin_name: &str) -> String {
    indoc::formatdoc! {"
        Terminal stock dashboard

        Usage:
          {bin_name} [options]

        Options:
          -h, --help              Show this help
          -V, --version           Show version
              --ticker <SYMBOL>   Ticker to open on start
              --compare <A> <B>   Start in the comparison view
              --api <URL>         Backend base URL (default $TICKERDASH_API)
              --range <DAYS>      Chart range in days (default 90)
    "}
}

#[must_use]
pub fn version_text() -> String {
    format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

fn value(option: &str, args: &mut impl Iterator<Item = String>) -> Result<String, ParseError> {
    args.next()
        .filter(|value| !value.starts_with("--"))
        .ok_or_else(|| ParseError::usage(format!("Missing value for {option}")))
}

pub fn parse_args<I, S>(args: I) -> Result<Command, ParseError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut parsed = Args::default();
    let mut show_help = false;
    let mut show_version = false;

    let mut args = args.into_iter().map(Into::into);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => show_help = true,
            "-V" | "--version" => show_version = true,
            "--ticker" => parsed.ticker = Some(value("--ticker", &mut args)?),
            "--api" => parsed.api = Some(value("--api", &mut args)?),
            "--range" => {
                let raw = value("--range", &mut args)?;
                parsed.range = Some(TimeRange::from_input(Some(&raw)));
            }
            "--compare" => {
                let a = value("--compare", &mut args)?;
                let b = value("--compare", &mut args)?;
                parsed.compare = Some((a, b));
            }
            _ if arg.starts_with('-') => {
                return Err(ParseError::usage(format!("Unknown option: {arg}")));
            }
            _ => {
                return Err(ParseError::usage(format!(
                    "Unexpected argument: {arg}"
                )));
            }
        }
    }

    if show_help {
        return Ok(Command::Help);
    }

    if show_version {
        return Ok(Command::Version);
    }

    Ok(Command::Run(parsed))
}
