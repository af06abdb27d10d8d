use std::fmt;
use std::path::PathBuf;

use services::{DEFAULT_QUESTION_COUNT, RemoveTarget};
use vocab_core::PoolSources;
use vocab_core::model::EntryId;

pub const DEFAULT_DB_URL: &str = "sqlite://vocab.sqlite3";

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArgument { command: &'static str, what: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidNumber { flag: &'static str, raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { command, what } => {
                write!(f, "{command} requires {what}")
            }
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Words,
    Add {
        source: String,
        target: String,
        transliteration: Option<String>,
    },
    Translate {
        source: String,
    },
    Scan {
        image: PathBuf,
    },
    Remove(RemoveTarget),
    Quiz {
        count: usize,
        sources: PoolSources,
    },
    Cards {
        sources: PoolSources,
    },
    /// `Some` stores a token, `None` signs out.
    Token(Option<String>),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub db_url: String,
    /// Overrides `VOCAB_API_BASE` when set.
    pub api_base: Option<String>,
    pub command: Command,
}

#[derive(Default)]
struct Flags {
    count: Option<usize>,
    transliteration: Option<String>,
    id: Option<EntryId>,
    position: Option<usize>,
    sources: PoolSources,
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_number<T: std::str::FromStr>(flag: &'static str, raw: String) -> Result<T, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

impl Args {
    /// Parse everything after the program name. `env_db_url` is the value of
    /// `VOCAB_DB_URL`, if any.
    pub fn parse(
        argv: impl IntoIterator<Item = String>,
        env_db_url: Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url = env_db_url
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut api_base = None;
        let mut flags = Flags::default();
        let mut positionals = Vec::new();

        let mut args = argv.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--api" => api_base = Some(require_value(&mut args, "--api")?),
                "--count" => {
                    flags.count = Some(parse_number(
                        "--count",
                        require_value(&mut args, "--count")?,
                    )?);
                }
                "--translit" => {
                    flags.transliteration = Some(require_value(&mut args, "--translit")?);
                }
                "--id" => {
                    let raw = require_value(&mut args, "--id")?;
                    let id = raw
                        .parse::<EntryId>()
                        .map_err(|_| ArgsError::InvalidNumber { flag: "--id", raw })?;
                    flags.id = Some(id);
                }
                "--local" => {
                    flags.position = Some(parse_number(
                        "--local",
                        require_value(&mut args, "--local")?,
                    )?);
                }
                "--no-defaults" => flags.sources.include_defaults = false,
                "--no-saved" => flags.sources.include_saved = false,
                "--help" | "-h" => positionals.insert(0, "help".to_string()),
                flag if flag.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => positionals.push(arg),
            }
        }

        let command = build_command(positionals, flags)?;
        Ok(Self {
            db_url,
            api_base,
            command,
        })
    }
}

fn build_command(positionals: Vec<String>, flags: Flags) -> Result<Command, ArgsError> {
    let mut rest = positionals.into_iter();
    let Some(name) = rest.next() else {
        return Ok(Command::Words);
    };

    let command = match name.as_str() {
        "help" => return Ok(Command::Help),
        "words" => Command::Words,
        "add" => {
            let source = rest.next().ok_or(ArgsError::MissingArgument {
                command: "add",
                what: "an English word",
            })?;
            let target = rest.next().ok_or(ArgsError::MissingArgument {
                command: "add",
                what: "a Tamil word",
            })?;
            Command::Add {
                source,
                target,
                transliteration: flags.transliteration,
            }
        }
        "translate" => Command::Translate {
            source: rest.next().ok_or(ArgsError::MissingArgument {
                command: "translate",
                what: "an English word",
            })?,
        },
        "scan" => Command::Scan {
            image: rest
                .next()
                .map(PathBuf::from)
                .ok_or(ArgsError::MissingArgument {
                    command: "scan",
                    what: "an image path",
                })?,
        },
        "remove" => match (flags.id, flags.position) {
            (Some(id), _) => Command::Remove(RemoveTarget::Remote(id)),
            (None, Some(position)) => Command::Remove(RemoveTarget::Local(position)),
            (None, None) => {
                return Err(ArgsError::MissingArgument {
                    command: "remove",
                    what: "--id <id> or --local <position>",
                });
            }
        },
        "quiz" => Command::Quiz {
            count: flags.count.unwrap_or(DEFAULT_QUESTION_COUNT),
            sources: flags.sources,
        },
        "cards" => Command::Cards {
            sources: flags.sources,
        },
        "token" => match rest.next().as_deref() {
            Some("set") => Command::Token(Some(rest.next().ok_or(
                ArgsError::MissingArgument {
                    command: "token set",
                    what: "a token",
                },
            )?)),
            Some("clear") => Command::Token(None),
            _ => {
                return Err(ArgsError::MissingArgument {
                    command: "token",
                    what: "set <token> or clear",
                });
            }
        },
        _ => return Err(ArgsError::UnknownCommand(name)),
    };

    if let Some(extra) = rest.next() {
        return Err(ArgsError::UnknownArg(extra));
    }
    Ok(command)
}

/// Turn a bare or `sqlite:` path into an absolute `sqlite://` URL.
pub fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim();
    let path = std::path::Path::new(trimmed.strip_prefix("sqlite:").unwrap_or(trimmed));
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// File behind a `sqlite://` url, query string removed. `None` for the
/// in-memory database.
pub fn sqlite_file_path(db_url: &str) -> Result<Option<PathBuf>, ArgsError> {
    if db_url == "sqlite::memory:" {
        return Ok(None);
    }
    let invalid = || ArgsError::InvalidDbUrl {
        raw: db_url.to_string(),
    };
    let rest = db_url.strip_prefix("sqlite://").ok_or_else(invalid)?;
    let path = rest.split_once('?').map_or(rest, |(path, _)| path);
    if path.is_empty() {
        return Err(invalid());
    }
    Ok(Some(PathBuf::from(path)))
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  app [words]                                  list saved words");
    eprintln!("  app add <english> <tamil> [--translit <t>]   save a word");
    eprintln!("  app translate <english>                      translate and save");
    eprintln!("  app scan <image>                             identify a picture and save");
    eprintln!("  app remove (--id <id> | --local <position>)  remove a word");
    eprintln!("  app quiz [--count <n>] [--no-defaults] [--no-saved]");
    eprintln!("  app cards [--no-defaults] [--no-saved]");
    eprintln!("  app token (set <token> | clear)");
    eprintln!();
    eprintln!("Global options:");
    eprintln!("  --db <sqlite_url>   default {DEFAULT_DB_URL}");
    eprintln!("  --api <base_url>    default {}", services::DEFAULT_API_BASE);
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  VOCAB_DB_URL, VOCAB_API_BASE, RUST_LOG");
}
