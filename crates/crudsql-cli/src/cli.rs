use std::path::PathBuf;

pub const DEFAULT_CONFIG: &str = "crudsql.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Select,
    Insert,
    Update,
    Delete,
    Ping,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help(HelpTopic),
    Select(SelectArgs),
    Insert(InsertArgs),
    Update(UpdateArgs),
    Delete(DeleteArgs),
    Ping,
}

/// Options accepted by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalArgs {
    pub config: PathBuf,
    /// `--config` was given; a missing file is then an error.
    pub config_explicit: bool,
    pub database: Option<String>,
    pub debug: bool,
    pub inline: bool,
}

impl Default for GlobalArgs {
    fn default() -> Self {
        Self {
            config: PathBuf::from(DEFAULT_CONFIG),
            config_explicit: false,
            database: None,
            debug: false,
            inline: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub global: GlobalArgs,
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectArgs {
    pub table: String,
    pub columns: Vec<String>,
    pub join: Option<String>,
    pub condition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertArgs {
    pub table: String,
    pub columns: Vec<String>,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateArgs {
    pub table: String,
    pub columns: Vec<String>,
    pub values: Vec<String>,
    pub condition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteArgs {
    pub table: String,
    pub condition: Option<String>,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Invocation> {
    let mut global = GlobalArgs::default();
    let mut command: Option<&str> = None;
    let mut positionals: Vec<String> = Vec::new();
    let mut join: Option<String> = None;
    let mut condition: Option<String> = None;
    let mut help = false;

    let mut it = args.iter().skip(1).map(|s| s.as_str());
    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => help = true,
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                global.config = PathBuf::from(v);
                global.config_explicit = true;
            }
            _ if token.starts_with("--config=") => {
                global.config = PathBuf::from(token.trim_start_matches("--config="));
                global.config_explicit = true;
            }
            "--database" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--database requires a value");
                };
                global.database = Some(v.to_string());
            }
            _ if token.starts_with("--database=") => {
                global.database = Some(token.trim_start_matches("--database=").to_string());
            }
            "--debug" => global.debug = true,
            "--inline" => global.inline = true,
            "--join" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--join requires a value");
                };
                join = Some(v.to_string());
            }
            _ if token.starts_with("--join=") => {
                join = Some(token.trim_start_matches("--join=").to_string());
            }
            "--where" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--where requires a value");
                };
                condition = Some(v.to_string());
            }
            _ if token.starts_with("--where=") => {
                condition = Some(token.trim_start_matches("--where=").to_string());
            }
            _ if token.starts_with("--") => anyhow::bail!("unknown argument: {token}"),
            _ if command.is_none() => command = Some(token),
            _ => positionals.push(token.to_string()),
        }
    }

    let command = match command {
        None | Some("help") => Command::Help(match positionals.first().map(String::as_str) {
            None => HelpTopic::Root,
            Some(topic) => help_topic(topic)?,
        }),
        Some(name) if help => Command::Help(help_topic(name)?),
        Some("select") => {
            let [table, columns] = take_positionals("select", positionals)?;
            Command::Select(SelectArgs {
                table,
                columns: split_csv(&columns),
                join,
                condition,
            })
        }
        Some("insert") => {
            reject_flag("insert", "--where", condition.is_some())?;
            reject_flag("insert", "--join", join.is_some())?;
            let [table, columns, values] = take_positionals("insert", positionals)?;
            Command::Insert(InsertArgs {
                table,
                columns: split_csv(&columns),
                values: split_values(&values),
            })
        }
        Some("update") => {
            reject_flag("update", "--join", join.is_some())?;
            let [table, columns, values] = take_positionals("update", positionals)?;
            Command::Update(UpdateArgs {
                table,
                columns: split_csv(&columns),
                values: split_values(&values),
                condition,
            })
        }
        Some("delete") => {
            reject_flag("delete", "--join", join.is_some())?;
            let [table] = take_positionals("delete", positionals)?;
            Command::Delete(DeleteArgs { table, condition })
        }
        Some("ping") => {
            let [] = take_positionals("ping", positionals)?;
            Command::Ping
        }
        Some(other) => anyhow::bail!("unknown command: {other}"),
    };

    Ok(Invocation { global, command })
}

fn help_topic(name: &str) -> anyhow::Result<HelpTopic> {
    Ok(match name {
        "select" => HelpTopic::Select,
        "insert" => HelpTopic::Insert,
        "update" => HelpTopic::Update,
        "delete" => HelpTopic::Delete,
        "ping" => HelpTopic::Ping,
        "help" => HelpTopic::Root,
        other => anyhow::bail!("unknown command: {other}"),
    })
}

fn take_positionals<const N: usize>(
    command: &str,
    positionals: Vec<String>,
) -> anyhow::Result<[String; N]> {
    let got = positionals.len();
    positionals.try_into().map_err(|_| {
        anyhow::anyhow!(
            "{command} expects {N} argument(s), got {got}; run `crudsql {command} --help`"
        )
    })
}

fn reject_flag(command: &str, flag: &str, present: bool) -> anyhow::Result<()> {
    if present {
        anyhow::bail!("{flag} is not supported by {command}");
    }
    Ok(())
}

/// Comma-separated names; items are trimmed and empty items dropped.
fn split_csv(v: &str) -> Vec<String> {
    v.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Comma-separated values; items are trimmed and an empty item is the empty string.
fn split_values(v: &str) -> Vec<String> {
    v.split(',').map(|s| s.trim().to_string()).collect()
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
crudsql - validated CRUD statements against PostgreSQL

USAGE:
  crudsql [OPTIONS] <COMMAND> [ARGS]

COMMANDS:
  select        Read rows and print them as JSON
  insert        Insert one row
  update        Update the rows matching a condition
  delete        Delete the rows matching a condition
  ping          Check that the database is reachable
  help          Print help

OPTIONS:
  --config <FILE>       Config file path (default: crudsql.toml)
  --database <URL>      Override the database from config and environment
  --debug               Log the executed SQL
  --inline              Render values as SQL literals instead of parameters
  -h, --help            Print help

Lists (<COLS>, <VALS>) are comma separated. The value NULL is SQL NULL; an empty
value (as in \"x,\") is the empty string.
Run `crudsql <command> --help` for more."
            );
        }
        HelpTopic::Select => {
            println!(
                "\
USAGE:
  crudsql select <TABLE> <COLS> [--join <CLAUSE>] [--where <CONDITION>]

OPTIONS:
  --join <CLAUSE>       Join clause copied verbatim (e.g. \"INNER JOIN b ON b.id = a.b_id\");
                        requires --where
  --where <CONDITION>   Condition copied verbatim after WHERE

Rows are printed to stdout as a JSON array of objects."
            );
        }
        HelpTopic::Insert => {
            println!(
                "\
USAGE:
  crudsql insert <TABLE> <COLS> <VALS>

Prints the number of inserted rows."
            );
        }
        HelpTopic::Update => {
            println!(
                "\
USAGE:
  crudsql update <TABLE> <COLS> <VALS> --where <CONDITION>

A condition is required. Prints the number of updated rows."
            );
        }
        HelpTopic::Delete => {
            println!(
                "\
USAGE:
  crudsql delete <TABLE> --where <CONDITION>

A condition is required. Prints the number of deleted rows."
            );
        }
        HelpTopic::Ping => {
            println!(
                "\
USAGE:
  crudsql ping

Opens a connection, runs SELECT 1 and closes it."
            );
        }
    }
}
