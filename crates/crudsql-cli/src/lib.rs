mod cli;
mod config;
mod logging;

use crudsql::{CrudDb, Record};
use std::io::Write;

pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let invocation = cli::parse_args(&args)?;
    if let cli::Command::Help(topic) = invocation.command {
        cli::print_help(topic);
        return Ok(());
    }

    let settings = config::resolve(&invocation.global)?;
    logging::init(settings.options.is_debug())?;
    tracing::debug!(database = %settings.descriptor.redacted_dsn(), "resolved settings");

    let db = CrudDb::new(settings.descriptor).with_options(settings.options);

    match invocation.command {
        cli::Command::Help(_) => Ok(()),
        cli::Command::Select(args) => {
            let rows = db
                .select(
                    &args.table,
                    &args.columns,
                    args.join.as_deref(),
                    args.condition.as_deref(),
                    false,
                )
                .await?;
            print_rows(&rows)
        }
        cli::Command::Insert(args) => {
            let n = db
                .insert(&args.table, &args.columns, &args.values, false)
                .await?;
            println!("{n}");
            Ok(())
        }
        cli::Command::Update(args) => {
            let n = db
                .update(
                    &args.table,
                    &args.columns,
                    &args.values,
                    args.condition.as_deref(),
                    false,
                )
                .await?;
            println!("{n}");
            Ok(())
        }
        cli::Command::Delete(args) => {
            let n = db
                .delete(&args.table, args.condition.as_deref(), false)
                .await?;
            println!("{n}");
            Ok(())
        }
        cli::Command::Ping => {
            db.ping().await?;
            println!("ok");
            Ok(())
        }
    }
}

fn print_rows(rows: &[Record]) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, rows)?;
    writeln!(out)?;
    Ok(())
}
