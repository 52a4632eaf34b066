//! Operator CLI for the golf scoring engine.
//!
//! Finalizes competitions, prints series and tour standings, and applies
//! the database schema.

mod config;

use std::sync::Arc;

use anyhow::{Error, anyhow, bail};
use golf_scoring::{
    CompetitionLocks, Database, PgScoringStore, ResultsManager, ScoringType, Standings,
    StandingsManager, StandingsScope, standings::CompetitionBreakdown,
};
use log::info;
use pico_args::Arguments;

use config::AdminConfig;

const HELP: &str = "\
Finalize golf competitions and print standings

USAGE:
  gs_admin [OPTIONS] <COMMAND>

COMMANDS:
  finalize <ID>                Compute and store the results of a competition
  standings                    Print series or tour standings
  schema                       Create missing database tables

STANDINGS OPTIONS:
  --series     ID              Team standings across a series
  --tour       ID              Player standings across a tour
  --scoring    gross|net       Scoring type  [default: env DEFAULT_SCORING_TYPE or gross]
  --entity     ID              Per-competition breakdown of one team or player

OPTIONS:
  --db-url     URL             Database connection string  [default: env DATABASE_URL]

FLAGS:
  --json                       Print JSON instead of text
  -h, --help                   Print help information

ENVIRONMENT:
  DATABASE_URL                 PostgreSQL connection string
  DB_MAX_CONNECTIONS           Maximum pool size
  DEFAULT_SCORING_TYPE         Scoring type for standings
  RUST_LOG                     Log filter (e.g. info, golf_scoring=debug)
";

enum Command {
    Finalize(i64),
    Standings {
        scope: StandingsScope,
        scoring_type: Option<ScoringType>,
        entity: Option<i64>,
    },
    Schema,
}

struct Args {
    command: Command,
    database_url: Option<String>,
    json: bool,
}

fn parse_args(mut pargs: Arguments) -> Result<Args, Error> {
    let json = pargs.contains("--json");
    let database_url = pargs.opt_value_from_str("--db-url")?;

    let command = match pargs.subcommand()?.as_deref() {
        Some("finalize") => Command::Finalize(pargs.free_from_str()?),
        Some("standings") => {
            let series: Option<i64> = pargs.opt_value_from_str("--series")?;
            let tour: Option<i64> = pargs.opt_value_from_str("--tour")?;
            let scope = match (series, tour) {
                (Some(id), None) => StandingsScope::Series(id),
                (None, Some(id)) => StandingsScope::Tour(id),
                _ => bail!("standings needs exactly one of --series or --tour"),
            };
            Command::Standings {
                scope,
                scoring_type: pargs.opt_value_from_str("--scoring")?,
                entity: pargs.opt_value_from_str("--entity")?,
            }
        }
        Some("schema") => Command::Schema,
        Some(other) => bail!("unknown command: {other}"),
        None => bail!("missing command, see --help"),
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        bail!("unexpected arguments: {remaining:?}");
    }

    Ok(Args {
        command,
        database_url,
        json,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = parse_args(pargs)?;

    env_logger::builder().format_target(false).init();

    let config = AdminConfig::from_env(args.database_url)?;
    config.validate()?;

    let db = Database::new(&config.database)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;
    info!("Database connected successfully");

    let store = Arc::new(PgScoringStore::new(db.pool().clone()));

    match args.command {
        Command::Schema => {
            db.apply_schema().await?;
            info!("Schema applied");
        }
        Command::Finalize(competition_id) => {
            let results = ResultsManager::new(store, CompetitionLocks::new());
            let summary = results.finalize(competition_id).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "Competition {}: {} result rows, {} finished, field size {}",
                    summary.competition_id,
                    summary.rows_written,
                    summary.finished,
                    summary.field_size
                );
            }
        }
        Command::Standings {
            scope,
            scoring_type,
            entity,
        } => {
            let scoring_type = scoring_type.unwrap_or(config.default_scoring_type);
            let standings = StandingsManager::new(store);
            match entity {
                Some(entity_id) => {
                    let lines = standings
                        .entity_breakdown(scope, scoring_type, entity_id)
                        .await?;
                    if args.json {
                        println!("{}", serde_json::to_string_pretty(&lines)?);
                    } else {
                        print_breakdown(&lines);
                    }
                }
                None => {
                    let table = standings.compute_standings(scope, scoring_type).await?;
                    if args.json {
                        println!("{}", serde_json::to_string_pretty(&table)?);
                    } else {
                        print_standings(&table);
                    }
                }
            }
        }
    }

    db.close().await;
    Ok(())
}

fn print_standings(standings: &Standings) {
    println!(
        "Standings for {} ({}), {} competition(s)",
        standings.scope, standings.scoring_type, standings.total_competitions
    );
    for entry in &standings.entries {
        println!(
            "{:>4}  {:<32} {:>6} pts  {:>3} played",
            entry.position, entry.entity_name, entry.total_points, entry.competitions_played
        );
    }
}

fn print_breakdown(lines: &[CompetitionBreakdown]) {
    use golf_scoring::standings::ParticipationStatus;

    for line in lines {
        let status = match line.status {
            ParticipationStatus::Played { position, points } if position > 0 => {
                format!("position {position}, {points} pts")
            }
            ParticipationStatus::Played { points, .. } => format!("did not finish, {points} pts"),
            ParticipationStatus::Future => "upcoming".to_string(),
            ParticipationStatus::NotParticipated => "did not play".to_string(),
        };
        println!(
            "{}  {:<32} {}",
            line.starts_at.format("%Y-%m-%d"),
            line.competition_name,
            status
        );
    }
}
