mod archive;
mod database;
mod errors;
mod services;

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use sea_orm::{ActiveModelTrait, Set};
use sea_orm_migration::MigratorTrait;
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::archive::manifest::ExportKind;
use crate::database::migrations::Migrator;
use crate::database::{establish_connection, get_database_url};
use crate::services::{validate_archive, ExportService, ImportResult, ImportService};

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a backup archive to disk
    Export {
        #[clap(short, long, default_value = "worklog.db")]
        database: String,
        #[clap(short, long)]
        user_id: i32,
        #[clap(short, long)]
        output: String,
        /// Archive shape: full, worklog or system
        #[clap(short, long, default_value = "full")]
        kind: String,
        /// Inclusive range start (YYYY-MM-DD)
        #[clap(long)]
        start_date: Option<String>,
        /// Inclusive range end (YYYY-MM-DD)
        #[clap(long)]
        end_date: Option<String>,
        #[clap(long)]
        include_attachments: bool,
    },
    /// Pre-flight check an archive without touching any database
    Validate {
        #[clap(short, long)]
        file: String,
        #[clap(short, long, default_value = "full")]
        kind: String,
    },
    /// Import a backup archive into a user's account
    Import {
        #[clap(short, long, default_value = "worklog.db")]
        database: String,
        #[clap(short, long)]
        user_id: i32,
        #[clap(short, long)]
        file: String,
        #[clap(short, long, default_value = "full")]
        kind: String,
    },
    /// Database maintenance
    Db {
        #[clap(subcommand)]
        command: DbCommands,
    },
    /// User administration
    User {
        #[clap(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
enum DbCommands {
    /// Run pending migrations
    Migrate {
        #[clap(short, long, default_value = "worklog.db")]
        database: String,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a user row so export/import have an owner
    Add {
        #[clap(short, long, default_value = "worklog.db")]
        database: String,
        #[clap(short, long)]
        username: String,
        #[clap(short, long)]
        email: Option<String>,
        #[clap(long)]
        admin: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    match cli.command {
        Commands::Export {
            database,
            user_id,
            output,
            kind,
            start_date,
            end_date,
            include_attachments,
        } => {
            let kind = parse_kind(&kind)?;
            let start_date = parse_date(start_date.as_deref())?;
            let end_date = parse_date(end_date.as_deref())?;

            let db = establish_connection(&get_database_url(Some(&database))).await?;
            let service = ExportService::new(db);

            let bytes = match kind {
                ExportKind::Full => {
                    let manifest = service
                        .export_full(user_id, start_date, end_date, include_attachments)
                        .await?;
                    let files = if include_attachments {
                        Some(service.collect_attachment_files(&manifest.todos).await?)
                    } else {
                        None
                    };
                    service.build_full_archive(&manifest, files.as_ref())?
                }
                ExportKind::WorkLogData => {
                    let manifest = service
                        .export_work_log_data(user_id, start_date, end_date, include_attachments)
                        .await?;
                    let files = if include_attachments {
                        Some(service.collect_attachment_files(&manifest.todos).await?)
                    } else {
                        None
                    };
                    service.build_work_log_archive(&manifest, files.as_ref())?
                }
                ExportKind::SystemData => {
                    let manifest = service.export_system_data(user_id).await?;
                    service.build_system_archive(&manifest)?
                }
            };

            std::fs::write(&output, &bytes)?;
            info!("Wrote {} ({} bytes)", output, bytes.len());
        }
        Commands::Validate { file, kind } => {
            let kind = parse_kind(&kind)?;
            let bytes = std::fs::read(&file)?;
            let result = validate_archive(&bytes, kind);
            print_result(&result);
            if !result.success {
                std::process::exit(1);
            }
        }
        Commands::Import {
            database,
            user_id,
            file,
            kind,
        } => {
            let kind = parse_kind(&kind)?;
            let bytes = std::fs::read(&file)?;

            let db = establish_connection(&get_database_url(Some(&database))).await?;
            let service = ImportService::new(db);

            let result = match kind {
                ExportKind::Full => service.import_full(user_id, &bytes).await,
                ExportKind::WorkLogData => service.import_work_log_data(user_id, &bytes).await,
                ExportKind::SystemData => service.import_system_data(user_id, &bytes).await,
            };
            print_result(&result);
            if !result.success {
                std::process::exit(1);
            }
        }
        Commands::Db { command } => match command {
            DbCommands::Migrate { database } => {
                let db = establish_connection(&get_database_url(Some(&database))).await?;
                Migrator::up(&db, None).await?;
                info!("Migrations applied to {}", database);
            }
        },
        Commands::User { command } => match command {
            UserCommands::Add {
                database,
                username,
                email,
                admin,
            } => {
                let db = establish_connection(&get_database_url(Some(&database))).await?;
                let user = crate::database::entities::users::ActiveModel {
                    username: Set(username),
                    email: Set(email.unwrap_or_default()),
                    password_hash: Set(String::new()),
                    role: Set(if admin { "Admin" } else { "User" }.to_string()),
                    is_active: Set(true),
                    created_at: Set(Utc::now()),
                    updated_at: Set(None),
                    ..Default::default()
                }
                .insert(&db)
                .await?;
                info!("Created user {} (id {})", user.username, user.id);
            }
        },
    }

    Ok(())
}

fn parse_kind(value: &str) -> Result<ExportKind> {
    match value.to_lowercase().as_str() {
        "full" => Ok(ExportKind::Full),
        "worklog" | "worklogdata" => Ok(ExportKind::WorkLogData),
        "system" | "systemdata" => Ok(ExportKind::SystemData),
        other => Err(anyhow!(
            "Unknown archive kind '{}', expected full, worklog or system",
            other
        )),
    }
}

fn parse_date(value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    match value {
        None => Ok(None),
        Some(raw) => {
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|e| anyhow!("Invalid date '{}': {}", raw, e))?;
            let midnight = date
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| anyhow!("Invalid date '{}'", raw))?;
            Ok(Some(DateTime::from_naive_utc_and_offset(midnight, Utc)))
        }
    }
}

fn print_result(result: &ImportResult) {
    if result.success {
        println!("{} {}", "OK".green().bold(), result.message);
    } else {
        println!("{} {}", "FAILED".red().bold(), result.message);
    }

    let stats = &result.statistics;
    let lookup_lines = [
        ("Projects", stats.projects_created, stats.projects_skipped),
        ("Departments", stats.departments_created, stats.departments_skipped),
        ("Work types", stats.work_types_created, stats.work_types_skipped),
        (
            "Process statuses",
            stats.process_statuses_created,
            stats.process_statuses_skipped,
        ),
        (
            "Todo categories",
            stats.todo_categories_created,
            stats.todo_categories_skipped,
        ),
    ];
    for (label, created, skipped) in lookup_lines {
        if created > 0 || skipped > 0 {
            println!("  {}: {} created, {} skipped", label, created, skipped);
        }
    }
    if stats.work_logs_imported > 0 || stats.work_logs_failed > 0 {
        println!(
            "  Work logs: {} imported, {} failed",
            stats.work_logs_imported, stats.work_logs_failed
        );
    }
    if stats.todos_imported > 0 || stats.todos_failed > 0 {
        println!(
            "  Todos: {} imported, {} failed ({} subtasks, {} comments, {} attachments)",
            stats.todos_imported,
            stats.todos_failed,
            stats.sub_tasks_imported,
            stats.comments_imported,
            stats.attachments_imported
        );
    }

    for warning in &result.warnings {
        println!("  {} {}", "warning:".yellow(), warning);
    }
    for error in &result.errors {
        println!("  {} {}", "error:".red(), error);
    }
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("sqlx=warn,{}", log_level)))
        .without_time()
        .init();
}
