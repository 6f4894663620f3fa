// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask
//!
//! Development tasks for the shiftbot workspace, run as `cargo xtask <task>`.
//!
//! - `clippy`, `fmt`, `docs` and `test` wrap the matching cargo commands
//!   with the flags CI uses
//! - `verify-migrations` checks the persistence migrations against an
//!   in-memory `SQLite` database
//! - `ci` runs all of the above in order
//!
//! ### Migration check
//!
//! The embedded migrations are applied, reverted and applied again. The
//! check fails unless reverting leaves no table behind, both applications
//! produce the same tables, columns, foreign keys and indexes, and the
//! tables and columns (with their nullability) match `diesel_schema.rs`.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::process::Output;

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{
    eyre::{bail, eyre, Context},
    Result,
};
use diesel::sql_types::{Integer, Text};
use diesel::{Connection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");

/// Diesel table definitions the migrations must agree with.
const DIESEL_SCHEMA: &str = include_str!("../../crates/persistence/src/diesel_schema.rs");

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    if let Err(err) = args.command.run() {
        tracing::error!("{err}");
        std::process::exit(1);
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Task,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Copy, Debug, Subcommand)]
enum Task {
    /// Run clippy, the format check, docs, tests and the migration check
    Ci,

    /// Run clippy with warnings denied
    #[command(visible_alias = "cl")]
    Clippy,

    /// Check formatting, or rewrite it with `--fix`
    #[command(visible_alias = "f")]
    Fmt {
        /// Rewrite files instead of checking them
        #[arg(long)]
        fix: bool,
    },

    /// Build the documentation of every workspace crate with warnings denied
    #[command(visible_alias = "d")]
    Docs,

    /// Run unit, integration and doc tests
    #[command(visible_alias = "t")]
    Test,

    /// Check the migrations round-trip and match the Diesel schema
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Task {
    fn run(self) -> Result<()> {
        match self {
            Self::Ci => {
                for task in [
                    Self::Clippy,
                    Self::Fmt { fix: false },
                    Self::Docs,
                    Self::Test,
                    Self::VerifyMigrations,
                ] {
                    task.run()?;
                }
                Ok(())
            }
            Self::Clippy => cargo(&[
                "clippy",
                "--workspace",
                "--all-targets",
                "--all-features",
                "--",
                "-D",
                "warnings",
            ]),
            Self::Fmt { fix: true } => cargo(&["fmt", "--all"]),
            Self::Fmt { fix: false } => cargo(&["fmt", "--all", "--check"]),
            Self::Docs => docs(),
            Self::Test => {
                cargo(&["test", "--workspace", "--all-targets", "--all-features"])?;
                cargo(&["test", "--workspace", "--doc", "--all-features"])
            }
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

/// Runs `cargo` with the given arguments.
fn cargo(args: &[&str]) -> Result<()> {
    cmd("cargo", args.iter().copied()).run_with_trace()?;
    Ok(())
}

/// Documents each workspace package on its own so a failure names the crate.
fn docs() -> Result<()> {
    let metadata = MetadataCommand::new()
        .exec()
        .wrap_err("failed to read cargo metadata")?;

    for package in metadata.workspace_packages() {
        cmd!(
            "cargo",
            "doc",
            "--no-deps",
            "--all-features",
            "--package",
            package.name.as_str()
        )
        .env("RUSTDOCFLAGS", "-D warnings")
        .run_with_trace()?;
    }
    Ok(())
}

/// Applies, reverts and re-applies the migrations and checks the result.
fn verify_migrations() -> Result<()> {
    tracing::info!("Verifying migrations against an in-memory SQLite database");

    let mut conn = SqliteConnection::establish(":memory:")
        .wrap_err("failed to open an in-memory SQLite database")?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("failed to apply migrations: {e}"))?;
    let applied: Schema = Schema::introspect(&mut conn)?;
    tracing::info!(tables = applied.tables.len(), "Migrations applied");

    conn.revert_all_migrations(MIGRATIONS)
        .map_err(|e| eyre!("failed to revert migrations: {e}"))?;
    let leftover: Schema = Schema::introspect(&mut conn)?;
    if !leftover.tables.is_empty() {
        bail!(
            "tables left after reverting: {:?}",
            leftover.tables.keys().collect::<Vec<_>>()
        );
    }

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("failed to re-apply migrations: {e}"))?;
    let reapplied: Schema = Schema::introspect(&mut conn)?;
    if applied != reapplied {
        bail!("schema differs after re-applying migrations\n  first: {applied:?}\n  second: {reapplied:?}");
    }

    applied.check_declared(&declared_columns(DIESEL_SCHEMA))?;

    tracing::info!("Migrations verified");
    Ok(())
}

/// A column as `PRAGMA table_info` reports it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, QueryableByName)]
struct ColumnRow {
    #[diesel(sql_type = Text)]
    table_name: String,
    #[diesel(sql_type = Text)]
    column_name: String,
    #[diesel(sql_type = Text)]
    column_type: String,
    #[diesel(sql_type = Integer)]
    not_null: i32,
    #[diesel(sql_type = Integer)]
    pk: i32,
}

/// A foreign key as `PRAGMA foreign_key_list` reports it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, QueryableByName)]
struct ForeignKeyRow {
    #[diesel(sql_type = Text)]
    table_name: String,
    #[diesel(sql_type = Text)]
    from_column: String,
    #[diesel(sql_type = Text)]
    to_table: String,
    #[diesel(sql_type = Text)]
    on_delete: String,
}

/// One indexed column of a named index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, QueryableByName)]
struct IndexRow {
    #[diesel(sql_type = Text)]
    table_name: String,
    #[diesel(sql_type = Text)]
    index_name: String,
    #[diesel(sql_type = Integer)]
    is_unique: i32,
    #[diesel(sql_type = Text)]
    column_name: String,
}

/// Selects user tables from `sqlite_master m`; internal and Diesel
/// bookkeeping tables are skipped.
const USER_TABLES: &str = "m.type = 'table' \
     AND m.name NOT LIKE 'sqlite_%' \
     AND m.name != '__diesel_schema_migrations'";

#[derive(Debug, Default, PartialEq, Eq)]
struct TableShape {
    columns: BTreeSet<ColumnRow>,
    foreign_keys: BTreeSet<ForeignKeyRow>,
    indexes: BTreeSet<IndexRow>,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Schema {
    tables: BTreeMap<String, TableShape>,
}

impl Schema {
    /// Reads tables, columns, foreign keys and indexes through the pragma
    /// table-valued functions.
    fn introspect(conn: &mut SqliteConnection) -> Result<Self> {
        let columns: Vec<ColumnRow> = diesel::sql_query(format!(
            "SELECT m.name AS table_name, p.name AS column_name, \
             upper(p.type) AS column_type, p.\"notnull\" AS not_null, p.pk AS pk \
             FROM sqlite_master m JOIN pragma_table_info(m.name) p \
             WHERE {USER_TABLES}"
        ))
        .load(conn)
        .wrap_err("failed to read columns")?;

        let foreign_keys: Vec<ForeignKeyRow> = diesel::sql_query(format!(
            "SELECT m.name AS table_name, f.\"from\" AS from_column, \
             f.\"table\" AS to_table, f.on_delete AS on_delete \
             FROM sqlite_master m JOIN pragma_foreign_key_list(m.name) f \
             WHERE {USER_TABLES}"
        ))
        .load(conn)
        .wrap_err("failed to read foreign keys")?;

        let indexes: Vec<IndexRow> = diesel::sql_query(format!(
            "SELECT m.name AS table_name, l.name AS index_name, \
             l.\"unique\" AS is_unique, i.name AS column_name \
             FROM sqlite_master m JOIN pragma_index_list(m.name) l \
             JOIN pragma_index_info(l.name) i \
             WHERE {USER_TABLES}"
        ))
        .load(conn)
        .wrap_err("failed to read indexes")?;

        let mut schema = Self::default();
        for column in columns {
            schema
                .tables
                .entry(column.table_name.clone())
                .or_default()
                .columns
                .insert(column);
        }
        for key in foreign_keys {
            schema
                .tables
                .entry(key.table_name.clone())
                .or_default()
                .foreign_keys
                .insert(key);
        }
        for index in indexes {
            schema
                .tables
                .entry(index.table_name.clone())
                .or_default()
                .indexes
                .insert(index);
        }
        Ok(schema)
    }

    /// Fails unless tables, column names and nullability match `declared`.
    fn check_declared(&self, declared: &BTreeMap<String, BTreeMap<String, bool>>) -> Result<()> {
        let migrated: BTreeSet<&String> = self.tables.keys().collect();
        let expected: BTreeSet<&String> = declared.keys().collect();
        if migrated != expected {
            bail!("table mismatch\n  migrated: {migrated:?}\n  declared: {expected:?}");
        }

        for (table_name, shape) in &self.tables {
            let columns: BTreeMap<String, bool> = shape
                .columns
                .iter()
                // SQLite reports an INTEGER PRIMARY KEY as nullable.
                .map(|c| (c.column_name.clone(), c.not_null == 0 && c.pk == 0))
                .collect();
            if columns != declared[table_name] {
                bail!(
                    "column mismatch in '{table_name}' (name -> nullable)\n  migrated: {columns:?}\n  declared: {:?}",
                    declared[table_name]
                );
            }
        }
        Ok(())
    }
}

/// Extracts `table -> column -> nullable` from `diesel::table!` blocks.
///
/// Expects the layout `diesel print-schema` writes: a `name (pk) {` line
/// followed by one `column -> Type,` line per column.
fn declared_columns(source: &str) -> BTreeMap<String, BTreeMap<String, bool>> {
    let mut tables: BTreeMap<String, BTreeMap<String, bool>> = BTreeMap::new();
    let mut current: Option<String> = None;

    for line in source.lines().map(str::trim) {
        if line.starts_with("diesel::table!") || line.starts_with('}') {
            current = None;
        } else if current.is_none() && line.ends_with('{') {
            if let Some((name, _)) = line.split_once(' ') {
                tables.entry(name.to_string()).or_default();
                current = Some(name.to_string());
            }
        } else if let (Some(table), Some((column, ty))) = (&current, line.split_once("->")) {
            if let Some(columns) = tables.get_mut(table) {
                columns.insert(
                    column.trim().to_string(),
                    ty.trim().starts_with("Nullable<"),
                );
            }
        }
    }

    tables
}

/// Logs a `duct` expression before running it.
trait ExpressionExt {
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
