//! MySQL connection bootstrap and per-film persistence.
//!
//! The sampling pipeline stores its film index as one table per film,
//! each holding a single unique `character_name` column. The database is
//! created lazily on first run; tables are created if absent and never
//! dropped. Inserts use `INSERT IGNORE`, so re-running against the same
//! database leaves existing rows untouched.

use anyhow::{bail, Context, Result};
use sqlx::mysql::{MySqlConnectOptions, MySqlDatabaseError, MySqlPool, MySqlPoolOptions};
use std::io::Write;

use crate::config::DbConfig;
use crate::models::FilmIndex;

// MySQL server error numbers.
const ER_ACCESS_DENIED: u16 = 1045;
const ER_BAD_DB: u16 = 1049;

/// Credentials for the MySQL connection, read interactively.
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Prompt for the MySQL username and a masked password on the terminal.
pub fn prompt_credentials() -> Result<Credentials> {
    print!("Please enter username for MySQL connection: ");
    std::io::stdout().flush()?;

    let mut username = String::new();
    std::io::stdin()
        .read_line(&mut username)
        .context("failed to read username")?;
    let username = username.trim().to_string();

    let password = rpassword::prompt_password("Please enter the password for the MySQL connection: ")
        .context("failed to read password")?;

    Ok(Credentials { username, password })
}

/// Connect to the configured database, creating it on first run.
///
/// An unknown-database error is recovered by connecting without a
/// database, issuing `CREATE DATABASE` with a UTF-8 default charset, and
/// reconnecting. Access-denied errors fail with a dedicated message; all
/// other connection errors propagate.
pub async fn connect(config: &DbConfig, credentials: &Credentials) -> Result<MySqlPool> {
    match try_connect(config, credentials, Some(&config.name)).await {
        Ok(pool) => Ok(pool),
        Err(err) if mysql_error_number(&err) == Some(ER_ACCESS_DENIED) => {
            bail!(
                "access denied for user '{}': check the username and password",
                credentials.username
            )
        }
        Err(err) if mysql_error_number(&err) == Some(ER_BAD_DB) => {
            let bootstrap = try_connect(config, credentials, None)
                .await
                .with_context(|| format!("failed to connect to MySQL at {}", config.host))?;

            sqlx::query(&format!(
                "CREATE DATABASE `{}` DEFAULT CHARACTER SET 'utf8'",
                config.name
            ))
            .execute(&bootstrap)
            .await
            .with_context(|| format!("failed to create database {}", config.name))?;
            bootstrap.close().await;

            try_connect(config, credentials, Some(&config.name))
                .await
                .with_context(|| format!("failed to connect to database {}", config.name))
        }
        Err(err) => {
            Err(err).with_context(|| format!("failed to connect to MySQL at {}", config.host))
        }
    }
}

async fn try_connect(
    config: &DbConfig,
    credentials: &Credentials,
    database: Option<&str>,
) -> Result<MySqlPool, sqlx::Error> {
    let mut options = MySqlConnectOptions::new()
        .host(&config.host)
        .username(&credentials.username)
        .password(&credentials.password);

    if let Some(name) = database {
        options = options.database(name);
    }

    MySqlPoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

fn mysql_error_number(err: &sqlx::Error) -> Option<u16> {
    err.as_database_error()
        .and_then(|db_err| db_err.try_downcast_ref::<MySqlDatabaseError>())
        .map(|mysql_err| mysql_err.number())
}

/// Derive a table name from a film title: lowercase, spaces replaced
/// with underscores, double quotes stripped.
pub fn table_name_for(title: &str) -> String {
    title.to_lowercase().replace(' ', "_").replace('"', "")
}

/// Create one table per film in the index, if absent.
pub async fn ensure_tables(pool: &MySqlPool, index: &FilmIndex) -> Result<()> {
    for entry in index.values() {
        let table = table_name_for(&entry.title);
        let statement = format!(
            "CREATE TABLE IF NOT EXISTS `{}` (`character_name` VARCHAR(255) NOT NULL UNIQUE) ENGINE=InnoDB",
            table
        );

        sqlx::query(&statement)
            .execute(pool)
            .await
            .with_context(|| format!("failed to create table {}", table))?;
    }

    Ok(())
}

/// Insert one row per character per film. Returns the number of rows
/// actually inserted.
///
/// `INSERT IGNORE` makes re-runs idempotent: a character already present
/// in a film's table is skipped without error. Each insert commits
/// independently, so rows written before a failure remain.
pub async fn write_records(pool: &MySqlPool, index: &FilmIndex) -> Result<u64> {
    let mut inserted = 0u64;

    for entry in index.values() {
        let table = table_name_for(&entry.title);
        let statement = format!("INSERT IGNORE INTO `{}` (`character_name`) VALUES (?)", table);

        for name in &entry.characters {
            let result = sqlx::query(&statement)
                .bind(name)
                .execute(pool)
                .await
                .with_context(|| format!("failed to insert into {}", table))?;
            inserted += result.rows_affected();
        }
    }

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name_lowercases_and_underscores() {
        assert_eq!(
            table_name_for("The Empire Strikes Back"),
            "the_empire_strikes_back"
        );
    }

    #[test]
    fn test_table_name_strips_double_quotes() {
        assert_eq!(table_name_for("A \"New\" Hope"), "a_new_hope");
    }
}
