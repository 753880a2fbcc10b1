//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Browse competitions, athletes and results from the athletics statistics API
#[derive(Parser, Debug)]
#[command(name = "athletics")]
#[command(version)]
pub struct Cli {
    /// API base URL (overrides config and ATHLETICS_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Bearer token to use instead of the saved session
    #[arg(long, global = true, env = "ATHLETICS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Also write logs to a daily rolling file at this path
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and save the session
    Login {
        #[arg(long, short)]
        username: Option<String>,
    },
    /// Clear the saved session and stored password
    Logout,
    /// Check that the API and its database are reachable
    Health,
    /// Database totals
    Stats {
        /// Reload every SECONDS, keeping the last good data on failure
        #[arg(long, value_name = "SECONDS")]
        watch: Option<u64>,
    },
    /// List competitions
    Competitions {
        #[arg(long, short)]
        search: Option<String>,
        #[arg(long, short, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        per_page: Option<u32>,
    },
    /// Results (or participants) of one competition
    Competition {
        id: i64,
        #[arg(long, short, default_value_t = 1)]
        page: u32,
        /// Show participating athletes instead of results
        #[arg(long)]
        athletes: bool,
    },
    /// List athletes
    Athletes {
        /// Name fragment, or an upper-case country code such as SGP
        #[arg(long, short)]
        search: Option<String>,
        #[arg(long, short, default_value_t = 1)]
        page: u32,
        /// full_name, family_name, given_name, country_code or birth_date
        #[arg(long, default_value = "full_name")]
        sort_by: String,
        /// asc or desc
        #[arg(long, default_value = "asc")]
        order: String,
    },
    /// Results of one athlete by id
    Athlete {
        id: i64,
        #[arg(long, short, default_value_t = 1)]
        page: u32,
    },
    /// Results matched by athlete name
    AthleteResults {
        #[arg(long, short)]
        name: String,
        #[arg(long, short, default_value_t = 1)]
        page: u32,
    },
    /// Athlete name suggestions
    Suggest {
        query: String,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Discipline reference table
    Disciplines,
    /// Country reference table
    Countries,
    /// National statistics dashboard
    National {
        #[arg(long, value_name = "SECONDS")]
        watch: Option<u64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_athletes_with_sort() {
        let cli = Cli::try_parse_from([
            "athletics", "athletes", "--search", "SGP", "--sort-by", "birth_date", "--order",
            "desc",
        ])
        .unwrap();
        match cli.command {
            Command::Athletes {
                search,
                page,
                sort_by,
                order,
            } => {
                assert_eq!(search.as_deref(), Some("SGP"));
                assert_eq!(page, 1);
                assert_eq!(sort_by, "birth_date");
                assert_eq!(order, "desc");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "athletics",
            "competition",
            "7",
            "--athletes",
            "--api-url",
            "http://example.org",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://example.org"));
        assert!(matches!(
            cli.command,
            Command::Competition {
                id: 7,
                athletes: true,
                ..
            }
        ));
    }

    #[test]
    fn test_competition_requires_id() {
        assert!(Cli::try_parse_from(["athletics", "competition"]).is_err());
    }
}
