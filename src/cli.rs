//! Command-line interface parsing for the AVVO reviews CLI
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! the pieces the reviews client needs: credentials, a cache and a transport.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use thiserror::Error;

use crate::cache::{CacheManager, MemoryCache, NoCache, ResponseCache};
use crate::data::transport::DEFAULT_TIMEOUT_SECS;
use crate::data::{
    ConfigError, Credentials, FetchError, ReqwestTransport, Review, ReviewsClient, API_URL,
    DEFAULT_CACHE_TTL_SECS,
};

/// Error types for turning CLI arguments into a client
#[derive(Debug, Error)]
pub enum CliError {
    /// Credentials were missing or empty
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built
    #[error("Failed to set up HTTP client: {0}")]
    Http(#[from] FetchError),

    /// Reviews could not be written to stdout as JSON
    #[error("Failed to encode reviews: {0}")]
    Encode(#[from] serde_json::Error),
}

/// How fetched reviews are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing
    #[default]
    Text,
    /// Pretty-printed JSON array
    Json,
}

/// AVVO Reviews - fetch a lawyer's reviews from the AVVO API
#[derive(Parser, Debug)]
#[command(name = "avvo-reviews")]
#[command(about = "Fetch lawyer reviews from the AVVO API, cached locally")]
#[command(version)]
pub struct Cli {
    /// AVVO lawyer ID whose reviews to fetch
    ///
    /// When omitted nothing is fetched and nothing is printed.
    #[arg(value_name = "LAWYER_ID")]
    pub lawyer_id: Option<u64>,

    /// AVVO account email address
    #[arg(long, env = "AVVO_USER", default_value = "", hide_default_value = true)]
    pub user: String,

    /// AVVO account password
    #[arg(
        long,
        env = "AVVO_PASSWORD",
        default_value = "",
        hide_default_value = true,
        hide_env_values = true
    )]
    pub password: String,

    /// Root URL of the AVVO API
    #[arg(long, env = "AVVO_API_URL", default_value = API_URL)]
    pub base_url: String,

    /// How long responses stay cached, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_CACHE_TTL_SECS)]
    pub ttl_secs: u64,

    /// Request timeout, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Always query the API and never store responses
    #[arg(long)]
    pub no_cache: bool,

    /// Directory for cached responses (defaults to the XDG cache directory)
    #[arg(long, value_name = "DIR", env = "AVVO_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Which cache backs the client, as selected on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheChoice {
    /// `--no-cache`, which takes precedence over `--cache-dir`
    Disabled,
    /// Disk cache in the given directory
    Disk(PathBuf),
    /// No usable cache directory; keep responses in memory for this run
    Memory,
}

impl Cli {
    /// Builds and validates the account credentials
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        Credentials::new(self.user.clone(), self.password.clone())
    }

    /// Resolves which cache to use
    pub fn cache_choice(&self) -> CacheChoice {
        if self.no_cache {
            return CacheChoice::Disabled;
        }
        if let Some(dir) = &self.cache_dir {
            return CacheChoice::Disk(dir.clone());
        }
        match CacheManager::new() {
            Some(manager) => CacheChoice::Disk(manager.dir().to_path_buf()),
            None => CacheChoice::Memory,
        }
    }

    /// Default log filter directive for the `-v` count
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Assembles a reviews client from the parsed arguments
    ///
    /// Fails before any network activity when credentials are missing.
    pub fn build_client(
        &self,
    ) -> Result<ReviewsClient<ReqwestTransport, Box<dyn ResponseCache + Send + Sync>>, CliError> {
        let credentials = self.credentials()?;

        let cache: Box<dyn ResponseCache + Send + Sync> = match self.cache_choice() {
            CacheChoice::Disabled => Box::new(NoCache),
            CacheChoice::Disk(dir) => Box::new(CacheManager::with_dir(dir)),
            CacheChoice::Memory => {
                tracing::debug!("no cache directory available, caching in memory");
                Box::new(MemoryCache::new())
            }
        };

        let transport = ReqwestTransport::with_timeout(Duration::from_secs(self.timeout_secs))?;

        Ok(ReviewsClient::new(credentials, transport, cache)
            .with_base_url(self.base_url.clone())
            .with_ttl_secs(self.ttl_secs))
    }
}

/// Formats reviews for stdout
///
/// An empty list produces an empty string in every format except JSON, which
/// prints `[]`.
pub fn format_reviews(reviews: &[Review], format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(reviews)?),
        OutputFormat::Text => {
            let blocks: Vec<String> = reviews.iter().map(format_review_text).collect();
            Ok(blocks.join("\n"))
        }
    }
}

fn format_review_text(review: &Review) -> String {
    let mut out = String::new();
    if let Some(stars) = review.stars() {
        out.push_str(&stars);
        out.push(' ');
    }
    out.push_str(&review.title);
    out.push('\n');
    out.push_str(&format!("  - {}\n", review.posted_by));
    if !review.url.is_empty() {
        out.push_str(&format!("  {}\n", review.url));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn review(rating: u8, title: &str) -> Review {
        Review {
            overall_rating: rating,
            title: title.to_string(),
            body: "<p>Helpful</p>".to_string(),
            url: "https://www.avvo.com/r/1".to_string(),
            posted_by: "Jane".to_string(),
        }
    }

    #[test]
    fn test_cli_parse_lawyer_id() {
        let cli = Cli::parse_from(["avvo-reviews", "--user", "a@b.c", "--password", "pw", "42"]);
        assert_eq!(cli.lawyer_id, Some(42));
        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.ttl_secs, DEFAULT_CACHE_TTL_SECS);
        assert_eq!(cli.base_url, API_URL);
    }

    #[test]
    fn test_cli_parse_without_lawyer_id() {
        let cli = Cli::parse_from(["avvo-reviews", "--user", "a@b.c", "--password", "pw"]);
        assert!(cli.lawyer_id.is_none());
    }

    #[test]
    fn test_cli_rejects_non_numeric_lawyer_id() {
        let result = Cli::try_parse_from(["avvo-reviews", "abc"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_no_cache_wins_over_cache_dir() {
        let cli = Cli::parse_from(["avvo-reviews", "--no-cache", "--cache-dir", "/tmp/x"]);
        assert_eq!(cli.cache_choice(), CacheChoice::Disabled);
    }

    #[test]
    fn test_credentials_from_cli() {
        let cli = Cli::parse_from(["avvo-reviews", "--user", "a@b.c", "--password", "pw"]);
        let credentials = cli.credentials().unwrap();
        assert_eq!(credentials.identity(), "a@b.c");
    }

    #[test]
    fn test_build_client_fails_without_password() {
        let cli = Cli::parse_from(["avvo-reviews", "--user", "a@b.c", "--password", "", "42"]);
        assert!(matches!(
            cli.build_client(),
            Err(CliError::Config(ConfigError::MissingSecret))
        ));
    }

    #[test]
    fn test_build_client_applies_overrides() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache_dir = temp_dir.path().to_string_lossy().to_string();
        let cli = Cli::parse_from([
            "avvo-reviews",
            "--user",
            "a@b.c",
            "--password",
            "pw",
            "--base-url",
            "http://localhost:8080/api/",
            "--ttl-secs",
            "60",
            "--cache-dir",
            cache_dir.as_str(),
        ]);

        let client = cli.build_client().unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api");
        assert_eq!(client.ttl_secs(), 60);
    }

    #[test]
    fn test_cache_choice() {
        let cli = Cli::parse_from(["avvo-reviews", "--no-cache"]);
        assert_eq!(cli.cache_choice(), CacheChoice::Disabled);

        let cli = Cli::parse_from(["avvo-reviews", "--cache-dir", "/tmp/avvo"]);
        assert_eq!(cli.cache_choice(), CacheChoice::Disk(PathBuf::from("/tmp/avvo")));
    }

    #[test]
    fn test_log_level_from_verbose_count() {
        assert_eq!(Cli::parse_from(["avvo-reviews"]).log_level(), "warn");
        assert_eq!(Cli::parse_from(["avvo-reviews", "-v"]).log_level(), "debug");
        assert_eq!(Cli::parse_from(["avvo-reviews", "-vv"]).log_level(), "trace");
    }

    #[test]
    fn test_format_reviews_text() {
        let output = format_reviews(&[review(3, "Great"), review(0, "Unrated")], OutputFormat::Text)
            .unwrap();

        assert!(output.contains("★★★☆☆ Great"));
        assert!(output.contains("  - Jane"));
        assert!(output.contains("https://www.avvo.com/r/1"));
        assert!(output.lines().any(|line| line == "Unrated"));
    }

    #[test]
    fn test_format_reviews_empty_text_prints_nothing() {
        assert_eq!(format_reviews(&[], OutputFormat::Text).unwrap(), "");
    }

    #[test]
    fn test_format_reviews_json() {
        let output = format_reviews(&[review(4, "Solid")], OutputFormat::Json).unwrap();
        let parsed: Vec<Review> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, vec![review(4, "Solid")]);
    }
}
