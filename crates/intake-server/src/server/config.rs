use anyhow::bail;
use clap::Parser;

/// Which document-store adapter backs the service.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process-local store. No durability; intended for development and
    /// tests.
    Memory,
    /// Google Firestore over its REST v1 API.
    Firestore,
}

impl core::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StoreBackend::Memory => f.write_str("memory"),
            StoreBackend::Firestore => f.write_str("firestore"),
        }
    }
}

/// Runtime configuration for the `intake-server` binary.
///
/// These settings control the listen address, the admission-control window,
/// the validation bounds, and the credentials for the external store and
/// email capabilities. All values are parsed from CLI arguments or
/// environment variables, with defaults suitable for production.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "intake-server",
    version,
    about = "An HTTP service for cohort program application intake"
)]
pub struct CliArgs {
    /// Address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:8080"))]
    pub server_addr: String,

    /// Deployment environment label reported by `/health`.
    ///
    /// Environment variable: `APP_ENV`
    #[arg(long, env = "APP_ENV", default_value_t = String::from("production"))]
    pub environment: String,

    /// Document-store adapter backing the service.
    ///
    /// Environment variable: `STORE`
    #[arg(long, env = "STORE", value_enum, default_value_t = StoreBackend::Firestore)]
    pub store: StoreBackend,

    /// Store collection holding live applications for the current
    /// submission cycle.
    ///
    /// Scoping per cycle keeps the email-uniqueness key meaningful across
    /// recruiting seasons without migrations.
    ///
    /// Environment variable: `COLLECTION`
    #[arg(long, env = "COLLECTION", default_value_t = String::from("applications_f25"))]
    pub collection: String,

    /// Lower inclusive bound for the `year` field of a submission.
    ///
    /// Environment variable: `MIN_YEAR`
    #[arg(long, env = "MIN_YEAR", default_value_t = 2025)]
    pub min_year: i32,

    /// Upper inclusive bound for the `year` field of a submission.
    ///
    /// Environment variable: `MAX_YEAR`
    #[arg(long, env = "MAX_YEAR", default_value_t = 2030)]
    pub max_year: i32,

    /// Length of the admission-control window, in seconds.
    ///
    /// Environment variable: `RATE_LIMIT_WINDOW_SECS`
    #[arg(long, env = "RATE_LIMIT_WINDOW_SECS", default_value_t = 300)]
    pub rate_limit_window_secs: u64,

    /// Maximum number of `/apply` requests per client within one window.
    ///
    /// Environment variable: `RATE_LIMIT_MAX_REQUESTS`
    #[arg(long, env = "RATE_LIMIT_MAX_REQUESTS", default_value_t = 10)]
    pub rate_limit_max_requests: u32,

    /// Google Cloud project id hosting the Firestore database.
    ///
    /// Required when `--store firestore` is selected.
    ///
    /// Environment variable: `FIRESTORE_PROJECT_ID`
    #[arg(long, env = "FIRESTORE_PROJECT_ID")]
    pub firestore_project_id: Option<String>,

    /// Base URL of the Firestore REST API. Point this at an emulator for
    /// local runs.
    ///
    /// Environment variable: `FIRESTORE_BASE_URL`
    #[arg(long, env = "FIRESTORE_BASE_URL", default_value_t = String::from("https://firestore.googleapis.com/v1"))]
    pub firestore_base_url: String,

    /// OAuth bearer token for Firestore requests. Acquisition (service
    /// accounts, metadata server) is outside this service; emulators accept
    /// requests without one.
    ///
    /// Environment variable: `FIRESTORE_TOKEN`
    #[arg(long, env = "FIRESTORE_TOKEN", hide_env_values = true)]
    pub firestore_token: Option<String>,

    /// SendGrid API key. When absent the email capability is disabled and
    /// submissions still succeed with an advisory message.
    ///
    /// Environment variable: `SENDGRID_API_KEY`
    #[arg(long, env = "SENDGRID_API_KEY", hide_env_values = true)]
    pub sendgrid_api_key: Option<String>,

    /// Base URL of the SendGrid API.
    ///
    /// Environment variable: `SENDGRID_BASE_URL`
    #[arg(long, env = "SENDGRID_BASE_URL", default_value_t = String::from("https://api.sendgrid.com"))]
    pub sendgrid_base_url: String,

    /// Sender address for confirmation emails.
    ///
    /// Environment variable: `EMAIL_FROM`
    #[arg(long, env = "EMAIL_FROM", default_value_t = String::from("applications@cohort.example.org"))]
    pub email_from: String,

    /// Program name rendered into confirmation emails.
    ///
    /// Environment variable: `PROGRAM_NAME`
    #[arg(long, env = "PROGRAM_NAME", default_value_t = String::from("the cohort program"))]
    pub program_name: String,
}

/// Validated runtime configuration derived from [`CliArgs`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_addr: String,
    pub environment: String,
    pub store: StoreBackend,
    pub collection: String,
    pub min_year: i32,
    pub max_year: i32,
    pub rate_limit_window_secs: u64,
    pub rate_limit_max_requests: u32,
    pub firestore_project_id: Option<String>,
    pub firestore_base_url: String,
    pub firestore_token: Option<String>,
    pub sendgrid_api_key: Option<String>,
    pub sendgrid_base_url: String,
    pub email_from: String,
    pub program_name: String,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.min_year > args.max_year {
            bail!(
                "MIN_YEAR ({}) must not exceed MAX_YEAR ({})",
                args.min_year,
                args.max_year
            );
        }

        if args.rate_limit_window_secs == 0 {
            bail!("RATE_LIMIT_WINDOW_SECS must be greater than 0");
        }

        if args.rate_limit_max_requests == 0 {
            bail!("RATE_LIMIT_MAX_REQUESTS must be greater than 0");
        }

        if args.store == StoreBackend::Firestore && args.firestore_project_id.is_none() {
            bail!("FIRESTORE_PROJECT_ID is required when STORE is `firestore`");
        }

        Ok(Self {
            server_addr: args.server_addr,
            environment: args.environment,
            store: args.store,
            collection: args.collection,
            min_year: args.min_year,
            max_year: args.max_year,
            rate_limit_window_secs: args.rate_limit_window_secs,
            rate_limit_max_requests: args.rate_limit_max_requests,
            firestore_project_id: args.firestore_project_id,
            firestore_base_url: args.firestore_base_url,
            firestore_token: args.firestore_token,
            sendgrid_api_key: args.sendgrid_api_key,
            sendgrid_base_url: args.sendgrid_base_url,
            email_from: args.email_from,
            program_name: args.program_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["intake-server", "--store", "memory"];
        argv.extend_from_slice(extra);
        CliArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_are_valid() {
        let config = ServerConfig::try_from(args(&[])).unwrap();
        assert_eq!(config.min_year, 2025);
        assert_eq!(config.max_year, 2030);
        assert_eq!(config.rate_limit_window_secs, 300);
        assert_eq!(config.rate_limit_max_requests, 10);
        assert_eq!(config.collection, "applications_f25");
    }

    #[test]
    fn rejects_inverted_year_range() {
        let parsed = args(&["--min-year", "2031"]);
        assert!(ServerConfig::try_from(parsed).is_err());
    }

    #[test]
    fn rejects_zero_rate_limit_ceiling() {
        let parsed = args(&["--rate-limit-max-requests", "0"]);
        assert!(ServerConfig::try_from(parsed).is_err());
    }

    #[test]
    fn firestore_requires_a_project_id() {
        let parsed = CliArgs::try_parse_from(["intake-server", "--store", "firestore"]).unwrap();
        assert!(ServerConfig::try_from(parsed).is_err());

        let parsed = CliArgs::try_parse_from([
            "intake-server",
            "--store",
            "firestore",
            "--firestore-project-id",
            "demo",
        ])
        .unwrap();
        assert!(ServerConfig::try_from(parsed).is_ok());
    }
}
