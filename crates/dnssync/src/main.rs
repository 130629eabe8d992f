// # dnssync - DNS Record Sync
//
// Thin integration layer: all reconciliation logic lives in dnssync-core.
//
// The binary is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Building the Cloudflare provider and the git change source
// 4. Running one reconciliation pass and reporting the result
//
// ## Configuration
//
// ### DNS Provider
// - `CLOUDFLARE_API_TOKEN`: API token (required)
// - `CLOUDFLARE_ZONE_ID`: Zone ID (required)
// - `CLOUDFLARE_API_BASE`: API base URL override (optional)
//
// ### Records
// - `DNSSYNC_RECORDS_DIR`: Directory holding record files (default: records)
//
// ### Change Source
// - `DNSSYNC_REPO_PATH`: Repository working tree (default: .)
// - `DNSSYNC_BASE_REV`: Baseline revision (default: HEAD~1)
// - `DNSSYNC_HEAD_REV`: Current revision (default: HEAD)
//
// ### Run
// - `DNSSYNC_MODE`: live or dry-run (default: live)
// - `DNSSYNC_FAIL_ON_ERROR`: exit non-zero when any file failed (default: false)
// - `DNSSYNC_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export CLOUDFLARE_API_TOKEN=your_token
// export CLOUDFLARE_ZONE_ID=your_zone_id
// export DNSSYNC_MODE=dry-run
//
// dnssync
// ```

use anyhow::Result;
use dnssync_core::{
    ChangeSourceConfig, ProviderConfig, RecordsConfig, RunReport, SyncConfig, SyncEngine,
};
use dnssync_provider_cloudflare::CloudflareProvider;
use dnssync_source_git::GitChangeSource;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for the possible run outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncExitCode {
    /// Run completed
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Change report or snapshot could not be fetched
    FatalError = 2,
    /// Run completed with per-file failures and fail-on-error is set
    FileFailures = 3,
}

impl From<SyncExitCode> for ExitCode {
    fn from(code: SyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
#[cfg_attr(test, derive(Debug))]
struct Config {
    api_token: String,
    zone_id: String,
    api_base: Option<String>,
    records_dir: String,
    repo_path: String,
    base_rev: String,
    head_rev: String,
    mode: String,
    fail_on_error: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`; empty values count as unset
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_token = var("CLOUDFLARE_API_TOKEN").ok_or_else(|| {
            anyhow::anyhow!(
                "CLOUDFLARE_API_TOKEN is required. \
                Set it via: export CLOUDFLARE_API_TOKEN=your_token"
            )
        })?;
        let zone_id = var("CLOUDFLARE_ZONE_ID").ok_or_else(|| {
            anyhow::anyhow!(
                "CLOUDFLARE_ZONE_ID is required. \
                Set it via: export CLOUDFLARE_ZONE_ID=your_zone_id"
            )
        })?;

        Ok(Self {
            api_token,
            zone_id,
            api_base: var("CLOUDFLARE_API_BASE"),
            records_dir: var("DNSSYNC_RECORDS_DIR").unwrap_or_else(|| "records".to_string()),
            repo_path: var("DNSSYNC_REPO_PATH").unwrap_or_else(|| ".".to_string()),
            base_rev: var("DNSSYNC_BASE_REV").unwrap_or_else(|| "HEAD~1".to_string()),
            head_rev: var("DNSSYNC_HEAD_REV").unwrap_or_else(|| "HEAD".to_string()),
            mode: var("DNSSYNC_MODE").unwrap_or_else(|| "live".to_string()),
            fail_on_error: var("DNSSYNC_FAIL_ON_ERROR").unwrap_or_else(|| "false".to_string()),
            log_level: var("DNSSYNC_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        match self.mode.to_lowercase().as_str() {
            "live" | "dry-run" => {}
            _ => anyhow::bail!(
                "DNSSYNC_MODE '{}' is not valid. Valid modes: live, dry-run",
                self.mode
            ),
        }

        self.parse_fail_on_error()?;
        self.log_level()?;

        if let Some(ref url) = self.api_base
            && url.starts_with("http://")
        {
            eprintln!(
                "WARNING: CLOUDFLARE_API_BASE uses HTTP (not HTTPS). \
                The API token will be sent unencrypted."
            );
        }

        self.sync_config().validate()?;
        Ok(())
    }

    fn dry_run(&self) -> bool {
        self.mode.eq_ignore_ascii_case("dry-run")
    }

    fn parse_fail_on_error(&self) -> Result<bool> {
        match self.fail_on_error.to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => anyhow::bail!(
                "DNSSYNC_FAIL_ON_ERROR '{}' is not valid. Use true or false",
                self.fail_on_error
            ),
        }
    }

    fn log_level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "DNSSYNC_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }

    /// Library configuration for the engine and its collaborators
    fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            records: RecordsConfig::new(self.records_dir.clone()),
            provider: ProviderConfig::Cloudflare {
                api_token: self.api_token.clone(),
                zone_id: self.zone_id.clone(),
                base_url: self.api_base.clone(),
            },
            source: ChangeSourceConfig::Git {
                repo_path: self.repo_path.clone(),
                base_rev: self.base_rev.clone(),
                head_rev: self.head_rev.clone(),
            },
            dry_run: self.dry_run(),
        }
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return SyncExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return SyncExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = config.log_level().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return SyncExitCode::ConfigError.into();
    }

    info!("Starting dnssync");

    let sync_config = config.sync_config();
    let engine = match build_engine(&sync_config) {
        Ok(engine) => engine,
        Err(e) => {
            error!("Startup error: {}", e);
            return SyncExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return SyncExitCode::FatalError.into();
        }
    };

    let report = match rt.block_on(engine.run()) {
        Ok(report) => report,
        Err(e) => {
            error!("Sync failed ({}): {}", e.kind(), e);
            return SyncExitCode::FatalError.into();
        }
    };

    print_report(&report);

    let fail_on_error = config.parse_fail_on_error().unwrap_or(false);
    exit_code_for(&report, fail_on_error).into()
}

/// Wire the provider and change source into an engine
fn build_engine(config: &SyncConfig) -> Result<SyncEngine> {
    let provider = CloudflareProvider::from_config(&config.provider, config.dry_run)?;
    let source = GitChangeSource::from_config(&config.source)?;

    info!(
        "Provider: {}, records directory: {}",
        config.provider.type_name(),
        config.records.dir
    );

    Ok(SyncEngine::new(
        Box::new(source),
        Box::new(provider),
        config,
    )?)
}

/// Print one line per processed file and the summary
fn print_report(report: &RunReport) {
    for file in &report.files {
        println!("{}", file);
    }
    println!("{}", report);

    if report.has_failures() {
        warn!("{} file(s) failed to sync", report.failures());
    }
}

fn exit_code_for(report: &RunReport, fail_on_error: bool) -> SyncExitCode {
    if fail_on_error && report.has_failures() {
        SyncExitCode::FileFailures
    } else {
        SyncExitCode::Success
    }
}
