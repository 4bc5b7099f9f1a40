//! Watcher configuration.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use panelwatch_client::config::{DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE};
use panelwatch_client::ClientConfig;
use panelwatch_core::storage::StorageConfig;
use panelwatch_core::{DetectorConfig, FingerprintMode};

use crate::error::Error;

/// Default polling interval in seconds (15 minutes).
pub const DEFAULT_INTERVAL_SECS: u64 = 900;

/// Default number of recent event ids remembered for deduplication.
pub const DEFAULT_DEDUPE_WINDOW: usize = 100;

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default snapshot database directory.
pub const DEFAULT_DATA_PATH: &str = panelwatch_core::storage::DEFAULT_DATA_PATH;

/// Where emitted events go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkConfig {
    /// One JSON line per event on stdout.
    Stdout,
    /// HTTP POST of each event to a URL.
    Webhook {
        /// Target URL.
        url: String,
    },
}

/// Sink selection on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SinkKind {
    /// Write JSON lines to stdout.
    Stdout,
    /// POST events to `--webhook-url`.
    Webhook,
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkKind::Stdout => f.write_str("stdout"),
            SinkKind::Webhook => f.write_str("webhook"),
        }
    }
}

/// panelwatch configuration.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Webinar API client settings.
    pub client: ClientConfig,

    /// Detector settings (target webinars, fingerprint mode).
    pub detector: DetectorConfig,

    /// Snapshot database settings. None keeps snapshots in memory.
    pub storage: Option<StorageConfig>,

    /// Event destination.
    pub sink: SinkConfig,

    /// Number of recent event ids used for deduplication. 0 disables it.
    pub dedupe_window: usize,

    /// Time between runs.
    pub interval: Duration,

    /// Run once immediately at startup.
    pub run_on_start: bool,

    /// Exit after a single run.
    pub once: bool,
}

impl WatcherConfig {
    /// Create a configuration storing snapshots under the given path.
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            client: ClientConfig::default(),
            detector: DetectorConfig::default(),
            storage: Some(StorageConfig::new(data_path)),
            sink: SinkConfig::Stdout,
            dedupe_window: DEFAULT_DEDUPE_WINDOW,
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            run_on_start: true,
            once: false,
        }
    }

    /// Set the API client configuration.
    pub fn with_client(mut self, client: ClientConfig) -> Self {
        self.client = client;
        self
    }

    /// Set the detector configuration.
    pub fn with_detector(mut self, detector: DetectorConfig) -> Self {
        self.detector = detector;
        self
    }

    /// Keep snapshots in memory instead of on disk.
    pub fn in_memory(mut self) -> Self {
        self.storage = None;
        self
    }

    /// Set the event sink.
    pub fn with_sink(mut self, sink: SinkConfig) -> Self {
        self.sink = sink;
        self
    }

    /// Set the dedupe window.
    pub fn with_dedupe_window(mut self, window: usize) -> Self {
        self.dedupe_window = window;
        self
    }

    /// Set the polling interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Skip the startup run and wait for the first interval.
    pub fn without_initial_run(mut self) -> Self {
        self.run_on_start = false;
        self
    }

    /// Exit after one run.
    pub fn run_once(mut self) -> Self {
        self.once = true;
        self
    }

    /// Check if snapshots are persisted.
    pub fn is_persistent(&self) -> bool {
        self.storage.is_some()
    }

    /// Check if event deduplication is enabled.
    pub fn has_dedupe(&self) -> bool {
        self.dedupe_window > 0
    }

    /// Validate settings that cannot be expressed in the type.
    pub fn validate(&self) -> Result<(), Error> {
        if self.interval.is_zero() {
            return Err(Error::Config("interval must be greater than zero".to_string()));
        }
        if let SinkConfig::Webhook { url } = &self.sink {
            if url.is_empty() {
                return Err(Error::Config("webhook url must not be empty".to_string()));
            }
        }
        Ok(())
    }
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_PATH)
    }
}

/// Command-line arguments for panelwatch.
#[derive(Parser, Debug)]
#[command(name = "panelwatch")]
#[command(version, about = "Emit change events for webinar panelists", long_about = None)]
pub struct Args {
    /// Base URL of the webinar platform API.
    #[arg(long, env = "PANELWATCH_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// OAuth bearer token for the API.
    #[arg(long, env = "PANELWATCH_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Webinar to watch (repeatable). Watches every webinar when omitted.
    #[arg(short, long = "webinar")]
    pub webinars: Vec<String>,

    /// Seconds between runs.
    #[arg(long, default_value_t = DEFAULT_INTERVAL_SECS)]
    pub interval_secs: u64,

    /// Path to the snapshot database directory.
    #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
    pub data_path: PathBuf,

    /// Keep snapshots in memory (lost on exit).
    #[arg(long)]
    pub in_memory: bool,

    /// Event sink.
    #[arg(long, value_enum, default_value_t = SinkKind::Stdout)]
    pub sink: SinkKind,

    /// Target URL for the webhook sink.
    #[arg(long, env = "PANELWATCH_WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Recent event ids remembered for deduplication (0 disables).
    #[arg(long, default_value_t = DEFAULT_DEDUPE_WINDOW)]
    pub dedupe_window: usize,

    /// Record fingerprint mode: "ordered" or "canonical".
    #[arg(long, default_value_t = FingerprintMode::Ordered)]
    pub fingerprint: FingerprintMode,

    /// HTTP request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Page size for webinar discovery.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Run a single check and exit.
    #[arg(long)]
    pub once: bool,

    /// Do not run at startup; wait for the first interval.
    #[arg(long)]
    pub skip_initial_run: bool,
}

impl Args {
    /// Convert command-line arguments to a validated configuration.
    pub fn into_config(self) -> Result<WatcherConfig, Error> {
        let mut client = ClientConfig::new(self.api_url)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_page_size(self.page_size);
        if let Some(token) = self.token {
            client = client.with_token(token);
        }

        let detector = DetectorConfig::new()
            .with_webinars(self.webinars)
            .with_fingerprint(self.fingerprint);

        let sink = match self.sink {
            SinkKind::Stdout => SinkConfig::Stdout,
            SinkKind::Webhook => match self.webhook_url {
                Some(url) => SinkConfig::Webhook { url },
                None => {
                    return Err(Error::Config(
                        "--webhook-url is required with --sink webhook".to_string(),
                    ))
                }
            },
        };

        let mut config = WatcherConfig::new(self.data_path)
            .with_client(client)
            .with_detector(detector)
            .with_sink(sink)
            .with_dedupe_window(self.dedupe_window)
            .with_interval(Duration::from_secs(self.interval_secs));

        if self.in_memory {
            config = config.in_memory();
        }
        if self.skip_initial_run {
            config = config.without_initial_run();
        }
        if self.once {
            config = config.run_once();
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelwatch_core::proto::WebinarId;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["panelwatch"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = WatcherConfig::default();
        assert_eq!(config.interval, Duration::from_secs(DEFAULT_INTERVAL_SECS));
        assert_eq!(config.sink, SinkConfig::Stdout);
        assert_eq!(config.dedupe_window, DEFAULT_DEDUPE_WINDOW);
        assert!(config.is_persistent());
        assert!(config.has_dedupe());
        assert!(config.run_on_start);
        assert!(!config.once);
        assert!(config.detector.discovers_webinars());
    }

    #[test]
    fn test_config_builder() {
        let config = WatcherConfig::new("/var/lib/panelwatch")
            .in_memory()
            .with_dedupe_window(0)
            .with_interval(Duration::from_secs(60))
            .without_initial_run()
            .run_once();

        assert!(!config.is_persistent());
        assert!(!config.has_dedupe());
        assert_eq!(config.interval, Duration::from_secs(60));
        assert!(!config.run_on_start);
        assert!(config.once);
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = WatcherConfig::default().with_interval(Duration::ZERO);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_args_defaults() {
        let config = parse(&[]).into_config().unwrap();
        assert_eq!(config.client.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.client.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.interval, Duration::from_secs(900));
        assert_eq!(config.detector.fingerprint, FingerprintMode::Ordered);
        assert_eq!(
            config.storage.as_ref().map(|s| s.path.clone()),
            Some(PathBuf::from(DEFAULT_DATA_PATH))
        );
    }

    #[test]
    fn test_args_full() {
        let config = parse(&[
            "--api-url",
            "http://localhost:9000/v2",
            "--token",
            "abc",
            "-w",
            "111",
            "--webinar",
            "222",
            "--interval-secs",
            "60",
            "--in-memory",
            "--sink",
            "webhook",
            "--webhook-url",
            "http://hooks.local/panelists",
            "--dedupe-window",
            "0",
            "--fingerprint",
            "canonical",
            "--once",
        ])
        .into_config()
        .unwrap();

        assert_eq!(config.client.base_url, "http://localhost:9000/v2");
        assert_eq!(config.client.token.as_deref(), Some("abc"));
        assert_eq!(
            config.detector.webinars,
            vec![WebinarId::from("111"), WebinarId::from("222")]
        );
        assert_eq!(config.detector.fingerprint, FingerprintMode::Canonical);
        assert_eq!(config.interval, Duration::from_secs(60));
        assert!(!config.is_persistent());
        assert_eq!(
            config.sink,
            SinkConfig::Webhook {
                url: "http://hooks.local/panelists".to_string()
            }
        );
        assert!(!config.has_dedupe());
        assert!(config.once);
    }

    #[test]
    fn test_webhook_requires_url() {
        let result = parse(&["--sink", "webhook"]).into_config();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_fingerprint_rejected() {
        let result = Args::try_parse_from(["panelwatch", "--fingerprint", "sorted"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let result = parse(&["--interval-secs", "0"]).into_config();
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
