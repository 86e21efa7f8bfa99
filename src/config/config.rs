use crate::discovery::filter::AcceptWindow;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

/// Years the schedule can always materialize dates for, with room for `{next_year}`.
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1970..=9998;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppCfg {
    #[serde(default)]
    pub http: HttpCfg,
    #[serde(default)]
    pub polymarket: PolyCfg,
    #[serde(default)]
    pub discovery: DiscoveryCfg,
    #[serde(default)]
    pub schedule: ScheduleCfg,
    #[serde(default)]
    pub auxiliary: AuxCfg,
    #[serde(default)]
    pub output: OutputCfg,
    #[serde(default)]
    pub run: RunCfg,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpCfg {
    #[serde(default = "default_ua")]
    pub user_agent: String,
    #[serde(with = "humantime_serde", default = "default_timeout")]
    pub timeout: Duration,
    #[serde(with = "humantime_serde", default = "default_pool_idle")]
    pub pool_idle_timeout: Duration,
    #[serde(with = "humantime_serde", default = "default_keepalive")]
    pub tcp_keep_alive: Duration,
    #[serde(default = "default_pool")]
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpCfg {
    fn default() -> Self {
        Self {
            user_agent: default_ua(),
            timeout: default_timeout(),
            pool_idle_timeout: default_pool_idle(),
            tcp_keep_alive: default_keepalive(),
            pool_max_idle_per_host: default_pool(),
        }
    }
}
fn default_ua() -> String {
    concat!("ratewatch/", env!("CARGO_PKG_VERSION")).into()
}
fn default_timeout() -> Duration {
    Duration::from_secs(15)
}
fn default_pool_idle() -> Duration {
    Duration::from_secs(90)
}
fn default_keepalive() -> Duration {
    Duration::from_secs(60)
}
fn default_pool() -> usize {
    4
}

#[derive(Debug, Deserialize, Clone)]
pub struct PolyCfg {
    #[serde(default = "default_gamma_events_url")]
    pub gamma_events_url: String,
    /// Ceiling on outgoing gamma requests; probes fire back to back otherwise.
    #[serde(default = "default_rps")]
    pub requests_per_second: u32,
}

impl Default for PolyCfg {
    fn default() -> Self {
        Self {
            gamma_events_url: default_gamma_events_url(),
            requests_per_second: default_rps(),
        }
    }
}
fn default_gamma_events_url() -> String {
    "https://gamma-api.polymarket.com/events".to_string()
}
fn default_rps() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct DiscoveryCfg {
    /// `{month}` is replaced by the lowercase English month name.
    #[serde(default = "default_decision_slug")]
    pub decision_slug_template: String,
    /// `{year}` / `{next_year}` are replaced by the target year and the one after.
    #[serde(default = "default_annual_slugs")]
    pub annual_slug_templates: Vec<String>,
    #[serde(default = "default_tags")]
    pub tags: Vec<String>,
    #[serde(default = "default_tag_limit")]
    pub tag_page_limit: u32,
    #[serde(default = "default_text_queries")]
    pub text_queries: Vec<String>,
    #[serde(default = "default_text_limit")]
    pub text_page_limit: u32,
    #[serde(default)]
    pub probe: ProbeCfg,
    #[serde(default)]
    pub windows: WindowsCfg,
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
    #[serde(default = "default_max_records")]
    pub max_records: usize,
}

impl Default for DiscoveryCfg {
    fn default() -> Self {
        Self {
            decision_slug_template: default_decision_slug(),
            annual_slug_templates: default_annual_slugs(),
            tags: default_tags(),
            tag_page_limit: default_tag_limit(),
            text_queries: default_text_queries(),
            text_page_limit: default_text_limit(),
            probe: ProbeCfg::default(),
            windows: WindowsCfg::default(),
            keywords: default_keywords(),
            max_records: default_max_records(),
        }
    }
}
fn default_decision_slug() -> String {
    "fed-decision-in-{month}".to_string()
}
fn default_annual_slugs() -> Vec<String> {
    [
        "how-many-fed-rate-cuts-in-{year}",
        "how-many-fed-rate-cuts-in-{next_year}",
        "what-will-the-fed-rate-be-at-the-end-of-{year}",
        "what-will-the-fed-rate-be-at-the-end-of-{next_year}",
        "how-many-fed-rate-cuts",
        "what-will-the-fed-rate-be",
        "will-the-fed-raise-rates",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_tags() -> Vec<String> {
    ["fed-rates", "fed", "federal-reserve", "interest-rates", "fomc"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_tag_limit() -> u32 {
    50
}
fn default_text_queries() -> Vec<String> {
    ["fed rate", "fomc", "federal reserve", "rate cut {year}"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_text_limit() -> u32 {
    20
}
fn default_keywords() -> Vec<String> {
    [
        "fed ",
        "fomc",
        "federal reserve",
        "fed funds",
        "rate cut",
        "rate hike",
        "interest rate",
        "monetary policy",
        "basis point",
        "bps",
        "rate decision",
        "fed decision",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_max_records() -> usize {
    500
}

/// Suffix enumeration for renumbered decision slugs: `-1..=-small_max`,
/// then every `large_step` up to `large_max`, capped at `budget` probes per month.
#[derive(Debug, Deserialize, Clone)]
pub struct ProbeCfg {
    #[serde(default = "default_small_max")]
    pub small_max: u32,
    #[serde(default = "default_large_step")]
    pub large_step: u32,
    #[serde(default = "default_large_max")]
    pub large_max: u32,
    #[serde(default = "default_budget")]
    pub budget: usize,
}

impl Default for ProbeCfg {
    fn default() -> Self {
        Self {
            small_max: default_small_max(),
            large_step: default_large_step(),
            large_max: default_large_max(),
            budget: default_budget(),
        }
    }
}
fn default_small_max() -> u32 {
    9
}
fn default_large_step() -> u32 {
    10
}
fn default_large_max() -> u32 {
    100
}
fn default_budget() -> usize {
    20
}

#[derive(Debug, Deserialize, Clone)]
pub struct WindowsCfg {
    #[serde(default = "AcceptWindow::broad")]
    pub exact: AcceptWindow,
    #[serde(default = "AcceptWindow::broad")]
    pub tag: AcceptWindow,
    #[serde(default = "AcceptWindow::strict")]
    pub text: AcceptWindow,
    #[serde(default = "AcceptWindow::broad")]
    pub probe: AcceptWindow,
}

impl Default for WindowsCfg {
    fn default() -> Self {
        Self {
            exact: AcceptWindow::broad(),
            tag: AcceptWindow::broad(),
            text: AcceptWindow::strict(),
            probe: AcceptWindow::broad(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ScheduleCfg {
    /// Meeting tables merged over the built-in ones; a listed year replaces the built-in year.
    #[serde(default)]
    pub known_years: Vec<KnownYearCfg>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KnownYearCfg {
    pub year: i32,
    pub meetings: Vec<MeetingCfg>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct MeetingCfg {
    pub month: u32,
    pub start_day: u32,
    pub end_day: u32,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuxCfg {
    #[serde(default)]
    pub sofr: SofrCfg,
    #[serde(default)]
    pub target_rate: TargetRateCfg,
    #[serde(default)]
    pub kalshi: KalshiCfg,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SofrCfg {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_sofr_url")]
    pub url: String,
}

impl Default for SofrCfg {
    fn default() -> Self {
        Self {
            enabled: true,
            url: default_sofr_url(),
        }
    }
}
fn default_sofr_url() -> String {
    "https://markets.newyorkfed.org/api/rates/secured/sofr/last/60.json".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct TargetRateCfg {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_effr_url")]
    pub url: String,
}

impl Default for TargetRateCfg {
    fn default() -> Self {
        Self {
            enabled: true,
            url: default_effr_url(),
        }
    }
}
fn default_effr_url() -> String {
    "https://markets.newyorkfed.org/api/rates/unsecured/effr/last/1.json".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct KalshiCfg {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_kalshi_url")]
    pub base_url: String,
    #[serde(default = "default_kalshi_series")]
    pub series_tickers: Vec<String>,
    #[serde(default = "default_kalshi_limit")]
    pub page_limit: u32,
}

impl Default for KalshiCfg {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_kalshi_url(),
            series_tickers: default_kalshi_series(),
            page_limit: default_kalshi_limit(),
        }
    }
}
fn default_kalshi_url() -> String {
    "https://api.elections.kalshi.com/trade-api/v2".to_string()
}
fn default_kalshi_series() -> Vec<String> {
    ["KXFEDDECISION", "KXFED", "KXRATECUTCOUNT", "KXLARGECUT"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_kalshi_limit() -> u32 {
    40
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputCfg {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

impl Default for OutputCfg {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}
fn default_output_path() -> PathBuf {
    PathBuf::from("data/rate_data.json")
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RunCfg {
    /// Target year; the clock's year when unset.
    #[serde(default)]
    pub year: Option<i32>,
}

impl AppCfg {
    pub fn load(path: &str) -> Result<Self> {
        let cfg = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("RATEWATCH")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("building config")?;

        let app: AppCfg = cfg.try_deserialize().context("deserializing config")?;
        app.validate()?;
        Ok(app)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(year) = self.run.year {
            anyhow::ensure!(
                SUPPORTED_YEARS.contains(&year),
                "run.year {} outside {:?}",
                year,
                SUPPORTED_YEARS
            );
        }
        anyhow::ensure!(
            !self.polymarket.gamma_events_url.is_empty(),
            "polymarket.gamma_events_url missing"
        );
        anyhow::ensure!(
            self.polymarket.requests_per_second > 0,
            "polymarket.requests_per_second must be > 0"
        );
        anyhow::ensure!(
            self.discovery.decision_slug_template.contains("{month}"),
            "discovery.decision_slug_template must contain {{month}}"
        );
        anyhow::ensure!(
            self.discovery.probe.budget > 0,
            "discovery.probe.budget must be > 0"
        );
        anyhow::ensure!(
            self.discovery.probe.large_step > 0,
            "discovery.probe.large_step must be > 0"
        );
        anyhow::ensure!(
            self.discovery.max_records > 0,
            "discovery.max_records must be > 0"
        );
        anyhow::ensure!(
            !self.discovery.keywords.is_empty(),
            "discovery.keywords must not be empty"
        );
        for (name, w) in [
            ("exact", &self.discovery.windows.exact),
            ("tag", &self.discovery.windows.tag),
            ("text", &self.discovery.windows.text),
            ("probe", &self.discovery.windows.probe),
        ] {
            anyhow::ensure!(
                w.years_before <= 10 && w.years_after <= 10,
                "discovery.windows.{} spans more than ten years",
                name
            );
        }
        for known in &self.schedule.known_years {
            anyhow::ensure!(
                SUPPORTED_YEARS.contains(&known.year),
                "schedule.known_years: year {} outside {:?}",
                known.year,
                SUPPORTED_YEARS
            );
            anyhow::ensure!(
                !known.meetings.is_empty(),
                "schedule.known_years[{}] has no meetings",
                known.year
            );
            for m in &known.meetings {
                anyhow::ensure!(
                    (1..=12).contains(&m.month),
                    "schedule.known_years[{}]: month {} out of range",
                    known.year,
                    m.month
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_defaults_validate() {
        let cfg = AppCfg::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.discovery.windows.text, AcceptWindow::strict());
        assert_eq!(cfg.discovery.tags.len(), 5);
        assert_eq!(cfg.output.path, PathBuf::from("data/rate_data.json"));
    }

    #[test]
    fn test_bad_slug_template_rejected() {
        let mut cfg = AppCfg::default();
        cfg.discovery.decision_slug_template = "fed-decision".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_out_of_range_year_rejected() {
        let mut cfg = AppCfg::default();
        cfg.run.year = Some(300_000);
        assert!(cfg.validate().is_err());
        cfg.run.year = Some(2026);
        cfg.validate().unwrap();
    }

    #[test]
    fn test_yaml_source_with_partial_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ratewatch.yml");
        std::fs::write(
            &path,
            "polymarket:\n  requests_per_second: 2\ndiscovery:\n  probe:\n    budget: 7\n  windows:\n    text: { years_before: 1, years_after: 0 }\nschedule:\n  known_years:\n    - year: 2031\n      meetings:\n        - { month: 1, start_day: 28, end_day: 29 }\n",
        )
        .unwrap();

        let cfg = AppCfg::load(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.polymarket.requests_per_second, 2);
        assert_eq!(cfg.discovery.probe.budget, 7);
        assert_eq!(cfg.discovery.probe.small_max, 9);
        assert_eq!(cfg.discovery.windows.text.years_before, 1);
        assert_eq!(cfg.discovery.windows.exact, AcceptWindow::broad());
        assert_eq!(cfg.schedule.known_years.len(), 1);
        assert_eq!(cfg.schedule.known_years[0].year, 2031);
        assert_eq!(cfg.schedule.known_years[0].meetings[0].end_day, 29);
    }

    #[test]
    fn test_shipped_config_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.yml");
        let cfg = AppCfg::load(path).unwrap();
        assert_eq!(cfg.polymarket.requests_per_second, 4);
        assert_eq!(cfg.http.timeout, Duration::from_secs(20));
        assert_eq!(cfg.discovery.windows.text, AcceptWindow::strict());
        assert_eq!(cfg.discovery.windows.probe, AcceptWindow::broad());
        assert_eq!(cfg.auxiliary.kalshi.series_tickers.len(), 4);
        assert_eq!(cfg.output.path, PathBuf::from("data/rate_data.json"));
    }

    #[test]
    fn test_env_var_override() {
        unsafe {
            env::set_var("RATEWATCH_RUN__YEAR", "2031");
            env::set_var("RATEWATCH_DISCOVERY__MAX_RECORDS", "42");
        }

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.yml");
        let cfg = AppCfg::load(missing.to_str().unwrap());

        unsafe {
            env::remove_var("RATEWATCH_RUN__YEAR");
            env::remove_var("RATEWATCH_DISCOVERY__MAX_RECORDS");
        }

        let cfg = cfg.unwrap();
        assert_eq!(cfg.run.year, Some(2031));
        assert_eq!(cfg.discovery.max_records, 42);
    }
}
