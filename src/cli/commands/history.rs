//! `buildchecker history`: daily build health over a date window.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::cli::output::{history_table, output, CommandOutput};
use crate::cli::types::HistoryArgs;
use crate::domain::models::{Build, Config, DailyHealth, HistorySummary};
use crate::domain::ports::{BuildQuery, BuildSource, Notifier};
use crate::infrastructure::buildkite::{BuildCache, BuildkiteClient};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::export::write_history_csv;
use crate::infrastructure::honeycomb::HoneycombClient;
use crate::infrastructure::slack::SlackWebhookNotifier;
use crate::services::report::history_message;
use crate::services::{build_report, generate_history};

/// Days covered when only one edge of the window is given.
const DEFAULT_WINDOW_DAYS: u64 = 7;

/// Inclusive range of UTC days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl HistoryWindow {
    /// `to` defaults to `today`, `from` to a week before `to`.
    pub fn resolve(
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self> {
        let to = to.unwrap_or(today);
        let from = from.unwrap_or_else(|| {
            to.checked_sub_days(Days::new(DEFAULT_WINDOW_DAYS - 1))
                .unwrap_or(to)
        });
        if from > to {
            bail!("--created-from {from} is after --created-to {to}");
        }
        Ok(Self { from, to })
    }

    /// Window of a cached build list: unset edges come from the builds themselves.
    pub fn covering(
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        builds: &[Build],
        today: NaiveDate,
    ) -> Result<Self> {
        let dates = builds.iter().filter_map(|b| b.created_at).map(|c| c.date_naive());
        let oldest = dates.clone().min();
        let newest = dates.max();
        Self::resolve(from.or(oldest), to.or(newest), today)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.from.and_time(NaiveTime::MIN).and_utc()
    }

    /// Exclusive end: midnight after `to`.
    pub fn end(&self) -> DateTime<Utc> {
        self.to
            .checked_add_days(Days::new(1))
            .unwrap_or(self.to)
            .and_time(NaiveTime::MIN)
            .and_utc()
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start() && at < self.end()
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryOutput {
    pub branch: String,
    pub window: HistoryWindow,
    pub builds: usize,
    pub summary: HistorySummary,
    pub days: Vec<DailyHealth>,
}

impl CommandOutput for HistoryOutput {
    fn to_human(&self) -> String {
        if self.days.is_empty() {
            return format!(
                "No builds on {} between {} and {}.",
                self.branch, self.window.from, self.window.to
            );
        }

        format!(
            "Build history for {} ({} to {}, {} builds, {:.1}% flaky)\n{}",
            self.branch,
            self.window.from,
            self.window.to,
            self.builds,
            self.summary.flake_rate(),
            history_table(&self.days, &self.summary)
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: HistoryArgs, mut config: Config, json_mode: bool) -> Result<()> {
    args.apply(&mut config);
    ConfigLoader::validate(&config)?;
    ConfigLoader::require_history_credentials(&config, args.load_from.is_some())?;

    let source: Arc<dyn BuildSource> = match &args.load_from {
        Some(path) => Arc::new(BuildCache::new(path)),
        None => Arc::new(BuildkiteClient::new(&config.buildkite)),
    };
    let notifier = SlackWebhookNotifier::new(config.slack.webhooks.clone());

    let out = run_history(&config, &args, source.as_ref(), &notifier, Utc::now()).await?;
    output(&out, json_mode);
    Ok(())
}

/// Fetch or load builds, aggregate them and send the result to every
/// configured sink.
///
/// Failing to write CSV files or the build cache is an error since those
/// were asked for explicitly; Honeycomb and Slack failures are only logged.
pub async fn run_history(
    config: &Config,
    args: &HistoryArgs,
    source: &dyn BuildSource,
    notifier: &dyn Notifier,
    now: DateTime<Utc>,
) -> Result<HistoryOutput> {
    let branch = &config.check.branch;
    let today = now.date_naive();

    let requested = HistoryWindow::resolve(args.created_from, args.created_to, today)?;
    let query = BuildQuery::window(
        branch.as_str(),
        Some(requested.start()),
        Some(requested.end()),
    );
    let fetched = source
        .list_builds(&query)
        .await
        .context("Failed to list builds")?;

    let window = if args.load_from.is_some() {
        HistoryWindow::covering(args.created_from, args.created_to, &fetched, today)?
    } else {
        requested
    };

    if let Some(path) = &args.write_to {
        BuildCache::new(path)
            .save(&fetched)
            .await
            .with_context(|| format!("Failed to write builds to {}", path.display()))?;
    }

    let builds: Vec<Build> = fetched
        .into_iter()
        .filter(|b| b.created_at.map_or(true, |c| window.contains(c)))
        .map(Build::with_retries_as_failures)
        .collect();
    info!(
        branch = %branch,
        from = %window.from,
        to = %window.to,
        count = builds.len(),
        "aggregating build history"
    );

    let scan_start = window.end().min(now);
    let maps = generate_history(&builds, scan_start, &config.check.options());
    let report = build_report(&maps);

    if let Some(dir) = &args.csv_dir {
        write_history_csv(dir, &maps)
            .await
            .with_context(|| format!("Failed to write CSV files to {}", dir.display()))?;
    }

    if config.honeycomb.is_enabled() {
        let honeycomb = HoneycombClient::new(
            config.honeycomb.token.clone(),
            config.honeycomb.base_url.clone(),
        );
        if let Err(e) = honeycomb
            .send_report(&config.honeycomb.dataset, &report)
            .await
        {
            warn!(error = %e, "failed to send history to Honeycomb");
        }
    }

    if !config.slack.webhooks.is_empty() {
        if let Err(e) = notifier.post(&history_message(branch, &report)).await {
            warn!(error = %e, "failed to post history to Slack");
        }
    }

    Ok(HistoryOutput {
        branch: branch.clone(),
        window,
        builds: builds.len(),
        summary: report.summary(),
        days: report.days,
    })
}
