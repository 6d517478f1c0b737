//! Due-date reports: `organize` and `summary`.

use chrono::NaiveDate;
use serde::Serialize;

use crate::classify::{self, Bucket, Classification};
use crate::cli::task::{open_store, task_line, CommonOptions};
use crate::due::parse_calendar_date;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};
use crate::task::TaskFilter;

pub struct ReportOptions {
    pub today: Option<String>,
    pub common: CommonOptions,
}

#[derive(Serialize)]
struct OrganizeOutput<'a> {
    today: NaiveDate,
    week_end: NaiveDate,
    buckets: Classification<'a>,
}

#[derive(Serialize)]
struct BucketCount {
    bucket: Bucket,
    label: &'static str,
    count: usize,
}

#[derive(Serialize)]
struct SummaryOutput {
    today: NaiveDate,
    total: usize,
    pending: usize,
    completed: usize,
    buckets: Vec<BucketCount>,
}

pub fn run_organize(options: ReportOptions) -> Result<()> {
    let today = resolve_today(options.today.as_deref())?;
    let store = open_store(&options.common)?;
    let buckets = classify::classify(store.all_tasks(), today);

    let mut human = HumanOutput::new("Organized tasks");
    human.push_summary("Today", today.to_string());
    human.push_summary("Week ends", classify::week_end(today).to_string());
    for (bucket, tasks) in buckets.iter() {
        human.push_section(
            bucket.label(),
            tasks.iter().map(|task| task_line(task)).collect(),
        );
    }
    let unreadable = buckets.get(Bucket::InvalidDates);
    if let Some(first) = unreadable.first() {
        human.push_warning(format!(
            "{} task(s) have a due date that is not MM/DD/YYYY",
            unreadable.len()
        ));
        human.push_next_step(format!(
            "tasktrackr deadline --id {} --due MM/DD/YYYY",
            first.id
        ));
    }

    let output = OrganizeOutput {
        today,
        week_end: classify::week_end(today),
        buckets,
    };
    emit_success(options.common.output(), "organize", &output, Some(&human))
}

pub fn run_summary(options: ReportOptions) -> Result<()> {
    let today = resolve_today(options.today.as_deref())?;
    let store = open_store(&options.common)?;
    let buckets = classify::classify(store.all_tasks(), today);
    let pending = store.list(Some(TaskFilter::Pending)).len();
    let completed = store.list(Some(TaskFilter::Completed)).len();

    let mut human = HumanOutput::new("Task summary");
    human.push_summary("Total", store.len().to_string());
    human.push_summary("Pending", pending.to_string());
    human.push_summary("Completed", completed.to_string());
    for (bucket, count) in buckets.counts() {
        human.push_detail(format!("{}: {count}", bucket.label()));
    }

    let output = SummaryOutput {
        today,
        total: store.len(),
        pending,
        completed,
        buckets: buckets
            .counts()
            .into_iter()
            .map(|(bucket, count)| BucketCount {
                bucket,
                label: bucket.label(),
                count,
            })
            .collect(),
    };
    emit_success(options.common.output(), "summary", &output, Some(&human))
}

/// Reference date: an explicit value, or the local calendar date
fn resolve_today(value: Option<&str>) -> Result<NaiveDate> {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(chrono::Local::now().date_naive());
    };
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_calendar_date(value))
        .ok_or_else(|| {
            Error::InvalidInput(format!(
                "invalid --today '{value}' (expected YYYY-MM-DD or MM/DD/YYYY)"
            ))
        })
}
