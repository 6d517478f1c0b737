//! Due-date classification.
//!
//! Partitions tasks into six buckets relative to a caller-supplied "today".
//! Every task lands in exactly one bucket and buckets keep input order. A
//! due date that does not parse is a bucket of its own, never an error.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::due::DueDate;
use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Overdue,
    DueToday,
    DueThisWeek,
    DueLater,
    NoDueDate,
    InvalidDates,
}

impl Bucket {
    /// All buckets in report order
    pub const ALL: [Bucket; 6] = [
        Bucket::Overdue,
        Bucket::DueToday,
        Bucket::DueThisWeek,
        Bucket::DueLater,
        Bucket::NoDueDate,
        Bucket::InvalidDates,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Bucket::Overdue => "Overdue",
            Bucket::DueToday => "Due Today",
            Bucket::DueThisWeek => "Due This Week",
            Bucket::DueLater => "Due Later",
            Bucket::NoDueDate => "No Due Date",
            Bucket::InvalidDates => "Invalid Dates",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The six buckets produced by [`classify`]. Empty buckets are kept.
#[derive(Debug, Clone, Default)]
pub struct Classification<'a> {
    buckets: [Vec<&'a Task>; 6],
}

impl<'a> Classification<'a> {
    pub fn get(&self, bucket: Bucket) -> &[&'a Task] {
        &self.buckets[bucket.index()]
    }

    /// Buckets in report order, including empty ones
    pub fn iter(&self) -> impl Iterator<Item = (Bucket, &[&'a Task])> + '_ {
        Bucket::ALL
            .into_iter()
            .map(move |bucket| (bucket, self.get(bucket)))
    }

    pub fn counts(&self) -> Vec<(Bucket, usize)> {
        self.iter().map(|(bucket, tasks)| (bucket, tasks.len())).collect()
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}

impl Serialize for Classification<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(Bucket::ALL.len()))?;
        for (bucket, tasks) in self.iter() {
            map.serialize_entry(&bucket, tasks)?;
        }
        map.end()
    }
}

/// Last day of the week containing `today`; weeks run Monday to Sunday.
pub fn week_end(today: NaiveDate) -> NaiveDate {
    let days_left = 6 - i64::from(today.weekday().num_days_from_monday());
    today + Duration::days(days_left)
}

/// Bucket for a single due date
pub fn bucket_for(due_date: &DueDate, today: NaiveDate) -> Bucket {
    let date = match due_date {
        DueDate::None => return Bucket::NoDueDate,
        DueDate::Unparsed(_) => return Bucket::InvalidDates,
        DueDate::On(date) => *date,
    };

    if date < today {
        Bucket::Overdue
    } else if date == today {
        Bucket::DueToday
    } else if date <= week_end(today) {
        Bucket::DueThisWeek
    } else {
        Bucket::DueLater
    }
}

pub fn classify(tasks: &[Task], today: NaiveDate) -> Classification<'_> {
    let mut classification = Classification::default();
    for task in tasks {
        let bucket = bucket_for(&task.due_date, today);
        classification.buckets[bucket.index()].push(task);
    }
    classification
}
