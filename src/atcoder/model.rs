use chrono::{DateTime, FixedOffset, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

static ABC_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"abc[0-9]+").unwrap());
static ARC_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"arc[0-9]+").unwrap());
static AGC_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"agc[0-9]+").unwrap());

/// AtCoder runs on JST.
pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).expect("UTC+9 is a valid offset")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contest {
    pub id: String,
    pub start_epoch_second: i64,
    #[serde(default)]
    pub rate_change: String,
}

impl Contest {
    pub fn contest_type(&self) -> ContestType {
        ContestType::classify(&self.id, &self.rate_change)
    }

    /// Calendar date of the start, in JST.
    pub fn start_date(&self) -> Option<NaiveDate> {
        let start = DateTime::from_timestamp(self.start_epoch_second, 0)?;
        Some(start.with_timezone(&jst()).date_naive())
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ContestType {
    Abc,
    Arc,
    Agc,
    Other,
}

impl ContestType {
    /// The id pattern decides first; the rated range is the fallback for
    /// contests that are not named after their type.
    pub fn classify(contest_id: &str, rate_change: &str) -> Self {
        if ABC_ID.is_match(contest_id) {
            return Self::Abc;
        }
        if ARC_ID.is_match(contest_id) {
            return Self::Arc;
        }
        if AGC_ID.is_match(contest_id) {
            return Self::Agc;
        }

        match rate_change {
            " ~ 1199" | " ~ 1999" => Self::Abc,
            " ~ 2799" => Self::Arc,
            "ALL" => Self::Agc,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestProblem {
    pub contest_id: String,
    pub problem_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProblemModel {
    pub difficulty: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub epoch_second: i64,
    pub problem_id: String,
    pub result: String,
}

impl Submission {
    pub fn is_accepted(&self) -> bool {
        self.result == "AC"
    }
}

/// A problem reachable from one of the selected contests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub problem_id: String,
    pub contest_id: String,
}

impl Task {
    pub fn url(&self) -> String {
        format!(
            "https://atcoder.jp/contests/{}/tasks/{}",
            self.contest_id, self.problem_id
        )
    }
}
