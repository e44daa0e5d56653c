//! AOJ-ICPC problem set generator.
//!
//! Filtering and sorting happen on the aggregator; this side only encodes the
//! query, reads back the problem table and draws per point tier.

use std::collections::BTreeMap;

use derive_builder::Builder;
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::category::{PointCategory, Quota};
use crate::participants::Participants;
use crate::problem_set::{ProblemEntry, ProblemSet};
use crate::sampler::sample_quota;
use crate::{Error, Result};

pub const SERVICE_URL: &str = "http://aoj-icpc.ichyo.jp/";

pub const POINT_MIN: u32 = 100;
pub const POINT_MAX: u32 = 1200;

static PROBLEM_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"id=([0-9]+)").unwrap());
static FAV_STARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\(☆+\)\s*").unwrap());
static SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct AojIcpcQuery {
    /// Problems solved by any rival are filtered out by the service.
    #[builder(default)]
    rivals: Participants,
    #[builder(default)]
    year_min: Option<u32>,
    #[builder(default)]
    year_max: Option<u32>,
    /// ICPC domestic qualifiers.
    #[builder(default = "true")]
    include_domestic: bool,
    /// ICPC Asia regionals.
    #[builder(default = "true")]
    include_regional: bool,
    /// JAG mock domestic contests.
    #[builder(default = "true")]
    include_jag_domestic: bool,
    /// Every other JAG contest.
    #[builder(default = "true")]
    include_jag_other: bool,
}

impl AojIcpcQuery {
    /// Query parameters in the order the service documents them.
    pub fn query_parameters(&self) -> Vec<(&'static str, String)> {
        let year = |y: Option<u32>| y.map(|y| y.to_string()).unwrap_or_default();
        let flag = |b: bool| u8::from(b).to_string();
        vec![
            ("aoj_rivals", self.rivals.joined()),
            ("year_min", year(self.year_min)),
            ("year_max", year(self.year_max)),
            ("aoj_username", String::new()),
            ("point_min", POINT_MIN.to_string()),
            ("point_max", POINT_MAX.to_string()),
            ("sort1_by", "point".to_string()),
            ("sort1_order", "asc".to_string()),
            ("sort2_by", "rivals_diff".to_string()),
            ("sort2_order", "desc".to_string()),
            ("source1", flag(self.include_domestic)),
            ("source2", flag(self.include_regional)),
            ("source3", flag(self.include_jag_domestic)),
            ("source4", flag(self.include_jag_other)),
        ]
    }

    pub fn query_url(&self, service_url: &str) -> Result<Url> {
        Url::parse_with_params(service_url, self.query_parameters())
            .map_err(|source| Error::InvalidUrl {
                url: service_url.to_string(),
                source,
            })
    }
}

/// One row of the aggregator's problem table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AojProblem {
    pub point: PointCategory,
    pub id: String,
    pub title: String,
    pub source: String,
    pub solved: u32,
}

impl AojProblem {
    pub fn url(&self) -> String {
        format!("https://onlinejudge.u-aizu.ac.jp/problems/{}", self.id)
    }
}

#[derive(Debug)]
pub struct AojIcpcGenerator {
    query: AojIcpcQuery,
    quota: Quota<PointCategory>,
    service_url: String,
}

impl AojIcpcGenerator {
    pub fn new(query: AojIcpcQuery, quota: Quota<PointCategory>) -> Self {
        Self {
            query,
            quota,
            service_url: SERVICE_URL.to_string(),
        }
    }

    pub fn with_service_url(mut self, service_url: impl Into<String>) -> Self {
        self.service_url = service_url.into();
        self
    }

    pub fn query_url(&self) -> Result<Url> {
        self.query.query_url(&self.service_url)
    }

    pub async fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ProblemSet> {
        let url = self.query_url()?;
        let html = fetch_page(url).await?;
        let problems = parse_problems(&html);
        info!(problems = problems.len(), "problem table parsed");
        select(problems, &self.quota, rng)
    }
}

async fn fetch_page(url: Url) -> Result<String> {
    debug!(%url, "fetching problem table");
    let response = reqwest::get(url.clone())
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| Error::network(url.as_str(), e))?;
    info!(status = %response.status(), "loaded");
    response
        .text()
        .await
        .map_err(|e| Error::network(url.as_str(), e))
}

/// Draws the quota out of the parsed rows.
pub fn select<R: Rng + ?Sized>(
    problems: Vec<AojProblem>,
    quota: &Quota<PointCategory>,
    rng: &mut R,
) -> Result<ProblemSet> {
    let pools = group_by_point(problems);
    let picked = sample_quota(&pools, quota, rng)?;
    let entries = picked
        .into_iter()
        .map(|(category, problem)| ProblemEntry {
            url: problem.url(),
            id: problem.id,
            category: category.to_string(),
            title: Some(problem.title),
        })
        .collect();
    Ok(ProblemSet::new(entries))
}

pub fn group_by_point(problems: Vec<AojProblem>) -> BTreeMap<PointCategory, Vec<AojProblem>> {
    let mut pools: BTreeMap<PointCategory, Vec<AojProblem>> = BTreeMap::new();
    for problem in problems {
        pools.entry(problem.point).or_default().push(problem);
    }
    pools
}

/// Rows of the problem table: point, title linked to the AOJ problem, source,
/// solved count. Rows a rival already solved and problems without an AOJ
/// judge are skipped.
pub fn parse_problems(html: &str) -> Vec<AojProblem> {
    let document = Html::parse_document(html);
    let rows = Selector::parse("table.problem-table tbody tr").unwrap();
    let cells = Selector::parse("td").unwrap();

    document
        .select(&rows)
        .filter(|row| !row.value().classes().any(|class| class == "rivals-only"))
        .filter_map(|row| {
            let cells = row.select(&cells).collect::<Vec<_>>();
            parse_row(&cells)
        })
        .collect()
}

fn parse_row(cells: &[ElementRef]) -> Option<AojProblem> {
    let [point, title, source, solved, ..] = cells else {
        return None;
    };
    let link = Selector::parse("a[href]").unwrap();
    let id = title
        .select(&link)
        .filter_map(|a| a.value().attr("href"))
        .find_map(|href| PROBLEM_ID.captures(href))
        .map(|caps| caps[1].to_string())?;

    Some(AojProblem {
        point: PointCategory::from_point_text(&cell_text(point)),
        id,
        title: cell_text(title),
        source: cell_text(source),
        solved: cell_text(solved).parse().unwrap_or(0),
    })
}

fn cell_text(cell: &ElementRef) -> String {
    let text = cell.text().collect::<String>();
    let text = FAV_STARS.replace_all(&text, " ");
    SPACES.replace_all(text.trim(), " ").into_owned()
}
