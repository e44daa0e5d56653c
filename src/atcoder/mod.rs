//! AtCoder virtual contest generator.
//!
//! contests → (contest problems ∥ difficulty models ∥ solved problems) →
//! bucket by colour → draw per colour. Any failed stage ends the generation.

mod client;
mod model;

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use derive_builder::Builder;
use rand::Rng;
use strum::IntoEnumIterator;
use tracing::{debug, info};

pub use client::{HttpSource, ProblemSource, SERVICE_URL};
pub use model::{jst, Contest, ContestProblem, ContestType, ProblemModel, Submission, Task};

use crate::category::{DiffCategory, Quota};
use crate::participants::{Handle, Participants};
use crate::problem_set::{ProblemEntry, ProblemSet};
use crate::sampler::sample_quota;
use crate::Result;

#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct AtCoderConfig {
    #[builder(default)]
    participants: Participants,
    #[builder(default)]
    date_min: Option<NaiveDate>,
    #[builder(default)]
    date_max: Option<NaiveDate>,
    #[builder(default = "ContestType::iter().collect()")]
    contest_types: BTreeSet<ContestType>,
    #[builder(default)]
    quota: Quota<DiffCategory>,
    /// Drop problems any participant already has an AC on.
    #[builder(default)]
    exclude_solved: bool,
}

impl AtCoderConfig {
    pub fn includes(&self, contest: &Contest) -> bool {
        let in_range = contest
            .start_date()
            .map_or(false, |date| in_date_range(date, self.date_min, self.date_max));
        in_range && self.contest_types.contains(&contest.contest_type())
    }
}

/// Both bounds inclusive; a missing bound is open.
pub fn in_date_range(date: NaiveDate, min: Option<NaiveDate>, max: Option<NaiveDate>) -> bool {
    min.map_or(true, |min| min <= date) && max.map_or(true, |max| date <= max)
}

/// Ids of the contests the configuration selects.
pub fn select_contests(contests: &[Contest], config: &AtCoderConfig) -> BTreeSet<String> {
    contests
        .iter()
        .filter(|contest| config.includes(contest))
        .map(|contest| contest.id.clone())
        .collect()
}

/// Problems of the selected contests, one task per problem id. A problem
/// shared by several contests keeps the first contest it is listed under.
pub fn collect_tasks(
    associations: &[ContestProblem],
    contests: &BTreeSet<String>,
    solved: &BTreeSet<String>,
) -> Vec<Task> {
    let mut tasks = BTreeMap::new();
    for association in associations {
        if !contests.contains(&association.contest_id) || solved.contains(&association.problem_id)
        {
            continue;
        }
        tasks
            .entry(association.problem_id.as_str())
            .or_insert(association.contest_id.as_str());
    }
    tasks
        .into_iter()
        .map(|(problem_id, contest_id)| Task {
            problem_id: problem_id.to_string(),
            contest_id: contest_id.to_string(),
        })
        .collect()
}

/// Colour of a problem given the difficulty models. Unrated problems are
/// black.
pub fn categorize(problem_id: &str, models: &BTreeMap<String, ProblemModel>) -> DiffCategory {
    models
        .get(problem_id)
        .and_then(|model| model.difficulty)
        .map_or(DiffCategory::Black, DiffCategory::from_difficulty)
}

pub fn group_by_difficulty(
    tasks: Vec<Task>,
    models: &BTreeMap<String, ProblemModel>,
) -> BTreeMap<DiffCategory, Vec<Task>> {
    let mut pools: BTreeMap<DiffCategory, Vec<Task>> = BTreeMap::new();
    for task in tasks {
        pools
            .entry(categorize(&task.problem_id, models))
            .or_default()
            .push(task);
    }
    pools
}

pub struct Generator<S> {
    source: S,
    config: AtCoderConfig,
}

impl<S: ProblemSource> Generator<S> {
    pub fn new(source: S, config: AtCoderConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &AtCoderConfig {
        &self.config
    }

    pub async fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ProblemSet> {
        let contests = self.source.contests().await?;
        let selected = select_contests(&contests, &self.config);
        info!(fetched = contests.len(), selected = selected.len(), "contests filtered");

        let (associations, models, solved) = tokio::try_join!(
            self.source.contest_problems(),
            self.source.problem_models(),
            self.solved_problems(),
        )?;

        let tasks = collect_tasks(&associations, &selected, &solved);
        info!(problems = tasks.len(), excluded = solved.len(), "problems collected");

        let pools = group_by_difficulty(tasks, &models);
        for (category, pool) in &pools {
            debug!(%category, size = pool.len(), "pool ready");
        }

        let picked = sample_quota(&pools, &self.config.quota, rng)?;
        let entries = picked
            .into_iter()
            .map(|(category, task)| ProblemEntry {
                url: task.url(),
                id: task.problem_id,
                category: category.to_string(),
                title: None,
            })
            .collect();
        Ok(ProblemSet::new(entries))
    }

    async fn solved_problems(&self) -> Result<BTreeSet<String>> {
        let mut solved = BTreeSet::new();
        if !self.config.exclude_solved {
            return Ok(solved);
        }
        for user in &self.config.participants {
            solved.extend(self.accepted_problems(user).await?);
        }
        Ok(solved)
    }

    async fn accepted_problems(&self, user: &Handle) -> Result<BTreeSet<String>> {
        let mut from_second = 0;
        let mut accepted = BTreeSet::new();
        loop {
            let part = self.source.submissions(user, from_second).await?;
            let next_second = part.iter().map(|x| x.epoch_second).max();
            accepted.extend(
                part.into_iter()
                    .filter(Submission::is_accepted)
                    .map(|s| s.problem_id),
            );
            if let Some(next_second) = next_second {
                from_second = next_second + 1;
            } else {
                break;
            }
        }
        debug!(%user, accepted = accepted.len(), "solved problems fetched");
        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::fs;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::Error;

    /// In-memory source that records which resources were requested.
    #[derive(Default)]
    struct FixtureSource {
        contests: Vec<Contest>,
        contest_problems: Vec<ContestProblem>,
        models: BTreeMap<String, ProblemModel>,
        submissions: BTreeMap<String, Vec<Submission>>,
        failing: Option<&'static str>,
        requested: RefCell<Vec<String>>,
    }

    impl FixtureSource {
        fn from_fixtures() -> Self {
            let read = |name: &str| fs::read_to_string(format!("fixtures/{name}")).unwrap();
            Self {
                contests: serde_json::from_str(&read("contests.json")).unwrap(),
                contest_problems: serde_json::from_str(&read("contest-problem.json")).unwrap(),
                models: serde_json::from_str(&read("problem-models.json")).unwrap(),
                ..Default::default()
            }
        }

        fn hit(&self, resource: &'static str) -> Result<()> {
            self.requested.borrow_mut().push(resource.to_string());
            if self.failing == Some(resource) {
                return Err(Error::network(resource, "connection refused"));
            }
            Ok(())
        }
    }

    impl ProblemSource for FixtureSource {
        async fn contests(&self) -> Result<Vec<Contest>> {
            self.hit("contests")?;
            Ok(self.contests.clone())
        }

        async fn contest_problems(&self) -> Result<Vec<ContestProblem>> {
            self.hit("contest-problem")?;
            Ok(self.contest_problems.clone())
        }

        async fn problem_models(&self) -> Result<BTreeMap<String, ProblemModel>> {
            self.hit("problem-models")?;
            Ok(self.models.clone())
        }

        async fn submissions(&self, user: &Handle, from_second: i64) -> Result<Vec<Submission>> {
            self.hit("submissions")?;
            Ok(self
                .submissions
                .get(user.as_str())
                .into_iter()
                .flatten()
                .filter(|s| s.epoch_second >= from_second)
                .take(2)
                .cloned()
                .collect())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn abc_2020_config(quota: Quota<DiffCategory>) -> AtCoderConfig {
        AtCoderConfigBuilder::default()
            .contest_types([ContestType::Abc].into_iter().collect::<BTreeSet<_>>())
            .date_min(date(2020, 1, 1))
            .date_max(date(2020, 12, 31))
            .quota(quota)
            .build()
            .unwrap()
    }

    #[test]
    fn parse_contests_should_work() {
        let source = FixtureSource::from_fixtures();
        let types: Vec<String> = source
            .contests
            .iter()
            .map(|c| format!("{} {}", c.id, c.contest_type()))
            .collect();
        insta::assert_yaml_snapshot!(types);
    }

    #[test]
    fn in_date_range_should_be_inclusive() {
        let min = Some(date(2020, 1, 1));
        let max = Some(date(2020, 12, 31));
        assert!(in_date_range(date(2020, 1, 1), min, max));
        assert!(in_date_range(date(2020, 12, 31), min, max));
        assert!(!in_date_range(date(2019, 12, 31), min, max));
        assert!(!in_date_range(date(2021, 1, 1), min, max));
        assert!(in_date_range(date(1999, 1, 1), None, max));
        assert!(in_date_range(date(2999, 1, 1), min, None));
    }

    #[test]
    fn select_contests_should_filter_by_type_and_date() {
        let source = FixtureSource::from_fixtures();
        let config = abc_2020_config(Quota::new());
        let selected = select_contests(&source.contests, &config);
        assert_eq!(selected.into_iter().collect::<Vec<_>>(), vec!["abc150"]);

        let everything = AtCoderConfigBuilder::default().build().unwrap();
        assert_eq!(
            select_contests(&source.contests, &everything).len(),
            source.contests.len()
        );
    }

    #[test]
    fn includes_should_keep_contests_on_both_bound_days() {
        let config = abc_2020_config(Quota::new());
        let contest = |start_epoch_second| Contest {
            id: "abc999".to_string(),
            start_epoch_second,
            rate_change: " ~ 1999".to_string(),
        };

        // 2020-01-01T00:00 JST
        assert!(config.includes(&contest(1_577_804_400)));
        // 2019-12-31T23:59 JST
        assert!(!config.includes(&contest(1_577_804_340)));
        // 2020-12-31T23:59 JST
        assert!(config.includes(&contest(1_609_426_740)));
        // 2021-01-01T00:00 JST
        assert!(!config.includes(&contest(1_609_426_800)));
    }

    #[test]
    fn categorize_should_default_to_black() {
        let mut models = BTreeMap::new();
        models.insert("rated".to_string(), ProblemModel { difficulty: Some(1000.0) });
        models.insert("unrated".to_string(), ProblemModel { difficulty: None });
        assert_eq!(categorize("rated", &models), DiffCategory::Green);
        assert_eq!(categorize("unrated", &models), DiffCategory::Black);
        assert_eq!(categorize("missing", &models), DiffCategory::Black);
    }

    #[test]
    fn collect_tasks_should_deduplicate_problems() {
        let associations = vec![
            ContestProblem {
                contest_id: "abc200".to_string(),
                problem_id: "shared".to_string(),
            },
            ContestProblem {
                contest_id: "arc120".to_string(),
                problem_id: "shared".to_string(),
            },
            ContestProblem {
                contest_id: "arc120".to_string(),
                problem_id: "arc120_a".to_string(),
            },
            ContestProblem {
                contest_id: "agc050".to_string(),
                problem_id: "agc050_a".to_string(),
            },
        ];
        let contests: BTreeSet<String> = ["abc200", "arc120"].map(String::from).into();
        let solved: BTreeSet<String> = ["arc120_a"].map(String::from).into();

        let tasks = collect_tasks(&associations, &contests, &solved);
        assert_eq!(
            tasks,
            vec![Task {
                problem_id: "shared".to_string(),
                contest_id: "abc200".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn generate_should_draw_from_in_range_pool() {
        let source = FixtureSource::from_fixtures();
        let config = abc_2020_config(Quota::new().with(DiffCategory::Green, 2));
        let generator = Generator::new(source, config);

        for seed in 0..20 {
            let set = generator
                .generate(&mut StdRng::seed_from_u64(seed))
                .await
                .unwrap();
            assert_eq!(set.len(), 2);
            assert!(set.entries.iter().all(|e| e.category == "green"));
            assert!(set.ids().all(|id| id.starts_with("abc150_")));
            assert_ne!(set.entries[0].id, set.entries[1].id);
        }
        assert_eq!(
            *generator.source.requested.borrow(),
            ["contests", "contest-problem", "problem-models"].repeat(20)
        );
    }

    #[tokio::test]
    async fn generate_should_fail_when_pool_is_too_small() {
        let source = FixtureSource::from_fixtures();
        let quota = Quota::new()
            .with(DiffCategory::Gray, 1)
            .with(DiffCategory::Green, 6);
        let generator = Generator::new(source, abc_2020_config(quota));

        let err = generator
            .generate(&mut StdRng::seed_from_u64(0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::NotEnoughProblems { ref category, requested: 6, available: 5 }
                if category == "green"
        ));
    }

    #[tokio::test]
    async fn generate_should_stop_after_failed_contest_fetch() {
        let source = FixtureSource {
            failing: Some("contests"),
            ..FixtureSource::from_fixtures()
        };
        let config = abc_2020_config(Quota::new().with(DiffCategory::Green, 1));
        let generator = Generator::new(source, config);

        let err = generator
            .generate(&mut StdRng::seed_from_u64(0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Network { ref resource, .. } if resource == "contests"));
        assert_eq!(*generator.source.requested.borrow(), vec!["contests"]);
    }

    #[tokio::test]
    async fn generate_should_fail_on_model_fetch_error() {
        let source = FixtureSource {
            failing: Some("problem-models"),
            ..FixtureSource::from_fixtures()
        };
        let generator = Generator::new(source, abc_2020_config(Quota::new()));

        let err = generator
            .generate(&mut StdRng::seed_from_u64(0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Network { ref resource, .. } if resource == "problem-models"));
    }

    #[tokio::test]
    async fn generate_should_exclude_solved_problems() {
        let mut source = FixtureSource::from_fixtures();
        let submission = |epoch_second, problem_id: &str, result: &str| Submission {
            epoch_second,
            problem_id: problem_id.to_string(),
            result: result.to_string(),
        };
        source.submissions.insert(
            "kenkoooo".to_string(),
            vec![
                submission(10, "abc150_c", "AC"),
                submission(20, "abc150_d", "WA"),
                submission(30, "abc150_e", "AC"),
            ],
        );

        let mut participants = Participants::new();
        participants.add_line("kenkoooo");
        let config = AtCoderConfigBuilder::default()
            .participants(participants)
            .contest_types([ContestType::Abc].into_iter().collect::<BTreeSet<_>>())
            .date_min(date(2020, 1, 1))
            .date_max(date(2020, 12, 31))
            .quota(Quota::new().with(DiffCategory::Green, 3))
            .exclude_solved(true)
            .build()
            .unwrap();
        let generator = Generator::new(source, config);

        let set = generator
            .generate(&mut StdRng::seed_from_u64(3))
            .await
            .unwrap();
        let ids: BTreeSet<&str> = set.ids().collect();
        assert_eq!(ids, ["abc150_d", "abc150_f", "abc150_g"].into());

        let pages = generator
            .source
            .requested
            .borrow()
            .iter()
            .filter(|r| *r == "submissions")
            .count();
        assert_eq!(pages, 3);
    }
}
