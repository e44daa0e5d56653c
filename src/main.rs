use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use problem_set_generator::aoj_icpc::{self, AojIcpcGenerator, AojIcpcQueryBuilder};
use problem_set_generator::atcoder::{
    self, AtCoderConfigBuilder, ContestType, Generator, HttpSource,
};
use problem_set_generator::category::{DiffCategory, PointCategory, Quota, QuotaEntry};
use problem_set_generator::participants::Participants;
use problem_set_generator::problem_set::ProblemSet;
use problem_set_generator::render::{render_html, render_text};
use rand::rngs::StdRng;
use rand::SeedableRng;
use strum::IntoEnumIterator;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "problem-set-generator", version, about = "Generate practice problem sets")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Virtual contest out of AtCoder problems, drawn per difficulty colour
    Atcoder(AtCoderArgs),
    /// ICPC style set out of the AOJ-ICPC catalog, drawn per point tier
    AojIcpc(AojIcpcArgs),
}

#[derive(Debug, Args)]
struct AtCoderArgs {
    /// Participant handles, space separated; repeatable
    #[arg(short, long = "participant", value_name = "HANDLES")]
    participants: Vec<String>,
    /// First contest day (JST), inclusive
    #[arg(long, value_name = "YYYY-MM-DD")]
    date_min: Option<NaiveDate>,
    /// Last contest day (JST), inclusive
    #[arg(long, value_name = "YYYY-MM-DD")]
    date_max: Option<NaiveDate>,
    /// Leave out a contest type: abc, arc, agc or other
    #[arg(long = "exclude", value_name = "TYPE")]
    excluded: Vec<ContestType>,
    /// Problems per colour, e.g. `--num green=2`
    #[arg(short, long = "num", value_name = "COLOUR=N")]
    quota: Vec<QuotaEntry<DiffCategory>>,
    /// Skip problems a participant already solved
    #[arg(long)]
    exclude_solved: bool,
    #[arg(long, env = "ATCODER_PROBLEMS_URL", default_value = atcoder::SERVICE_URL)]
    service_url: String,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Debug, Args)]
struct AojIcpcArgs {
    /// Rival handles, space separated; repeatable
    #[arg(short, long = "rival", value_name = "HANDLES")]
    rivals: Vec<String>,
    #[arg(long)]
    year_min: Option<u32>,
    #[arg(long)]
    year_max: Option<u32>,
    #[arg(long)]
    no_domestic: bool,
    #[arg(long)]
    no_regional: bool,
    #[arg(long)]
    no_jag_domestic: bool,
    #[arg(long)]
    no_jag_other: bool,
    /// Problems per point tier, e.g. `--num 300=1` or `--num uncategorized=1`
    #[arg(short, long = "num", value_name = "POINT=N")]
    quota: Vec<QuotaEntry<PointCategory>>,
    #[arg(long, env = "AOJ_ICPC_URL", default_value = aoj_icpc::SERVICE_URL)]
    service_url: String,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Debug, Args)]
struct OutputArgs {
    /// Seed for a reproducible draw
    #[arg(long)]
    seed: Option<u64>,
    /// Shuffle the final order instead of listing by category
    #[arg(long)]
    shuffle: bool,
    /// Write an HTML page instead of printing a list
    #[arg(long, value_name = "FILE")]
    html: Option<PathBuf>,
}

impl OutputArgs {
    fn rng(&self) -> StdRng {
        self.seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
    }

    fn emit(&self, heading: &str, mut set: ProblemSet, rng: &mut StdRng) -> Result<()> {
        if self.shuffle {
            set.shuffle(rng);
        }
        info!(problems = set.len(), "problem set generated");

        match &self.html {
            Some(path) => {
                let html = render_html(heading, &set)?;
                fs::write(path, html)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!(path = %path.display(), "problem set written");
            }
            None if !set.is_empty() => println!("{}", render_text(&set)),
            None => {}
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    match Cli::parse().command {
        Command::Atcoder(args) => run_atcoder(args).await,
        Command::AojIcpc(args) => run_aoj_icpc(args).await,
    }
}

async fn run_atcoder(args: AtCoderArgs) -> Result<()> {
    let contest_types = ContestType::iter()
        .filter(|t| !args.excluded.contains(t))
        .collect::<BTreeSet<_>>();
    let config = AtCoderConfigBuilder::default()
        .participants(read_handles(&args.participants))
        .date_min(args.date_min)
        .date_max(args.date_max)
        .contest_types(contest_types)
        .quota(args.quota.iter().copied().collect::<Quota<_>>())
        .exclude_solved(args.exclude_solved)
        .build()?;

    let generator = Generator::new(HttpSource::new(&args.service_url)?, config);
    let mut rng = args.output.rng();
    let set = generator
        .generate(&mut rng)
        .await
        .context("failed to generate AtCoder problem set")?;

    args.output.emit("AtCoder virtual contest", set, &mut rng)
}

async fn run_aoj_icpc(args: AojIcpcArgs) -> Result<()> {
    let query = AojIcpcQueryBuilder::default()
        .rivals(read_handles(&args.rivals))
        .year_min(args.year_min)
        .year_max(args.year_max)
        .include_domestic(!args.no_domestic)
        .include_regional(!args.no_regional)
        .include_jag_domestic(!args.no_jag_domestic)
        .include_jag_other(!args.no_jag_other)
        .build()?;
    let quota = args.quota.iter().copied().collect::<Quota<_>>();

    let generator = AojIcpcGenerator::new(query, quota).with_service_url(&args.service_url);
    info!(url = %generator.query_url()?, "querying AOJ-ICPC");
    let mut rng = args.output.rng();
    let set = generator
        .generate(&mut rng)
        .await
        .context("failed to generate AOJ-ICPC problem set")?;

    args.output.emit("AOJ-ICPC problem set", set, &mut rng)
}

/// Rejected handles are reported and skipped.
fn read_handles(lines: &[String]) -> Participants {
    let mut participants = Participants::new();
    for line in lines {
        participants.add_line(line);
    }
    participants
}

fn init_tracing() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
