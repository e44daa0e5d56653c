use askama::Template;

use crate::problem_set::{ProblemEntry, ProblemSet};
use crate::Result;

#[derive(Debug, Template)]
#[template(path = "problem_set.html.j2")]
struct ProblemSetPage<'a> {
    heading: &'a str,
    rows: Vec<Row<'a>>,
}

#[derive(Debug)]
struct Row<'a> {
    label: String,
    title: &'a str,
    entry: &'a ProblemEntry,
}

/// One line per problem: `A. <id> [title] [<category>] <url>`.
pub fn render_text(set: &ProblemSet) -> String {
    set.labeled()
        .map(|(label, entry)| match &entry.title {
            Some(title) => format!(
                "{}. {} {} [{}] {}",
                label, entry.id, title, entry.category, entry.url
            ),
            None => format!("{}. {} [{}] {}", label, entry.id, entry.category, entry.url),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_html(heading: &str, set: &ProblemSet) -> Result<String> {
    let page = ProblemSetPage {
        heading,
        rows: set
            .labeled()
            .map(|(label, entry)| Row {
                label,
                title: entry.title.as_deref().unwrap_or_default(),
                entry,
            })
            .collect(),
    };
    Ok(page.render()?)
}
