use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// One generated problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProblemEntry {
    pub id: String,
    pub category: String,
    pub url: String,
    pub title: Option<String>,
}

/// Ordered result of one generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProblemSet {
    pub entries: Vec<ProblemEntry>,
}

impl ProblemSet {
    pub fn new(entries: Vec<ProblemEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.id.as_str())
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.entries.shuffle(rng);
    }

    /// Entries paired with their contest-style label (A, B, ..., Z, AA, ...).
    pub fn labeled(&self) -> impl Iterator<Item = (String, &ProblemEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (label(i), entry))
    }
}

fn label(mut index: usize) -> String {
    let mut chars = vec![];
    loop {
        chars.push((b'A' + (index % 26) as u8) as char);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    chars.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_should_count_like_spreadsheet_columns() {
        assert_eq!(label(0), "A");
        assert_eq!(label(25), "Z");
        assert_eq!(label(26), "AA");
        assert_eq!(label(27), "AB");
        assert_eq!(label(26 * 27), "AAA");
    }
}
