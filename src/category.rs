use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, FromRepr, IntoEnumIterator};

use crate::{Error, Result};

/// AtCoder Problems difficulty colours, lowest first.
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
    EnumCount,
    FromRepr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum DiffCategory {
    Black,
    Gray,
    Brown,
    Green,
    Cyan,
    Blue,
    Yellow,
    Orange,
    Red,
    Bronze,
    Silver,
    Gold,
}

impl DiffCategory {
    /// Width of one colour band.
    pub const BAND: f64 = 400.0;

    /// Colour of a problem with the given difficulty. Black is reserved for
    /// problems without a difficulty; everything at or above the last band
    /// lands in gold.
    pub fn from_difficulty(difficulty: f64) -> Self {
        Self::from_repr(band_index(difficulty)).unwrap_or(Self::Gold)
    }
}

/// `min(1 + max(0, floor(d / 400)), last)`.
pub fn band_index(difficulty: f64) -> usize {
    let band = (difficulty / DiffCategory::BAND).floor().max(0.0) as usize;
    band.saturating_add(1).min(DiffCategory::COUNT - 1)
}

/// AOJ-ICPC point tiers, lowest first.
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
    EnumCount,
)]
pub enum PointCategory {
    #[strum(to_string = "uncategorized", serialize = "?")]
    #[serde(rename = "uncategorized")]
    Uncategorized,
    #[strum(to_string = "100")]
    #[serde(rename = "100")]
    P100,
    #[strum(to_string = "150")]
    #[serde(rename = "150")]
    P150,
    #[strum(to_string = "200")]
    #[serde(rename = "200")]
    P200,
    #[strum(to_string = "250")]
    #[serde(rename = "250")]
    P250,
    #[strum(to_string = "300")]
    #[serde(rename = "300")]
    P300,
    #[strum(to_string = "350")]
    #[serde(rename = "350")]
    P350,
    #[strum(to_string = "400")]
    #[serde(rename = "400")]
    P400,
    #[strum(to_string = "450")]
    #[serde(rename = "450")]
    P450,
    #[strum(to_string = "500")]
    #[serde(rename = "500")]
    P500,
    #[strum(to_string = "550")]
    #[serde(rename = "550")]
    P550,
    #[strum(to_string = "600")]
    #[serde(rename = "600")]
    P600,
    #[strum(to_string = "700")]
    #[serde(rename = "700")]
    P700,
    #[strum(to_string = "800")]
    #[serde(rename = "800")]
    P800,
    #[strum(to_string = "900")]
    #[serde(rename = "900")]
    P900,
    #[strum(to_string = "1000")]
    #[serde(rename = "1000")]
    P1000,
    #[strum(to_string = "1100")]
    #[serde(rename = "1100")]
    P1100,
    #[strum(to_string = "1200-over", serialize = "1200+")]
    #[serde(rename = "1200-over")]
    P1200Over,
}

impl PointCategory {
    /// Lower bound of the tier, `None` for uncategorized.
    pub fn min_point(self) -> Option<u32> {
        match self {
            Self::Uncategorized => None,
            Self::P1200Over => Some(1200),
            other => other.to_string().parse().ok(),
        }
    }

    /// Tier of a point cell as printed on the aggregator page.
    pub fn from_point_text(text: &str) -> Self {
        let text = text.trim();
        match text.parse::<u32>() {
            Ok(point) => Self::iter()
                .filter(|c| c.min_point().map_or(false, |min| min <= point))
                .last()
                .unwrap_or(Self::Uncategorized),
            Err(_) => text.parse().unwrap_or(Self::Uncategorized),
        }
    }
}

/// Requested number of problems per category. Missing categories count 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quota<C: Ord>(BTreeMap<C, usize>);

impl<C: Ord> Default for Quota<C> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<C: Ord + Copy> Quota<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, category: C, count: usize) -> &mut Self {
        if count == 0 {
            self.0.remove(&category);
        } else {
            self.0.insert(category, count);
        }
        self
    }

    pub fn with(mut self, category: C, count: usize) -> Self {
        self.set(category, count);
        self
    }

    pub fn get(&self, category: C) -> usize {
        self.0.get(&category).copied().unwrap_or(0)
    }

    /// Categories with a non-zero count, in category order.
    pub fn requested(&self) -> impl Iterator<Item = (C, usize)> + '_ {
        self.0.iter().map(|(c, n)| (*c, *n))
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<C: Ord + Copy> FromIterator<QuotaEntry<C>> for Quota<C> {
    fn from_iter<I: IntoIterator<Item = QuotaEntry<C>>>(iter: I) -> Self {
        let mut quota = Self::new();
        for entry in iter {
            quota.set(entry.category, entry.count);
        }
        quota
    }
}

/// One `<category>=<count>` pair as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaEntry<C> {
    pub category: C,
    pub count: usize,
}

impl<C: FromStr> FromStr for QuotaEntry<C> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidQuota(s.to_string());
        let (category, count) = s.split_once('=').ok_or_else(invalid)?;
        Ok(Self {
            category: category.trim().parse().map_err(|_| invalid())?,
            count: count.trim().parse().map_err(|_| invalid())?,
        })
    }
}

impl<C: fmt::Display> fmt::Display for QuotaEntry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.category, self.count)
    }
}
