use serde::{Deserialize, Serialize};

use crate::frequency::FrequencyTable;

/// Découpage par rang de fréquence, en pourcentages entiers du domaine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PercentileCuts {
    pub hot: u32,
    pub warm: u32,
    pub cold: u32,
}

impl Default for PercentileCuts {
    fn default() -> Self {
        Self {
            hot: 15,
            warm: 35,
            cold: 30,
        }
    }
}

/// Découpage par ancienneté de la dernière sortie (en nombre de tirages).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecencyRanges {
    pub hot_range: usize,
    pub warm_range: usize,
    pub cold_gap: usize,
}

impl Default for RecencyRanges {
    fn default() -> Self {
        Self {
            hot_range: 5,
            warm_range: 15,
            cold_gap: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum HeatMethod {
    #[default]
    Percentile,
    Recency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatScheme {
    Percentile(PercentileCuts),
    Recency(RecencyRanges),
}

/// Partition chaud / tiède / froid d'un domaine. Les trois groupes sont disjoints
/// et peuvent ne pas couvrir tout le domaine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeatTiers {
    pub hot: Vec<u8>,
    pub warm: Vec<u8>,
    pub cold: Vec<u8>,
}

impl HeatTiers {
    pub fn hot_warm(&self) -> Vec<u8> {
        self.hot.iter().chain(&self.warm).copied().collect()
    }

    pub fn all(&self) -> Vec<u8> {
        self.hot.iter().chain(&self.warm).chain(&self.cold).copied().collect()
    }
}

fn ceil_percent(n: usize, percent: u32) -> usize {
    (n * percent as usize).div_ceil(100)
}

pub fn classify(table: &FrequencyTable, scheme: &HeatScheme) -> HeatTiers {
    match scheme {
        HeatScheme::Percentile(cuts) => classify_percentile(table, cuts),
        HeatScheme::Recency(ranges) => classify_recency(table, ranges),
    }
}

pub fn classify_percentile(table: &FrequencyTable, cuts: &PercentileCuts) -> HeatTiers {
    let ranked = table.ranked();
    let n = ranked.len();

    let hot_end = ceil_percent(n, cuts.hot).min(n);
    let warm_end = (hot_end + ceil_percent(n, cuts.warm)).min(n);
    // le froid ne déborde jamais sur le tiède
    let cold_start = n.saturating_sub(ceil_percent(n, cuts.cold)).max(warm_end);

    HeatTiers {
        hot: ranked[..hot_end].to_vec(),
        warm: ranked[hot_end..warm_end].to_vec(),
        cold: ranked[cold_start..].to_vec(),
    }
}

pub fn classify_recency(table: &FrequencyTable, ranges: &RecencyRanges) -> HeatTiers {
    let mut by_recency: Vec<(u8, usize)> = table
        .entries()
        .iter()
        .map(|e| (e.number, e.last_seen.unwrap_or(usize::MAX)))
        .collect();
    by_recency.sort_by_key(|&(number, seen)| (seen, number));

    let mut tiers = HeatTiers::default();
    for (number, seen) in by_recency {
        if seen < ranges.hot_range {
            tiers.hot.push(number);
        } else if seen < ranges.warm_range {
            tiers.warm.push(number);
        } else if seen >= ranges.cold_gap {
            tiers.cold.push(number);
        }
    }
    tiers
}
