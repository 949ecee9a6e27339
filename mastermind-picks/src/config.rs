use serde::{Deserialize, Serialize};

use crate::heat::{HeatMethod, HeatScheme, PercentileCuts, RecencyRanges};

/// Bornes inclusives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub min: u32,
    pub max: u32,
}

impl Range {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u32) -> bool {
        self.min <= value && value <= self.max
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LadderConfig {
    pub sum: Range,
    pub even_count: Range,
    /// Nombre de numéros repris du dernier tirage, tiré au hasard dans cette liste.
    pub repeat_counts: Vec<usize>,
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            sum: Range::new(100, 140),
            even_count: Range::new(2, 3),
            repeat_counts: vec![1, 2],
        }
    }
}

/// Étapes de repli pour constituer le pool Hermes, essayées dans l'ordre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HermesPoolStep {
    CalendarFiltered,
    SectionUnfiltered,
    ColdTier,
    FullDomain,
}

pub const DEFAULT_SECTION_WEIGHTS: [f64; 5] = [0.1, 0.2, 0.2, 0.1, 0.2];
pub const APRIL_SECTION_WEIGHTS: [f64; 5] = [0.1, 0.3, 0.2, 0.1, 0.3];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HermesConfig {
    pub jackpot_sum: Range,
    /// Variante froide : une section n'est retenue que si son poids atteint ce seuil.
    pub section_threshold: f64,
    /// month_weights[m - 1] = poids des 5 sections (1-10, 11-20, ..., 41-50) pour le mois m.
    pub month_weights: [[f64; 5]; 12],
    pub fallback: Vec<HermesPoolStep>,
}

impl Default for HermesConfig {
    fn default() -> Self {
        let mut month_weights = [DEFAULT_SECTION_WEIGHTS; 12];
        month_weights[3] = APRIL_SECTION_WEIGHTS;
        Self {
            jackpot_sum: Range::new(120, 160),
            section_threshold: 0.2,
            month_weights,
            fallback: vec![
                HermesPoolStep::CalendarFiltered,
                HermesPoolStep::SectionUnfiltered,
                HermesPoolStep::ColdTier,
                HermesPoolStep::FullDomain,
            ],
        }
    }
}

impl HermesConfig {
    pub fn weights_for_month(&self, month: u32) -> [f64; 5] {
        let idx = (month.clamp(1, 12) - 1) as usize;
        self.month_weights[idx]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StealthConfig {
    /// Nombre de numéros les moins fréquents formant le pool "rare".
    pub tail: usize,
    pub birthday_cutoff: u8,
    pub euro_floor: u8,
}

impl Default for StealthConfig {
    fn default() -> Self {
        Self {
            tail: 30,
            birthday_cutoff: 31,
            euro_floor: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboConfig {
    pub hermes: usize,
    pub ladder: usize,
}

impl Default for ComboConfig {
    fn default() -> Self {
        Self { hermes: 1, ladder: 4 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub primary_attempts: usize,
    pub calendar_attempts: usize,
    pub percentile: PercentileCuts,
    pub recency: RecencyRanges,
    pub ladder: LadderConfig,
    pub hermes: HermesConfig,
    pub stealth: StealthConfig,
    pub combo: ComboConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            primary_attempts: 100,
            calendar_attempts: 50,
            percentile: PercentileCuts::default(),
            recency: RecencyRanges::default(),
            ladder: LadderConfig::default(),
            hermes: HermesConfig::default(),
            stealth: StealthConfig::default(),
            combo: ComboConfig::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn heat_scheme(&self, method: HeatMethod) -> HeatScheme {
        match method {
            HeatMethod::Percentile => HeatScheme::Percentile(self.percentile),
            HeatMethod::Recency => HeatScheme::Recency(self.recency),
        }
    }
}

pub fn save_config(config: &GeneratorConfig, path: &std::path::Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn load_config(path: &std::path::Path) -> anyhow::Result<GeneratorConfig> {
    let json = std::fs::read_to_string(path)?;
    let config: GeneratorConfig = serde_json::from_str(&json)?;
    Ok(config)
}
