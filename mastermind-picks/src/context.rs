use chrono::NaiveDate;

use mastermind_db::history::DrawHistory;
use mastermind_db::models::Domain;

use crate::config::GeneratorConfig;
use crate::frequency::{FrequencyTable, analyze_frequency};
use crate::heat::{HeatMethod, HeatTiers, classify};

/// Instantané en lecture seule consommé par les générateurs : fréquences et groupes
/// des deux domaines, dernier tirage, date du jour et options.
#[derive(Debug, Clone)]
pub struct PickContext<'a> {
    pub config: &'a GeneratorConfig,
    pub main_frequency: FrequencyTable,
    pub euro_frequency: FrequencyTable,
    pub main: HeatTiers,
    pub euro: HeatTiers,
    pub latest_main: Option<[u8; 5]>,
    pub today: NaiveDate,
    pub jackpot_bias: bool,
    pub avoid_popular: bool,
}

impl<'a> PickContext<'a> {
    pub fn build(
        history: &DrawHistory,
        config: &'a GeneratorConfig,
        method: HeatMethod,
        today: NaiveDate,
    ) -> Self {
        let scheme = config.heat_scheme(method);
        let main_frequency = analyze_frequency(history, Domain::Main);
        let euro_frequency = analyze_frequency(history, Domain::Euro);
        let main = classify(&main_frequency, &scheme);
        let euro = classify(&euro_frequency, &scheme);

        tracing::debug!(
            draws = history.len(),
            hot = main.hot.len(),
            warm = main.warm.len(),
            cold = main.cold.len(),
            ?method,
            "groupes de chaleur calculés"
        );

        Self {
            config,
            main_frequency,
            euro_frequency,
            main,
            euro,
            latest_main: history.latest().map(|d| d.main),
            today,
            jackpot_bias: false,
            avoid_popular: false,
        }
    }

    pub fn with_jackpot_bias(mut self, enabled: bool) -> Self {
        self.jackpot_bias = enabled;
        self
    }

    pub fn with_avoid_popular(mut self, enabled: bool) -> Self {
        self.avoid_popular = enabled;
        self
    }
}
