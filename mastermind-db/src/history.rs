use chrono::NaiveDate;

use crate::models::{Draw, DrawError};

/// Historique des tirages, trié par date croissante, sans doublons
/// (identité = date + numéros + numéros Euro).
#[derive(Debug, Clone, Default)]
pub struct DrawHistory {
    draws: Vec<Draw>,
}

impl DrawHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Échoue au premier tirage invalide.
    pub fn from_draws(draws: impl IntoIterator<Item = Draw>) -> Result<Self, DrawError> {
        let mut history = Self::new();
        for draw in draws {
            history.ingest(draw)?;
        }
        Ok(history)
    }

    /// Ajoute un tirage à sa place chronologique, après validation et tri des numéros.
    /// Retourne `Ok(false)` pour un doublon.
    pub fn ingest(&mut self, draw: Draw) -> Result<bool, DrawError> {
        let draw = Draw::new(draw.date, &draw.main, &draw.euro)?;
        if self.draws.contains(&draw) {
            return Ok(false);
        }
        // après les tirages de même date : l'ordre d'arrivée est conservé
        let idx = self.draws.partition_point(|d| d.date <= draw.date);
        self.draws.insert(idx, draw);
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// Tirages du plus ancien au plus récent.
    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }

    /// Tirages du plus récent au plus ancien (index 0 = dernier tirage).
    pub fn recent_first(&self) -> impl Iterator<Item = &Draw> {
        self.draws.iter().rev()
    }

    pub fn latest(&self) -> Option<&Draw> {
        self.draws.last()
    }

    pub fn find_by_date(&self, date: NaiveDate) -> Option<&Draw> {
        self.draws.iter().rev().find(|d| d.date == date)
    }
}

/// Historique synthétique pour les tests : un tirage tous les 3 jours à partir du 2024-01-02.
pub fn make_test_history(n: usize) -> DrawHistory {
    let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap_or_default();
    DrawHistory::from_draws((0..n).map(|i| {
        let base = (i % 10) as u8;
        Draw {
            date: start + chrono::Duration::days(3 * i as i64),
            main: [
                base * 5 + 1,
                base * 5 + 2,
                base * 5 + 3,
                base * 5 + 4,
                base * 5 + 5,
            ],
            euro: [base % 12 + 1, (base + 1) % 12 + 1],
        }
    }))
    .unwrap_or_default()
}
