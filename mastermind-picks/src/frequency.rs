use mastermind_db::history::DrawHistory;
use mastermind_db::models::Domain;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFrequency {
    pub number: u8,
    /// Nombre de tirages contenant ce numéro.
    pub count: u32,
    /// Index du dernier tirage le contenant (0 = tirage le plus récent), `None` si jamais sorti.
    pub last_seen: Option<usize>,
}

/// Table de fréquences d'un domaine, triée par fréquence décroissante.
///
/// Contient toujours une entrée par numéro du domaine. À fréquence égale,
/// le plus petit numéro est classé en premier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    pub domain: Domain,
    pub draws: usize,
    entries: Vec<NumberFrequency>,
}

impl FrequencyTable {
    pub fn entries(&self) -> &[NumberFrequency] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Numéros du plus fréquent au moins fréquent.
    pub fn ranked(&self) -> Vec<u8> {
        self.entries.iter().map(|e| e.number).collect()
    }

    /// Les `n` numéros les moins fréquents.
    pub fn tail(&self, n: usize) -> Vec<u8> {
        let start = self.entries.len().saturating_sub(n);
        self.entries[start..].iter().map(|e| e.number).collect()
    }

    pub fn count_of(&self, number: u8) -> u32 {
        self.entries
            .iter()
            .find(|e| e.number == number)
            .map(|e| e.count)
            .unwrap_or(0)
    }
}

pub fn analyze_frequency(history: &DrawHistory, domain: Domain) -> FrequencyTable {
    let mut entries: Vec<NumberFrequency> = (1..=domain.max())
        .map(|n| NumberFrequency {
            number: n,
            count: 0,
            last_seen: None,
        })
        .collect();

    for (i, draw) in history.recent_first().enumerate() {
        // l'historique ne contient que des tirages validés
        for &n in domain.numbers_from(draw) {
            if let Some(entry) = (n as usize).checked_sub(1).and_then(|idx| entries.get_mut(idx)) {
                entry.count += 1;
                entry.last_seen.get_or_insert(i);
            }
        }
    }

    // tri stable : les égalités restent dans l'ordre croissant des numéros
    entries.sort_by(|a, b| b.count.cmp(&a.count));

    FrequencyTable {
        domain,
        draws: history.len(),
        entries,
    }
}
