use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use mastermind_db::models::Domain;

/// Valeurs "calendaires" du jour : jour du mois, mois, jour ISO de la semaine (1 = lundi).
pub fn calendar_values(date: NaiveDate) -> [u32; 3] {
    [
        date.day(),
        date.month(),
        date.weekday().number_from_monday(),
    ]
}

/// Numéros à exclure d'un domaine pour la date donnée. Une valeur n'est exclue
/// que si elle appartient au domaine (le mois peut donc exclure un numéro Euro).
pub fn exclusion_set(date: NaiveDate, domain: Domain) -> BTreeSet<u8> {
    calendar_values(date)
        .into_iter()
        .filter_map(|v| u8::try_from(v).ok())
        .filter(|&v| domain.contains(v))
        .collect()
}

/// Ensemble élargi de la stratégie furtive : jour ± 1, mois ± 1,
/// et le jour de semaine compté depuis 0 (lundi) avec son suivant.
pub fn stealth_avoid_set(date: NaiveDate, domain: Domain) -> BTreeSet<u8> {
    let day = date.day() as i64;
    let month = date.month() as i64;
    let weekday0 = date.weekday().num_days_from_monday() as i64;

    (day - 1..=day + 1)
        .chain(month - 1..=month + 1)
        .chain(weekday0..=weekday0 + 1)
        .filter_map(|v| u8::try_from(v).ok())
        .filter(|&v| domain.contains(v))
        .collect()
}

/// Retire les numéros exclus ; si moins de `needed` restent, retourne le pool intact.
pub fn filter_or_keep(pool: &[u8], excluded: &BTreeSet<u8>, needed: usize) -> Vec<u8> {
    let filtered: Vec<u8> = pool.iter().copied().filter(|n| !excluded.contains(n)).collect();
    if filtered.len() < needed {
        pool.to_vec()
    } else {
        filtered
    }
}
