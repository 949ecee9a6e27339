/// Motifs fréquemment joués par les humains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopularPattern {
    /// Tous les numéros ≤ 31 (dates d'anniversaire).
    Birthday,
    /// Cinq numéros consécutifs.
    Consecutive,
    /// Même dernier chiffre partout.
    SameLastDigit,
}

impl std::fmt::Display for PopularPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PopularPattern::Birthday => write!(f, "anniversaires (tous ≤ 31)"),
            PopularPattern::Consecutive => write!(f, "suite consécutive"),
            PopularPattern::SameLastDigit => write!(f, "même dernier chiffre"),
        }
    }
}

const BIRTHDAY_MAX: u8 = 31;

pub fn popular_pattern(main: &[u8; 5]) -> Option<PopularPattern> {
    if main.iter().all(|&n| n <= BIRTHDAY_MAX) {
        return Some(PopularPattern::Birthday);
    }
    let mut sorted = *main;
    sorted.sort();
    if sorted.windows(2).all(|w| w[1] == w[0] + 1) {
        return Some(PopularPattern::Consecutive);
    }
    if main.iter().all(|&n| n % 10 == main[0] % 10) {
        return Some(PopularPattern::SameLastDigit);
    }
    None
}

pub fn is_popular(main: &[u8; 5]) -> bool {
    popular_pattern(main).is_some()
}
