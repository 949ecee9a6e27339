use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Erreur de domaine : un tirage ou une grille ne respecte pas les règles du jeu.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("{domain} : attendu {expected} numéros, reçu {actual}")]
    WrongCount {
        domain: Domain,
        expected: usize,
        actual: usize,
    },
    #[error("{domain} : numéro {number} hors limites (1-{max})")]
    OutOfRange { domain: Domain, number: u8, max: u8 },
    #[error("{domain} : numéro en double {number}")]
    Duplicate { domain: Domain, number: u8 },
    #[error("{domain} : valeur stockée {value} hors limites (1-{max})")]
    StoredOutOfRange { domain: Domain, value: i64, max: u8 },
}

/// Les deux domaines de numéros. Ils ne doivent jamais être mélangés.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Main,
    Euro,
}

impl Domain {
    pub fn size(&self) -> usize {
        match self {
            Domain::Main => 50,
            Domain::Euro => 12,
        }
    }

    pub fn max(&self) -> u8 {
        self.size() as u8
    }

    pub fn pick_count(&self) -> usize {
        match self {
            Domain::Main => 5,
            Domain::Euro => 2,
        }
    }

    pub fn contains(&self, n: u8) -> bool {
        (1..=self.max()).contains(&n)
    }

    pub fn numbers(&self) -> Vec<u8> {
        (1..=self.max()).collect()
    }

    pub fn numbers_from<'a>(&self, draw: &'a Draw) -> &'a [u8] {
        match self {
            Domain::Main => &draw.main,
            Domain::Euro => &draw.euro,
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Domain::Main => write!(f, "Numéros"),
            Domain::Euro => write!(f, "Euro"),
        }
    }
}

/// Vérifie cardinalité, bornes et unicité d'une série de numéros.
pub fn validate_numbers(domain: Domain, numbers: &[u8]) -> Result<(), DrawError> {
    if numbers.len() != domain.pick_count() {
        return Err(DrawError::WrongCount {
            domain,
            expected: domain.pick_count(),
            actual: numbers.len(),
        });
    }
    for &n in numbers {
        if !domain.contains(n) {
            return Err(DrawError::OutOfRange {
                domain,
                number: n,
                max: domain.max(),
            });
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                return Err(DrawError::Duplicate {
                    domain,
                    number: numbers[i],
                });
            }
        }
    }
    Ok(())
}

pub fn validate_draw(main: &[u8], euro: &[u8]) -> Result<(), DrawError> {
    validate_numbers(Domain::Main, main)?;
    validate_numbers(Domain::Euro, euro)
}

/// Un tirage historique. Les numéros sont stockés triés.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDraw")]
pub struct Draw {
    pub date: NaiveDate,
    pub main: [u8; 5],
    pub euro: [u8; 2],
}

impl Draw {
    pub fn new(date: NaiveDate, main: &[u8], euro: &[u8]) -> Result<Self, DrawError> {
        let numbers = Pick::new(main, euro)?;
        Ok(Self {
            date,
            main: numbers.main,
            euro: numbers.euro,
        })
    }

    /// Revalide un tirage construit champ par champ.
    pub fn validate(&self) -> Result<(), DrawError> {
        validate_draw(&self.main, &self.euro)
    }
}

#[derive(Deserialize)]
struct RawDraw {
    date: NaiveDate,
    main: Vec<u8>,
    euro: Vec<u8>,
}

impl TryFrom<RawDraw> for Draw {
    type Error = DrawError;

    fn try_from(raw: RawDraw) -> Result<Self, Self::Error> {
        Draw::new(raw.date, &raw.main, &raw.euro)
    }
}

/// Une grille candidate : 5 numéros + 2 numéros Euro, triés.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPick")]
pub struct Pick {
    pub main: [u8; 5],
    pub euro: [u8; 2],
}

impl Pick {
    pub fn new(main: &[u8], euro: &[u8]) -> Result<Self, DrawError> {
        validate_draw(main, euro)?;
        let mut m = [0u8; 5];
        m.copy_from_slice(main);
        m.sort();
        let mut e = [0u8; 2];
        e.copy_from_slice(euro);
        e.sort();
        Ok(Self { main: m, euro: e })
    }

    pub fn main_sum(&self) -> u32 {
        self.main.iter().map(|&n| n as u32).sum()
    }

    pub fn even_count(&self) -> usize {
        self.main.iter().filter(|&&n| n % 2 == 0).count()
    }

    /// Nombre de numéros communs avec un tirage.
    pub fn matches(&self, draw: &Draw) -> MatchCount {
        MatchCount {
            main: self.main.iter().filter(|n| draw.main.contains(n)).count(),
            euro: self.euro.iter().filter(|n| draw.euro.contains(n)).count(),
        }
    }
}

#[derive(Deserialize)]
struct RawPick {
    main: Vec<u8>,
    euro: Vec<u8>,
}

impl TryFrom<RawPick> for Pick {
    type Error = DrawError;

    fn try_from(raw: RawPick) -> Result<Self, Self::Error> {
        Pick::new(&raw.main, &raw.euro)
    }
}

impl std::fmt::Display for Pick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} + {:?}", self.main, self.euro)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchCount {
    pub main: usize,
    pub euro: usize,
}

impl std::fmt::Display for MatchCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}+{}", self.main, self.euro)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_validate_draw_ok() {
        assert!(validate_draw(&[1, 2, 3, 4, 5], &[1, 2]).is_ok());
        assert!(validate_draw(&[50, 49, 48, 47, 46], &[11, 12]).is_ok());
    }

    #[test]
    fn test_validate_draw_main_out_of_range() {
        assert!(matches!(
            validate_draw(&[0, 2, 3, 4, 5], &[1, 2]),
            Err(DrawError::OutOfRange { domain: Domain::Main, number: 0, .. })
        ));
        assert!(validate_draw(&[1, 2, 3, 4, 51], &[1, 2]).is_err());
    }

    #[test]
    fn test_validate_draw_euro_out_of_range() {
        assert!(validate_draw(&[1, 2, 3, 4, 5], &[0, 2]).is_err());
        assert!(matches!(
            validate_draw(&[1, 2, 3, 4, 5], &[1, 13]),
            Err(DrawError::OutOfRange { domain: Domain::Euro, number: 13, .. })
        ));
    }

    #[test]
    fn test_validate_draw_duplicates() {
        assert!(matches!(
            validate_draw(&[1, 1, 3, 4, 5], &[1, 2]),
            Err(DrawError::Duplicate { number: 1, .. })
        ));
        assert!(validate_draw(&[1, 2, 3, 4, 5], &[3, 3]).is_err());
    }

    #[test]
    fn test_validate_draw_wrong_count() {
        assert!(matches!(
            validate_draw(&[1, 2, 3, 4], &[1, 2]),
            Err(DrawError::WrongCount { expected: 5, actual: 4, .. })
        ));
        assert!(validate_draw(&[1, 2, 3, 4, 5], &[1, 2, 3]).is_err());
    }

    #[test]
    fn test_domain_size() {
        assert_eq!(Domain::Main.size(), 50);
        assert_eq!(Domain::Euro.size(), 12);
        assert_eq!(Domain::Main.pick_count(), 5);
        assert_eq!(Domain::Euro.pick_count(), 2);
    }

    #[test]
    fn test_draw_new_sorts() {
        let draw = Draw::new(date("2024-01-02"), &[40, 3, 17, 9, 22], &[11, 2]).unwrap();
        assert_eq!(draw.main, [3, 9, 17, 22, 40]);
        assert_eq!(draw.euro, [2, 11]);
        assert_eq!(Domain::Main.numbers_from(&draw), &[3, 9, 17, 22, 40]);
        assert_eq!(Domain::Euro.numbers_from(&draw), &[2, 11]);
    }

    #[test]
    fn test_pick_sum_and_parity() {
        let pick = Pick::new(&[10, 21, 30, 41, 8], &[1, 2]).unwrap();
        assert_eq!(pick.main, [8, 10, 21, 30, 41]);
        assert_eq!(pick.main_sum(), 110);
        assert_eq!(pick.even_count(), 3);
    }

    #[test]
    fn test_pick_matches() {
        let draw = Draw::new(date("2024-01-02"), &[1, 2, 3, 4, 5], &[6, 7]).unwrap();
        let pick = Pick::new(&[1, 2, 3, 40, 50], &[7, 12]).unwrap();
        let hits = pick.matches(&draw);
        assert_eq!(hits, MatchCount { main: 3, euro: 1 });
        assert_eq!(hits.to_string(), "3+1");
    }

    #[test]
    fn test_pick_display() {
        let pick = Pick::new(&[5, 4, 3, 2, 1], &[12, 11]).unwrap();
        assert_eq!(pick.to_string(), "[1, 2, 3, 4, 5] + [11, 12]");
    }

    #[test]
    fn test_draw_json_shape() {
        let draw = Draw::new(date("2024-01-02"), &[5, 4, 3, 2, 1], &[7, 6]).unwrap();
        let json = serde_json::to_value(&draw).unwrap();
        assert_eq!(json["date"], "2024-01-02");
        assert_eq!(json["main"], serde_json::json!([1, 2, 3, 4, 5]));
        assert_eq!(serde_json::to_value(Domain::Euro).unwrap(), "euro");
    }

    #[test]
    fn test_deserialize_rejects_invalid_draw() {
        let zero = r#"{"date":"2024-01-02","main":[0,2,3,4,5],"euro":[1,2]}"#;
        let err = serde_json::from_str::<Draw>(zero).unwrap_err();
        assert!(err.to_string().contains("hors limites"), "{err}");

        let euro = r#"{"date":"2024-01-02","main":[1,2,3,4,5],"euro":[1,13]}"#;
        assert!(serde_json::from_str::<Draw>(euro).is_err());

        let short = r#"{"main":[1,2,3,4],"euro":[1,2]}"#;
        assert!(serde_json::from_str::<Pick>(short).is_err());
    }

    #[test]
    fn test_deserialize_sorts_draw() {
        let json = r#"{"date":"2024-01-02","main":[5,4,3,2,1],"euro":[7,6]}"#;
        let draw: Draw = serde_json::from_str(json).unwrap();
        assert_eq!(draw.main, [1, 2, 3, 4, 5]);
        assert_eq!(draw.euro, [6, 7]);
    }

    #[test]
    fn test_validate_literal_draw() {
        let draw = Draw {
            date: date("2024-01-02"),
            main: [1, 2, 3, 4, 51],
            euro: [1, 13],
        };
        assert_eq!(
            draw.validate(),
            Err(DrawError::OutOfRange { domain: Domain::Main, number: 51, max: 50 })
        );
    }
}
