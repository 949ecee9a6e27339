use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use mastermind_db::models::{Domain, Pick};

/// Raison pour laquelle une grille provient du tirage de repli.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackReason {
    /// Un pool ne contenait pas assez de numéros.
    InsufficientPool,
    /// Le critère d'acceptation n'a jamais été satisfait dans le budget d'essais.
    ConstraintUnsatisfied,
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackReason::InsufficientPool => write!(f, "pool insuffisant"),
            FallbackReason::ConstraintUnsatisfied => write!(f, "contrainte non satisfaite"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Generated {
    pub pick: Pick,
    pub fallback: Option<FallbackReason>,
    pub attempts: usize,
}

pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// Tire `count` numéros distincts du pool. `None` si le pool est trop petit.
pub fn sample_without_replacement<R: Rng + ?Sized>(
    pool: &[u8],
    count: usize,
    rng: &mut R,
) -> Option<Vec<u8>> {
    if pool.len() < count {
        return None;
    }
    Some(
        index::sample(rng, pool.len(), count)
            .into_iter()
            .map(|i| pool[i])
            .collect(),
    )
}

/// Tirage uniforme sur tout le domaine.
pub fn uniform_numbers<R: Rng + ?Sized>(domain: Domain, rng: &mut R) -> Vec<u8> {
    index::sample(rng, domain.size(), domain.pick_count())
        .into_iter()
        .map(|i| (i + 1) as u8)
        .collect()
}

pub fn uniform_pick<R: Rng + ?Sized>(rng: &mut R) -> Pick {
    let mut main = [0u8; 5];
    main.copy_from_slice(&uniform_numbers(Domain::Main, rng));
    main.sort();
    let mut euro = [0u8; 2];
    euro.copy_from_slice(&uniform_numbers(Domain::Euro, rng));
    euro.sort();
    Pick { main, euro }
}

/// Pool privé des numéros déjà choisis.
pub fn without(pool: &[u8], taken: &[u8]) -> Vec<u8> {
    pool.iter().copied().filter(|n| !taken.contains(n)).collect()
}

/// Échantillonnage par rejet borné.
///
/// `candidate` propose une grille (`None` = pool insuffisant, inutile d'insister),
/// `accept` la valide ; après `max_attempts` refus, `fallback` fournit une grille
/// sans contrainte. Termine toujours.
pub fn sample_until<R, C, A, F>(
    rng: &mut R,
    max_attempts: usize,
    mut candidate: C,
    accept: A,
    fallback: F,
) -> Generated
where
    R: Rng + ?Sized,
    C: FnMut(&mut R) -> Option<Pick>,
    A: Fn(&Pick) -> bool,
    F: FnOnce(&mut R) -> Pick,
{
    let mut attempts = 0;
    let mut reason = FallbackReason::ConstraintUnsatisfied;

    while attempts < max_attempts {
        attempts += 1;
        match candidate(rng) {
            Some(pick) if accept(&pick) => {
                return Generated {
                    pick,
                    fallback: None,
                    attempts,
                };
            }
            Some(_) => {}
            None => {
                reason = FallbackReason::InsufficientPool;
                break;
            }
        }
    }

    tracing::trace!(attempts, %reason, "échantillonnage par rejet épuisé");
    Generated {
        pick: fallback(rng),
        fallback: Some(reason),
        attempts,
    }
}
