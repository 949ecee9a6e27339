//! Famille Hermes : le domaine 1-50 est découpé en 5 sections de dix numéros,
//! pondérées par mois, et les valeurs calendaires du jour sont écartées.

use std::collections::BTreeSet;

use chrono::Datelike;
use rand::Rng;

use mastermind_db::models::{Domain, Pick};

use crate::calendar::{exclusion_set, filter_or_keep};
use crate::config::HermesPoolStep;
use crate::context::PickContext;
use crate::sampler::{sample_without_replacement, uniform_numbers};

pub const SECTION_COUNT: usize = 5;
const SECTION_WIDTH: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HermesVariant {
    /// Groupe froid restreint aux sections dont le poids atteint le seuil.
    Cold,
    /// Quota par section sur tout le domaine.
    Hybrid,
}

pub fn section(idx: usize) -> Vec<u8> {
    let start = idx as u8 * SECTION_WIDTH + 1;
    (start..start + SECTION_WIDTH).collect()
}

/// max(1, round(poids × 5)) : la somme des quotas peut dépasser ou manquer 5.
pub fn section_quota(weight: f64) -> usize {
    let quota = (weight * Domain::Main.pick_count() as f64).round();
    (quota.max(0.0) as usize).max(1)
}

pub fn selected_sections(weights: &[f64; SECTION_COUNT], threshold: f64) -> Vec<usize> {
    (0..SECTION_COUNT).filter(|&i| weights[i] >= threshold).collect()
}

fn cold_pool(ctx: &PickContext, step: HermesPoolStep, excluded: &BTreeSet<u8>) -> Vec<u8> {
    let cfg = &ctx.config.hermes;
    let weights = cfg.weights_for_month(ctx.today.month());
    let sections: Vec<u8> = selected_sections(&weights, cfg.section_threshold)
        .into_iter()
        .flat_map(section)
        .collect();
    let cold = &ctx.main.cold;

    match step {
        HermesPoolStep::CalendarFiltered => sections
            .into_iter()
            .filter(|n| cold.contains(n) && !excluded.contains(n))
            .collect(),
        HermesPoolStep::SectionUnfiltered => {
            sections.into_iter().filter(|n| cold.contains(n)).collect()
        }
        HermesPoolStep::ColdTier => cold.clone(),
        HermesPoolStep::FullDomain => Domain::Main.numbers(),
    }
}

fn hybrid_pool<R: Rng + ?Sized>(
    ctx: &PickContext,
    step: HermesPoolStep,
    excluded: &BTreeSet<u8>,
    rng: &mut R,
) -> Vec<u8> {
    let weights = ctx.config.hermes.weights_for_month(ctx.today.month());
    let filter = match step {
        HermesPoolStep::CalendarFiltered => true,
        HermesPoolStep::SectionUnfiltered => false,
        HermesPoolStep::ColdTier => return ctx.main.cold.clone(),
        HermesPoolStep::FullDomain => return Domain::Main.numbers(),
    };

    let mut pool = Vec::new();
    for (i, &w) in weights.iter().enumerate() {
        let candidates: Vec<u8> = section(i)
            .into_iter()
            .filter(|n| !filter || !excluded.contains(n))
            .collect();
        let quota = section_quota(w).min(candidates.len());
        if let Some(chosen) = sample_without_replacement(&candidates, quota, rng) {
            pool.extend(chosen);
        }
    }
    pool
}

/// Parcourt la chaîne de repli et tire 5 numéros dans le premier pool assez grand.
pub fn hermes_main<R: Rng + ?Sized>(
    ctx: &PickContext,
    variant: HermesVariant,
    rng: &mut R,
) -> Option<Vec<u8>> {
    let needed = Domain::Main.pick_count();
    let excluded = exclusion_set(ctx.today, Domain::Main);

    for &step in &ctx.config.hermes.fallback {
        let pool = match variant {
            HermesVariant::Cold => cold_pool(ctx, step, &excluded),
            HermesVariant::Hybrid => hybrid_pool(ctx, step, &excluded, rng),
        };
        if pool.len() >= needed {
            tracing::trace!(?variant, ?step, size = pool.len(), "pool Hermes retenu");
            return sample_without_replacement(&pool, needed, rng);
        }
        tracing::trace!(?variant, ?step, size = pool.len(), "pool Hermes trop petit");
    }
    None
}

/// Numéros Euro hors valeurs calendaires ; tout le domaine s'il en reste moins de 2.
pub fn hermes_euro<R: Rng + ?Sized>(ctx: &PickContext, rng: &mut R) -> Vec<u8> {
    let excluded = exclusion_set(ctx.today, Domain::Euro);
    let pool = filter_or_keep(&Domain::Euro.numbers(), &excluded, Domain::Euro.pick_count());
    sample_without_replacement(&pool, Domain::Euro.pick_count(), rng)
        .unwrap_or_else(|| uniform_numbers(Domain::Euro, rng))
}

pub fn hermes_candidate<R: Rng + ?Sized>(
    ctx: &PickContext,
    variant: HermesVariant,
    rng: &mut R,
) -> Option<Pick> {
    let main = hermes_main(ctx, variant, rng)?;
    let euro = hermes_euro(ctx, rng);
    Pick::new(&main, &euro).ok()
}

pub fn accept_jackpot(ctx: &PickContext, pick: &Pick) -> bool {
    !ctx.jackpot_bias || ctx.config.hermes.jackpot_sum.contains(pick.main_sum())
}

/// Repli : 5 numéros froids si possible, sinon tout le domaine.
pub fn hermes_fallback<R: Rng + ?Sized>(ctx: &PickContext, rng: &mut R) -> Pick {
    let main = sample_without_replacement(&ctx.main.cold, Domain::Main.pick_count(), rng)
        .unwrap_or_else(|| uniform_numbers(Domain::Main, rng));
    let euro = hermes_euro(ctx, rng);
    Pick::new(&main, &euro).unwrap_or_else(|_| crate::sampler::uniform_pick(rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GeneratorConfig, HermesConfig};
    use crate::heat::HeatMethod;
    use chrono::NaiveDate;
    use mastermind_db::history::{DrawHistory, make_test_history};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn april_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 15).unwrap()
    }

    #[test]
    fn test_sections() {
        assert_eq!(section(0), (1..=10).collect::<Vec<u8>>());
        assert_eq!(section(4), (41..=50).collect::<Vec<u8>>());
    }

    #[test]
    fn test_section_quota() {
        assert_eq!(section_quota(0.0), 1);
        assert_eq!(section_quota(0.1), 1);
        assert_eq!(section_quota(0.2), 1);
        assert_eq!(section_quota(0.4), 2);
        assert_eq!(section_quota(1.0), 5);
    }

    #[test]
    fn test_selected_sections() {
        let hermes = HermesConfig::default();
        assert_eq!(selected_sections(&hermes.weights_for_month(4), 0.2), vec![1, 2, 4]);
        assert_eq!(selected_sections(&hermes.weights_for_month(1), 0.2), vec![1, 2, 4]);
        assert_eq!(selected_sections(&[0.1; 5], 0.2), Vec::<usize>::new());
    }

    #[test]
    fn test_hybrid_pool_oversized_in_april() {
        let config = GeneratorConfig::default();
        let ctx = PickContext::build(&make_test_history(30), &config, HeatMethod::Percentile, april_15());
        let excluded = exclusion_set(ctx.today, Domain::Main);
        let mut rng = StdRng::seed_from_u64(3);
        let pool = hybrid_pool(&ctx, HermesPoolStep::CalendarFiltered, &excluded, &mut rng);
        // avril : 1 + 2 + 1 + 1 + 2
        assert_eq!(pool.len(), 7);
        assert!(pool.iter().all(|n| !excluded.contains(n)));
    }

    /// Groupe froid à cheval sur les sections basses : 15 y figure.
    fn spread_cold(ctx: &mut PickContext) {
        ctx.main.cold = (11..=30).chain(41..=45).collect();
    }

    #[test]
    fn test_hermes_excludes_calendar_values() {
        let config = GeneratorConfig::default();
        let mut ctx = PickContext::build(&make_test_history(30), &config, HeatMethod::Percentile, april_15());
        spread_cold(&mut ctx);
        let excluded = exclusion_set(ctx.today, Domain::Main);
        assert!(cold_pool(&ctx, HermesPoolStep::SectionUnfiltered, &excluded).contains(&15));

        for variant in [HermesVariant::Cold, HermesVariant::Hybrid] {
            for seed in 0..200 {
                let mut rng = StdRng::seed_from_u64(seed);
                let pick = hermes_candidate(&ctx, variant, &mut rng).unwrap();
                for v in [15, 4, 1] {
                    assert!(!pick.main.contains(&v), "{:?} contient {}", pick, v);
                }
                assert!(!pick.euro.contains(&4) && !pick.euro.contains(&1), "{:?}", pick);
                if variant == HermesVariant::Cold {
                    assert!(pick.main.iter().all(|n| ctx.main.cold.contains(n)), "{:?}", pick);
                }
            }
        }
    }

    #[test]
    fn test_cold_variant_keeps_15_on_other_dates() {
        // 16 avril : exclusions {16, 4, 2}, 15 redevient disponible
        let config = GeneratorConfig::default();
        let april_16 = NaiveDate::from_ymd_opt(2024, 4, 16).unwrap();
        let mut ctx = PickContext::build(&make_test_history(30), &config, HeatMethod::Percentile, april_16);
        spread_cold(&mut ctx);

        let seen_15 = (0..200).any(|seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let pick = hermes_candidate(&ctx, HermesVariant::Cold, &mut rng).unwrap();
            assert!(!pick.main.contains(&16), "{:?}", pick);
            pick.main.contains(&15)
        });
        assert!(seen_15);
    }

    #[test]
    fn test_cold_variant_empty_history_uses_cold_sections() {
        // historique vide : tout est froid, ordre croissant -> groupe froid = 36..50
        let config = GeneratorConfig::default();
        let ctx = PickContext::build(&DrawHistory::new(), &config, HeatMethod::Percentile, april_15());
        let mut rng = StdRng::seed_from_u64(1);
        let main = hermes_main(&ctx, HermesVariant::Cold, &mut rng).unwrap();
        assert!(main.iter().all(|n| (41..=50).contains(n)), "{:?}", main);
    }

    #[test]
    fn test_fallback_chain_order_is_configurable() {
        let mut config = GeneratorConfig::default();
        config.hermes.fallback = vec![HermesPoolStep::ColdTier];
        let history = make_test_history(30);
        let ctx = PickContext::build(&history, &config, HeatMethod::Percentile, april_15());
        let mut rng = StdRng::seed_from_u64(9);
        let main = hermes_main(&ctx, HermesVariant::Hybrid, &mut rng).unwrap();
        assert!(main.iter().all(|n| ctx.main.cold.contains(n)));

        config.hermes.fallback = vec![];
        let ctx = PickContext::build(&history, &config, HeatMethod::Percentile, april_15());
        assert!(hermes_main(&ctx, HermesVariant::Hybrid, &mut rng).is_none());
    }

    #[test]
    fn test_accept_jackpot() {
        let config = GeneratorConfig::default();
        let ctx = PickContext::build(&DrawHistory::new(), &config, HeatMethod::Percentile, april_15());
        let low = Pick::new(&[1, 2, 3, 4, 5], &[1, 2]).unwrap();
        let mid = Pick::new(&[10, 20, 30, 31, 40], &[1, 2]).unwrap();
        assert!(accept_jackpot(&ctx, &low));
        let ctx = ctx.with_jackpot_bias(true);
        assert!(!accept_jackpot(&ctx, &low));
        assert!(accept_jackpot(&ctx, &mid));
    }

    #[test]
    fn test_hermes_fallback_shape() {
        let config = GeneratorConfig::default();
        let mut ctx = PickContext::build(&DrawHistory::new(), &config, HeatMethod::Percentile, april_15());
        ctx.main.cold.clear();
        let mut rng = StdRng::seed_from_u64(5);
        let pick = hermes_fallback(&ctx, &mut rng);
        assert!(Pick::new(&pick.main, &pick.euro).is_ok());
    }
}
