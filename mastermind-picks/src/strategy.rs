use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};
use serde::Serialize;

use mastermind_db::models::{Domain, Pick};

use crate::calendar::{filter_or_keep, stealth_avoid_set};
use crate::context::PickContext;
use crate::hermes::{HermesVariant, accept_jackpot, hermes_candidate, hermes_fallback};
use crate::popularity::is_popular;
use crate::sampler::{Generated, sample_until, sample_without_replacement, uniform_numbers, uniform_pick, without};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    HotOnly,
    WarmOnly,
    ColdOnly,
    Balanced,
    SmallWin,
    MinimumPrize,
    PrizeLadder,
    Hermes,
    HermesHybrid,
    SmartHot,
    BirthdayFree,
    CalendarAware,
}

/// Budget d'essais de l'échantillonnage par rejet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    Primary,
    Calendar,
}

type Candidate = fn(&PickContext, &mut dyn RngCore) -> Option<Pick>;
type Accept = fn(&PickContext, &Pick) -> bool;
type Fallback = fn(&PickContext, &mut dyn RngCore) -> Pick;

/// Entrée du registre : comment construire une grille candidate, quand l'accepter,
/// et que renvoyer une fois le budget épuisé.
#[derive(Clone, Copy)]
pub struct StrategySpec {
    pub name: &'static str,
    pub budget: Budget,
    pub candidate: Candidate,
    pub accept: Accept,
    pub fallback: Fallback,
}

impl Strategy {
    pub const ALL: [Strategy; 12] = [
        Strategy::HotOnly,
        Strategy::WarmOnly,
        Strategy::ColdOnly,
        Strategy::Balanced,
        Strategy::SmallWin,
        Strategy::MinimumPrize,
        Strategy::PrizeLadder,
        Strategy::Hermes,
        Strategy::HermesHybrid,
        Strategy::SmartHot,
        Strategy::BirthdayFree,
        Strategy::CalendarAware,
    ];

    pub fn spec(self) -> StrategySpec {
        let primary = |name: &'static str, candidate: Candidate| StrategySpec {
            name,
            budget: Budget::Primary,
            candidate,
            accept: accept_any,
            fallback: uniform_fallback,
        };
        match self {
            Strategy::HotOnly => primary("Chauds", hot_only),
            Strategy::WarmOnly => primary("Tièdes", warm_only),
            Strategy::ColdOnly => primary("Froids", cold_only),
            Strategy::Balanced => primary("Équilibré", balanced),
            Strategy::SmallWin => primary("Petit gain", small_win),
            Strategy::MinimumPrize => primary("Gain minimum garanti", minimum_prize),
            Strategy::SmartHot => primary("Chauds malins", smart_hot),
            Strategy::BirthdayFree => primary("Furtif sans anniversaires", birthday_free),
            Strategy::PrizeLadder => StrategySpec {
                accept: accept_ladder,
                ..primary("Échelle de gains", prize_ladder)
            },
            Strategy::Hermes => StrategySpec {
                name: "Hermes",
                budget: Budget::Calendar,
                candidate: hermes_cold,
                accept: accept_hermes,
                fallback: fallback_hermes,
            },
            Strategy::HermesHybrid => StrategySpec {
                name: "Hermes hybride",
                budget: Budget::Calendar,
                candidate: hermes_hybrid,
                accept: accept_hermes,
                fallback: fallback_hermes,
            },
            Strategy::CalendarAware => StrategySpec {
                budget: Budget::Calendar,
                ..primary("Furtif calendaire", calendar_aware)
            },
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Génère une grille avec la stratégie donnée. Si `avoid_popular` est actif,
/// les grilles populaires sont aussi rejetées. N'échoue jamais.
pub fn generate<R: RngCore>(ctx: &PickContext, strategy: Strategy, rng: &mut R) -> Generated {
    let spec = strategy.spec();
    let max_attempts = match spec.budget {
        Budget::Primary => ctx.config.primary_attempts,
        Budget::Calendar => ctx.config.calendar_attempts,
    };
    let rng: &mut dyn RngCore = rng;

    let result = sample_until(
        rng,
        max_attempts,
        |r| (spec.candidate)(ctx, r),
        |pick| (spec.accept)(ctx, pick) && !(ctx.avoid_popular && is_popular(&pick.main)),
        |r| (spec.fallback)(ctx, r),
    );

    if let Some(reason) = result.fallback {
        tracing::debug!(
            strategy = spec.name,
            attempts = result.attempts,
            %reason,
            "grille de repli"
        );
    }
    result
}

pub fn generate_many<R: RngCore>(
    ctx: &PickContext,
    strategy: Strategy,
    count: usize,
    rng: &mut R,
) -> Vec<Generated> {
    (0..count).map(|_| generate(ctx, strategy, rng)).collect()
}

fn accept_any(_: &PickContext, _: &Pick) -> bool {
    true
}

fn accept_ladder(ctx: &PickContext, pick: &Pick) -> bool {
    let ladder = &ctx.config.ladder;
    ladder.sum.contains(pick.main_sum()) && ladder.even_count.contains(pick.even_count() as u32)
}

fn accept_hermes(ctx: &PickContext, pick: &Pick) -> bool {
    accept_jackpot(ctx, pick)
}

fn uniform_fallback(_: &PickContext, rng: &mut dyn RngCore) -> Pick {
    uniform_pick(rng)
}

fn fallback_hermes(ctx: &PickContext, rng: &mut dyn RngCore) -> Pick {
    hermes_fallback(ctx, rng)
}

/// Deux numéros Euro du pool, ou du domaine entier si le pool est trop petit.
fn euro_from<R: Rng + ?Sized>(pool: &[u8], rng: &mut R) -> Vec<u8> {
    sample_without_replacement(pool, Domain::Euro.pick_count(), rng)
        .unwrap_or_else(|| uniform_numbers(Domain::Euro, rng))
}

fn single_tier(main_pool: &[u8], euro_pool: &[u8], rng: &mut dyn RngCore) -> Option<Pick> {
    let main = sample_without_replacement(main_pool, Domain::Main.pick_count(), rng)?;
    let euro = euro_from(euro_pool, rng);
    Pick::new(&main, &euro).ok()
}

fn hot_only(ctx: &PickContext, rng: &mut dyn RngCore) -> Option<Pick> {
    single_tier(&ctx.main.hot, &ctx.euro.hot, rng)
}

fn warm_only(ctx: &PickContext, rng: &mut dyn RngCore) -> Option<Pick> {
    single_tier(&ctx.main.warm, &ctx.euro.warm, rng)
}

fn cold_only(ctx: &PickContext, rng: &mut dyn RngCore) -> Option<Pick> {
    single_tier(&ctx.main.cold, &ctx.euro.cold, rng)
}

fn balanced(ctx: &PickContext, rng: &mut dyn RngCore) -> Option<Pick> {
    let mut main = sample_without_replacement(&ctx.main.hot, 2, rng)?;
    main.extend(sample_without_replacement(&ctx.main.warm, 2, rng)?);
    main.extend(sample_without_replacement(&ctx.main.cold, 1, rng)?);

    let euro = match (
        sample_without_replacement(&ctx.euro.hot, 1, rng),
        sample_without_replacement(&ctx.euro.warm, 1, rng),
    ) {
        (Some(h), Some(w)) => [h, w].concat(),
        _ => uniform_numbers(Domain::Euro, rng),
    };
    Pick::new(&main, &euro).ok()
}

/// `first` numéros dans `narrow`, le reste dans `wide` privé des numéros déjà pris.
fn split_sample(
    narrow: &[u8],
    wide: &[u8],
    first: usize,
    total: usize,
    rng: &mut dyn RngCore,
) -> Option<Vec<u8>> {
    let mut chosen = sample_without_replacement(narrow, first, rng)?;
    let rest = without(wide, &chosen);
    chosen.extend(sample_without_replacement(&rest, total - first, rng)?);
    Some(chosen)
}

fn small_win(ctx: &PickContext, rng: &mut dyn RngCore) -> Option<Pick> {
    let main = split_sample(&ctx.main.hot_warm(), &ctx.main.all(), 3, 5, rng)?;
    let euro = split_sample(&ctx.euro.hot_warm(), &ctx.euro.all(), 1, 2, rng)
        .unwrap_or_else(|| uniform_numbers(Domain::Euro, rng));
    Pick::new(&main, &euro).ok()
}

fn minimum_prize(ctx: &PickContext, rng: &mut dyn RngCore) -> Option<Pick> {
    single_tier(&ctx.main.hot_warm(), &ctx.euro.hot_warm(), rng)
}

fn smart_hot(ctx: &PickContext, rng: &mut dyn RngCore) -> Option<Pick> {
    let main = sample_without_replacement(&ctx.main.hot_warm(), Domain::Main.pick_count(), rng)?;
    let euro = uniform_numbers(Domain::Euro, rng);
    Pick::new(&main, &euro).ok()
}

fn prize_ladder(ctx: &PickContext, rng: &mut dyn RngCore) -> Option<Pick> {
    let ladder = &ctx.config.ladder;
    let repeat_pool: Vec<u8> = ctx.latest_main.map(|m| m.to_vec()).unwrap_or_default();

    let repeat_count = ladder.repeat_counts.choose(rng).copied().unwrap_or(0);
    let repeat_part = sample_without_replacement(&repeat_pool, repeat_count, rng)
        .unwrap_or_else(|| repeat_pool.clone());

    let needed = Domain::Main.pick_count().checked_sub(repeat_part.len())?;
    let remaining = without(&Domain::Main.numbers(), &repeat_part);
    let mut main = repeat_part;
    main.extend(sample_without_replacement(&remaining, needed, rng)?);

    let euro = uniform_numbers(Domain::Euro, rng);
    Pick::new(&main, &euro).ok()
}

fn hermes_cold(ctx: &PickContext, rng: &mut dyn RngCore) -> Option<Pick> {
    hermes_candidate(ctx, HermesVariant::Cold, rng)
}

fn hermes_hybrid(ctx: &PickContext, rng: &mut dyn RngCore) -> Option<Pick> {
    hermes_candidate(ctx, HermesVariant::Hybrid, rng)
}

fn rare_pool(ctx: &PickContext) -> Vec<u8> {
    ctx.main_frequency.tail(ctx.config.stealth.tail)
}

fn birthday_free(ctx: &PickContext, rng: &mut dyn RngCore) -> Option<Pick> {
    let stealth = &ctx.config.stealth;
    let rare = rare_pool(ctx);
    let high: Vec<u8> = rare.iter().copied().filter(|&n| n > stealth.birthday_cutoff).collect();
    let pool = if high.len() < Domain::Main.pick_count() { rare } else { high };
    let main = sample_without_replacement(&pool, Domain::Main.pick_count(), rng)?;

    let euro_pool: Vec<u8> = (stealth.euro_floor.max(1)..=Domain::Euro.max()).collect();
    let euro = euro_from(&euro_pool, rng);
    Pick::new(&main, &euro).ok()
}

fn calendar_aware(ctx: &PickContext, rng: &mut dyn RngCore) -> Option<Pick> {
    let main_pool = filter_or_keep(
        &rare_pool(ctx),
        &stealth_avoid_set(ctx.today, Domain::Main),
        Domain::Main.pick_count(),
    );
    let main = sample_without_replacement(&main_pool, Domain::Main.pick_count(), rng)?;

    let euro_pool = filter_or_keep(
        &Domain::Euro.numbers(),
        &stealth_avoid_set(ctx.today, Domain::Euro),
        Domain::Euro.pick_count(),
    );
    let euro = euro_from(&euro_pool, rng);
    Pick::new(&main, &euro).ok()
}
