use rand::RngCore;

use crate::config::ComboConfig;
use crate::context::PickContext;
use crate::sampler::Generated;
use crate::strategy::{Strategy, generate};

/// Une session "meilleur combo" : des grilles Hermes hybride puis des grilles Échelle de gains.
#[derive(Debug, Clone, PartialEq)]
pub struct ComboSession {
    pub picks: Vec<(Strategy, Generated)>,
}

pub fn generate_combo<R: RngCore>(
    ctx: &PickContext,
    plan: &ComboConfig,
    sessions: usize,
    rng: &mut R,
) -> Vec<ComboSession> {
    (0..sessions)
        .map(|_| {
            let hermes = std::iter::repeat_n(Strategy::HermesHybrid, plan.hermes);
            let ladder = std::iter::repeat_n(Strategy::PrizeLadder, plan.ladder);
            let picks = hermes
                .chain(ladder)
                .map(|strategy| (strategy, generate(ctx, strategy, rng)))
                .collect();
            ComboSession { picks }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::heat::HeatMethod;
    use chrono::NaiveDate;
    use mastermind_db::history::make_test_history;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_default_plan_one_hermes_four_ladder() {
        let config = GeneratorConfig::default();
        let today = NaiveDate::from_ymd_opt(2024, 4, 15).unwrap();
        let ctx = PickContext::build(&make_test_history(30), &config, HeatMethod::Percentile, today);
        let mut rng = StdRng::seed_from_u64(42);

        let sessions = generate_combo(&ctx, &config.combo, 3, &mut rng);
        assert_eq!(sessions.len(), 3);
        for session in &sessions {
            let strategies: Vec<Strategy> = session.picks.iter().map(|(s, _)| *s).collect();
            assert_eq!(
                strategies,
                vec![
                    Strategy::HermesHybrid,
                    Strategy::PrizeLadder,
                    Strategy::PrizeLadder,
                    Strategy::PrizeLadder,
                    Strategy::PrizeLadder,
                ]
            );
        }
    }

    #[test]
    fn test_custom_plan() {
        let config = GeneratorConfig::default();
        let today = NaiveDate::from_ymd_opt(2024, 4, 15).unwrap();
        let ctx = PickContext::build(&make_test_history(30), &config, HeatMethod::Percentile, today);
        let mut rng = StdRng::seed_from_u64(1);

        let plan = ComboConfig { hermes: 2, ladder: 3 };
        let sessions = generate_combo(&ctx, &plan, 1, &mut rng);
        let hermes = sessions[0].picks.iter().filter(|(s, _)| *s == Strategy::HermesHybrid).count();
        assert_eq!(hermes, 2);
        assert_eq!(sessions[0].picks.len(), 5);
    }
}
