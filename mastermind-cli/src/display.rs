use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};

use mastermind_db::models::{Draw, MatchCount, Pick};
use mastermind_picks::combo::ComboSession;
use mastermind_picks::frequency::FrequencyTable;
use mastermind_picks::heat::HeatTiers;
use mastermind_picks::popularity::PopularPattern;
use mastermind_picks::sampler::Generated;
use mastermind_picks::strategy::Strategy;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn join_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = new_table(vec!["Date", "Numéros", "Euro"]);
    for draw in draws {
        table.add_row(vec![
            draw.date.to_string(),
            join_numbers(&draw.main),
            join_numbers(&draw.euro),
        ]);
    }
    println!("{table}");
}

fn tier_of(number: u8, tiers: &HeatTiers) -> (&'static str, Color) {
    if tiers.hot.contains(&number) {
        ("CHAUD", Color::Red)
    } else if tiers.warm.contains(&number) {
        ("TIÈDE", Color::Yellow)
    } else if tiers.cold.contains(&number) {
        ("FROID", Color::Cyan)
    } else {
        ("-", Color::White)
    }
}

pub fn display_frequency(table: &FrequencyTable, tiers: &HeatTiers) {
    println!("\n── {} (1-{}) ──", table.domain, table.domain.max());
    let mut out = new_table(vec!["Numéro", "Fréquence", "Dernière sortie", "Groupe"]);

    for entry in table.entries() {
        let (label, color) = tier_of(entry.number, tiers);
        let seen = entry
            .last_seen
            .map(|i| format!("il y a {} tirage(s)", i))
            .unwrap_or_else(|| "jamais".to_string());
        out.add_row(vec![
            Cell::new(format!("{:2}", entry.number)),
            Cell::new(entry.count),
            Cell::new(seen),
            Cell::new(label).fg(color),
        ]);
    }
    println!("{out}");

    println!("🔥 Chauds : {:?}", tiers.hot);
    println!("🟡 Tièdes : {:?}", tiers.warm);
    println!("❄️  Froids : {:?}", tiers.cold);
}

fn fallback_cell(generated: &Generated) -> Cell {
    match generated.fallback {
        Some(reason) => Cell::new(format!("repli ({reason})")).fg(Color::Yellow),
        None => Cell::new(format!("{} essai(s)", generated.attempts)),
    }
}

pub fn display_generated(strategy: Strategy, picks: &[Generated]) {
    println!("\n🎯 Grilles — {strategy}\n");

    let mut table = new_table(vec!["#", "Numéros", "Euro", "Somme", "Pairs", "Génération"]);
    for (i, g) in picks.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(join_numbers(&g.pick.main)),
            Cell::new(join_numbers(&g.pick.euro)),
            Cell::new(g.pick.main_sum()),
            Cell::new(g.pick.even_count()),
            fallback_cell(g),
        ]);
    }
    println!("{table}");
}

pub fn display_combo(sessions: &[ComboSession]) {
    for (i, session) in sessions.iter().enumerate() {
        println!("\n🎟️  Session {}", i + 1);
        let mut table = new_table(vec!["Stratégie", "Numéros", "Euro", "Somme", "Génération"]);
        for (strategy, g) in &session.picks {
            table.add_row(vec![
                Cell::new(strategy),
                Cell::new(join_numbers(&g.pick.main)),
                Cell::new(join_numbers(&g.pick.euro)),
                Cell::new(g.pick.main_sum()),
                fallback_cell(g),
            ]);
        }
        println!("{table}");
    }
}

pub fn display_check(pick: &Pick, draw: &Draw, hits: MatchCount) {
    println!("🎯 Résultat : {} numéro(s) + {} Euro → `{}`", hits.main, hits.euro, hits);
    println!("  Votre grille : {}", pick);
    println!("  Tirage du {} : {:?} + {:?}", draw.date, draw.main, draw.euro);
}

pub fn display_popularity(main: &[u8; 5], pattern: Option<PopularPattern>) {
    match pattern {
        Some(p) => println!("{:?} : grille populaire, motif {}", main, p),
        None => println!("{:?} : aucun motif populaire détecté", main),
    }
}
