mod display;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use mastermind_db::db::{
    count_draws, db_path, fetch_history, fetch_last_draws, insert_draw, migrate, open_db,
};
use mastermind_db::models::{Domain, Draw, Pick, validate_numbers};
use mastermind_db::rusqlite::Connection;
use mastermind_picks::combo::generate_combo;
use mastermind_picks::config::{GeneratorConfig, load_config, save_config};
use mastermind_picks::context::PickContext;
use mastermind_picks::heat::{HeatMethod, classify};
use mastermind_picks::popularity::popular_pattern;
use mastermind_picks::sampler::{Generated, seeded_rng};
use mastermind_picks::strategy::{Strategy, generate_many};

use crate::display::{
    display_check, display_combo, display_draws, display_frequency, display_generated,
    display_popularity,
};

#[derive(Parser)]
#[command(name = "mastermind", about = "Générateur de grilles Eurojackpot")]
struct Cli {
    /// Journalisation détaillée (équivaut à RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Options communes à la génération de grilles.
#[derive(Args)]
struct GenerationArgs {
    /// Seed pour la reproductibilité
    #[arg(long)]
    seed: Option<u64>,

    /// Date de référence pour les exclusions calendaires (AAAA-MM-JJ, défaut : aujourd'hui)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Méthode de classement chaud / tiède / froid
    #[arg(long, default_value = "percentile")]
    heat: HeatMethod,

    /// Rejeter les grilles populaires (anniversaires, suites, même finale)
    #[arg(long)]
    avoid_popular: bool,

    /// Restreindre les grilles Hermes à la fourchette de somme "jackpot"
    #[arg(long)]
    jackpot_bias: bool,

    /// Fichier de configuration JSON
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Afficher le chemin de la base de données
    DbPath,

    /// Ajouter un tirage
    Add {
        /// Date du tirage (AAAA-MM-JJ)
        #[arg(short, long)]
        date: NaiveDate,

        /// Les 5 numéros (1-50)
        #[arg(short, long, num_args = 5, required = true)]
        main: Vec<u8>,

        /// Les 2 numéros Euro (1-12)
        #[arg(short, long, num_args = 2, required = true)]
        euro: Vec<u8>,
    },

    /// Lister les derniers tirages
    History {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Afficher les fréquences et les groupes chaud / tiède / froid
    Stats {
        /// Méthode de classement
        #[arg(long, default_value = "percentile")]
        heat: HeatMethod,

        /// Fichier de configuration JSON
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Générer des grilles avec une stratégie
    Generate {
        /// Stratégie de génération
        #[arg(short, long, default_value = "balanced")]
        strategy: Strategy,

        /// Nombre de grilles
        #[arg(short, long, default_value = "5")]
        count: usize,

        /// Sortie JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        options: GenerationArgs,
    },

    /// Générer des sessions "meilleur combo" (Hermes hybride + Échelle de gains)
    Combo {
        /// Nombre de sessions
        #[arg(short, long, default_value = "1")]
        sessions: usize,

        #[command(flatten)]
        options: GenerationArgs,
    },

    /// Comparer une grille à un tirage enregistré
    Check {
        /// Date du tirage (défaut : le plus récent)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        #[arg(short, long, num_args = 5, required = true)]
        main: Vec<u8>,

        #[arg(short, long, num_args = 2, required = true)]
        euro: Vec<u8>,
    },

    /// Détecter si 5 numéros forment une grille populaire
    Popular {
        #[arg(num_args = 5, required = true)]
        numbers: Vec<u8>,
    },

    /// Écrire la configuration par défaut dans un fichier JSON
    InitConfig {
        #[arg(short, long, default_value = "mastermind.json")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;
    tracing::debug!(path = %path.display(), "base ouverte");

    match cli.command {
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::Add { date, main, euro } => cmd_add(&conn, date, &main, &euro),
        Command::History { last } => cmd_history(&conn, last),
        Command::Stats { heat, config } => cmd_stats(&conn, heat, config.as_deref()),
        Command::Generate {
            strategy,
            count,
            json,
            options,
        } => cmd_generate(&conn, strategy, count, json, &options),
        Command::Combo { sessions, options } => cmd_combo(&conn, sessions, &options),
        Command::Check { date, main, euro } => cmd_check(&conn, date, &main, &euro),
        Command::Popular { numbers } => cmd_popular(&numbers),
        Command::InitConfig { output } => cmd_init_config(&output),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    match path {
        Some(p) => load_config(p),
        None => Ok(GeneratorConfig::default()),
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn cmd_add(conn: &Connection, date: NaiveDate, main: &[u8], euro: &[u8]) -> Result<()> {
    let draw = Draw::new(date, main, euro).context("Tirage invalide")?;
    if insert_draw(conn, &draw)? {
        println!("✅ Tirage du {} ajouté : {:?} + {:?}", draw.date, draw.main, draw.euro);
    } else {
        println!("Tirage déjà présent en base, ignoré.");
    }
    Ok(())
}

fn cmd_history(conn: &Connection, last: u32) -> Result<()> {
    if count_draws(conn)? == 0 {
        println!("Base vide. Ajoutez d'abord un tirage : mastermind add");
        return Ok(());
    }
    let draws = fetch_last_draws(conn, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_stats(conn: &Connection, heat: HeatMethod, config: Option<&Path>) -> Result<()> {
    let config = resolve_config(config)?;
    let history = fetch_history(conn)?;
    if history.is_empty() {
        println!("Base vide. Ajoutez d'abord un tirage : mastermind add");
        return Ok(());
    }

    println!("📊 Analyse de {} tirage(s)", history.len());
    let ctx = PickContext::build(&history, &config, heat, today());
    display_frequency(&ctx.main_frequency, &ctx.main);
    display_frequency(&ctx.euro_frequency, &ctx.euro);

    // l'autre méthode, pour comparaison
    let other = match heat {
        HeatMethod::Percentile => HeatMethod::Recency,
        HeatMethod::Recency => HeatMethod::Percentile,
    };
    let alt = classify(&ctx.main_frequency, &config.heat_scheme(other));
    println!("\n({other:?}) Chauds : {:?}", alt.hot);
    Ok(())
}

#[derive(Serialize)]
struct PickOutput<'a> {
    strategy: Strategy,
    #[serde(flatten)]
    generated: &'a Generated,
}

fn cmd_generate(
    conn: &Connection,
    strategy: Strategy,
    count: usize,
    json: bool,
    options: &GenerationArgs,
) -> Result<()> {
    if count == 0 {
        bail!("Le nombre de grilles doit être au moins 1");
    }
    let config = resolve_config(options.config.as_deref())?;
    let history = fetch_history(conn)?;
    if history.is_empty() && !json {
        println!("Base vide : toutes les fréquences sont nulles.");
    }

    let ctx = PickContext::build(&history, &config, options.heat, options.date.unwrap_or_else(today))
        .with_jackpot_bias(options.jackpot_bias)
        .with_avoid_popular(options.avoid_popular);
    let mut rng = seeded_rng(options.seed);
    let picks = generate_many(&ctx, strategy, count, &mut rng);

    if json {
        let out: Vec<PickOutput> = picks
            .iter()
            .map(|generated| PickOutput { strategy, generated })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        display_generated(strategy, &picks);
    }
    Ok(())
}

fn cmd_combo(conn: &Connection, sessions: usize, options: &GenerationArgs) -> Result<()> {
    if sessions == 0 {
        bail!("Le nombre de sessions doit être au moins 1");
    }
    let config = resolve_config(options.config.as_deref())?;
    let history = fetch_history(conn)?;
    if history.is_empty() {
        println!("Base vide : toutes les fréquences sont nulles.");
    }

    let ctx = PickContext::build(&history, &config, options.heat, options.date.unwrap_or_else(today))
        .with_jackpot_bias(options.jackpot_bias)
        .with_avoid_popular(options.avoid_popular);
    let mut rng = seeded_rng(options.seed);
    let result = generate_combo(&ctx, &config.combo, sessions, &mut rng);
    display_combo(&result);
    Ok(())
}

fn cmd_check(conn: &Connection, date: Option<NaiveDate>, main: &[u8], euro: &[u8]) -> Result<()> {
    let pick = Pick::new(main, euro).context("Grille invalide")?;
    let history = fetch_history(conn)?;

    let draw = match date {
        Some(d) => history
            .find_by_date(d)
            .with_context(|| format!("Aucun tirage en base pour le {d}"))?,
        None => match history.latest() {
            Some(draw) => draw,
            None => bail!("Base vide. Ajoutez d'abord un tirage : mastermind add"),
        },
    };

    display_check(&pick, draw, pick.matches(draw));
    Ok(())
}

fn cmd_popular(numbers: &[u8]) -> Result<()> {
    validate_numbers(Domain::Main, numbers)?;
    let mut main: [u8; 5] = numbers
        .try_into()
        .context("Il faut exactement 5 numéros")?;
    main.sort_unstable();
    display_popularity(&main, popular_pattern(&main));
    Ok(())
}

fn cmd_init_config(output: &Path) -> Result<()> {
    if output.exists() {
        bail!("{} existe déjà", output.display());
    }
    save_config(&GeneratorConfig::default(), output)?;
    println!("Configuration par défaut écrite dans {}", output.display());
    Ok(())
}
