mod interactive;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use lotto645_draws::fetch::DrawFetcher;
use lotto645_draws::source::HttpDrawSource;

use lotto645_cli::analysis::cache::AnalysisCache;
use lotto645_cli::analysis::compute_stats;
use lotto645_cli::analysis::weights::build_weights;
use lotto645_cli::config::{AppConfig, GenerationConfig, load_config, save_config};
use lotto645_cli::display::{display_draws, display_stats, display_status, display_tickets};
use lotto645_cli::session::Session;

#[derive(Parser)]
#[command(name = "lotto645", about = "Générateur de grilles Lotto 6/45 pondérées par l'historique")]
struct Cli {
    /// Fichier de configuration JSON
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// URL de l'API des tirages
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Délai maximal d'une requête, en secondes
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Générer des grilles
    Generate {
        /// Nombre de grilles
        #[arg(short, long, default_value = "5")]
        sets: usize,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        options: GenerationArgs,
    },

    /// Lister les derniers tirages
    Draws {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: usize,
    },

    /// Fréquences et poids sur les derniers tirages
    Stats {
        /// Fenêtre d'analyse (défaut : celle de la configuration)
        #[arg(short, long)]
        window: Option<u32>,
    },

    /// Mode interactif (générer, mélanger, effacer l'historique...)
    Interactive {
        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        options: GenerationArgs,
    },

    /// Afficher ou sauvegarder la configuration effective
    Config {
        /// Fichier de sortie
        #[arg(long)]
        save: Option<PathBuf>,

        #[command(flatten)]
        options: GenerationArgs,
    },
}

#[derive(Args, Debug, Default)]
struct GenerationArgs {
    /// Tirage uniforme, sans analyse de l'historique
    #[arg(long)]
    no_analysis: bool,

    /// Nombre de tirages récents à analyser
    #[arg(short, long)]
    range: Option<u32>,

    /// Autoriser les doublons dans une grille
    #[arg(long)]
    allow_duplicates: bool,

    /// Ne pas trier les numéros
    #[arg(long)]
    unsorted: bool,
}

impl GenerationArgs {
    fn apply(&self, config: &mut GenerationConfig) {
        if self.no_analysis {
            config.use_analysis = false;
        }
        if let Some(range) = self.range {
            config.analysis_range = range;
        }
        if self.allow_duplicates {
            config.unique_only = false;
        }
        if self.unsorted {
            config.sort_ascending = false;
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut app = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(endpoint) = cli.endpoint {
        app.endpoint = endpoint;
    }
    if let Some(timeout) = cli.timeout {
        app.timeout_secs = timeout;
    }

    match cli.command {
        Command::Generate { sets, seed, options } => {
            options.apply(&mut app.generation);
            cmd_generate(&app, sets, seed)
        }
        Command::Draws { last } => cmd_draws(&app, last),
        Command::Stats { window } => cmd_stats(&app, window),
        Command::Interactive { seed, options } => {
            options.apply(&mut app.generation);
            cmd_interactive(&app, seed)
        }
        Command::Config { save, options } => {
            options.apply(&mut app.generation);
            cmd_config(&app, save)
        }
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

fn make_cache(app: &AppConfig) -> Result<AnalysisCache<HttpDrawSource>> {
    let source = HttpDrawSource::new(app.endpoint.clone(), app.timeout());
    let fetcher = DrawFetcher::new(source)?.with_progress(true);
    Ok(AnalysisCache::new(fetcher))
}

fn cmd_generate(app: &AppConfig, sets: usize, seed: Option<u64>) -> Result<()> {
    let cache = make_cache(app)?;
    let mut session = Session::new(app.generation.clone(), cache, make_rng(seed)).with_sets(sets);

    let tickets = session.generate()?.to_vec();
    display_status(session.analysis_status(), session.config().use_analysis);
    display_tickets(&tickets);
    Ok(())
}

fn cmd_draws(app: &AppConfig, last: usize) -> Result<()> {
    let mut cache = make_cache(app)?;
    let draws = cache.fetch_recent(last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_stats(app: &AppConfig, window: Option<u32>) -> Result<()> {
    let window = window.unwrap_or(app.generation.analysis_range);
    let mut cache = make_cache(app)?;
    let draws = cache.fetch_recent(window as usize)?;

    let table = build_weights(&draws);
    let stats = compute_stats(&draws, &table);
    display_stats(&stats, draws.len());
    Ok(())
}

fn cmd_interactive(app: &AppConfig, seed: Option<u64>) -> Result<()> {
    let cache = make_cache(app)?;
    let mut session = Session::new(app.generation.clone(), cache, make_rng(seed));
    interactive::run_interactive(&mut session)
}

fn cmd_config(app: &AppConfig, save: Option<PathBuf>) -> Result<()> {
    match save {
        Some(path) => {
            save_config(app, &path)?;
            println!("Configuration sauvegardée dans {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(app)?),
    }
    Ok(())
}
