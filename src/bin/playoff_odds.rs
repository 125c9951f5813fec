use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use playoff_odds::config::{infer_season, SimulationConfig};
use playoff_odds::loader::{read_conferences, read_games, read_standings};
use playoff_odds::logging::init_tracing;
use playoff_odds::pipeline::run_forecast;
use playoff_odds::report::write_outputs;
use playoff_odds::seeding::standings_from_games;
use playoff_odds::{OddsError, Result};

#[derive(Parser, Debug)]
#[command(name = "playoff-odds")]
#[command(version)]
#[command(about = "Forecast postseason odds from Elo ratings and Monte Carlo bracket simulation")]
struct Args {
    /// Standings CSV (season,team_id,team_name,conference,wins,losses)
    #[arg(long, required_unless_present = "conferences")]
    standings: Option<PathBuf>,

    /// Conference map CSV (team_id,conference); standings are then derived
    /// from the game log
    #[arg(long, conflicts_with = "standings")]
    conferences: Option<PathBuf>,

    /// Regular-season game log CSV used to build baseline ratings
    #[arg(long)]
    games: PathBuf,

    /// Season year (default inferred from today's date)
    #[arg(long)]
    season: Option<i32>,

    /// Number of Monte Carlo simulations
    #[arg(long)]
    sims: Option<usize>,

    /// Elo K-factor
    #[arg(long)]
    k_factor: Option<f64>,

    /// Home-court Elo adjustment
    #[arg(long)]
    home_adv: Option<f64>,

    /// Monte Carlo RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for CSV/JSON outputs
    #[arg(long, default_value = "./data/gold")]
    out_dir: PathBuf,
}

fn run(args: Args) -> Result<()> {
    let mut config = SimulationConfig::from_env()?;
    if let Some(sims) = args.sims {
        config.simulations = sims;
    }
    if let Some(k) = args.k_factor {
        config.k_factor = k;
    }
    if let Some(adv) = args.home_adv {
        config.home_court_adv = adv;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let season = args
        .season
        .unwrap_or_else(|| infer_season(chrono::Utc::now().date_naive()));

    let games = read_games(&args.games)?;
    let standings = match (&args.standings, &args.conferences) {
        (Some(path), _) => read_standings(path)?,
        (None, Some(path)) => {
            let conferences = read_conferences(path)?;
            let season_games: Vec<_> = games.iter().filter(|g| g.season == season).cloned().collect();
            standings_from_games(&season_games, season, &conferences)
        }
        (None, None) => return Err(OddsError::Config("pass --standings or --conferences".into())),
    };

    let forecast = run_forecast(season, &standings, &games, &config)?;
    write_outputs(&args.out_dir, &forecast)?;

    println!("Championship odds, season {} ({} simulations):", season, forecast.odds.trials);
    for odds in &forecast.odds.championship {
        println!("  {:<28} {:>6.1}%", odds.team_name, odds.probability * 100.0);
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            ExitCode::FAILURE
        }
    }
}
