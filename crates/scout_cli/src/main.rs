//! Scoutmatch CLI
//!
//! Terminal front-end for the tracker and the scoreboard: interactive match
//! scouting, a live scoreboard loop, report management and settings.

mod board;
mod track;
mod util;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;

use scout_core::{
    clock, FileStore, NullAlerts, Scoreboard, SettingsChannel, SettingsUpdate, SharedStore,
    Tracker, TrackerSettings,
};

#[derive(Parser)]
#[command(name = "scoutmatch")]
#[command(about = "Match scouting tracker and scoreboard", long_about = None)]
struct Cli {
    /// Store file holding all persisted state
    #[arg(long, default_value = "scoutmatch.dat")]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scout one player through a match (interactive)
    Track {
        /// Opponent team for this match
        #[arg(long)]
        opponent: Option<String>,
    },

    /// Run the scoreboard and shot clock (interactive)
    Scoreboard,

    /// List saved scouting reports
    Reports,

    /// Delete a saved scouting report by id
    Delete {
        #[arg(long)]
        id: u64,
    },

    /// Show the stored settings
    Settings,

    /// Update settings and broadcast them to the scoreboard
    Configure {
        #[arg(long)]
        player_name: Option<String>,
        #[arg(long)]
        player_number: Option<String>,
        #[arg(long)]
        own_team: Option<String>,
        #[arg(long)]
        goalkeeper: Option<bool>,
        /// Half duration in minutes
        #[arg(long)]
        half_min: Option<u32>,
        /// Halftime break in minutes
        #[arg(long)]
        halftime_min: Option<u32>,
        /// Shot clock duration in seconds
        #[arg(long)]
        shot_sec: Option<u32>,
        /// Shot clock warning threshold in seconds
        #[arg(long)]
        warn_sec: Option<u32>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    log::debug!("opening store {:?}", cli.store);
    let store = SharedStore::new(Box::new(FileStore::open(&cli.store)));

    match cli.command {
        Commands::Track { opponent } => track::run(store, opponent.as_deref()),
        Commands::Scoreboard => board::run(store),
        Commands::Reports => {
            list_reports(store);
            Ok(())
        }
        Commands::Delete { id } => delete_report(store, id),
        Commands::Settings => {
            show_settings(store);
            Ok(())
        }
        Commands::Configure {
            player_name,
            player_number,
            own_team,
            goalkeeper,
            half_min,
            halftime_min,
            shot_sec,
            warn_sec,
        } => {
            let mut tracker = Tracker::new(Box::new(store.clone()));
            let mut settings = tracker.settings().clone();
            if let Some(v) = player_name {
                settings.player_name = v;
            }
            if let Some(v) = player_number {
                settings.player_number = v;
            }
            if let Some(v) = own_team {
                settings.own_team = v;
            }
            if let Some(v) = goalkeeper {
                settings.goalkeeper = v;
            }
            if let Some(v) = half_min {
                settings.half_duration_min = v;
            }

            let base = tracker.save_settings(settings);
            let update = SettingsUpdate { halftime_min, shot_sec, warn_sec, ..base };
            broadcast_to_scoreboard(store, &update);

            println!("Settings saved.");
            Ok(())
        }
    }
}

/// Deliver a settings update to the scoreboard over the settings channel.
fn broadcast_to_scoreboard(store: SharedStore, update: &SettingsUpdate) {
    use std::cell::RefCell;
    use std::rc::Rc;

    let scoreboard = Rc::new(RefCell::new(Scoreboard::load(
        Box::new(store),
        Box::new(NullAlerts),
    )));

    let mut channel = SettingsChannel::new();
    {
        let scoreboard = Rc::clone(&scoreboard);
        channel.subscribe(move |update| scoreboard.borrow_mut().apply_settings(update));
    }
    channel.publish(update);
}

fn show_settings(store: SharedStore) {
    let settings = TrackerSettings::load(&store);
    println!("Player:      {}", display_or_dash(&settings.player_name));
    println!("Number:      {}", display_or_dash(&settings.player_number));
    println!("Team:        {}", display_or_dash(&settings.own_team));
    println!("Goalkeeper:  {}", if settings.goalkeeper { "yes" } else { "no" });
    println!("Half:        {} min", settings.half_duration_min);
    println!("Halves:      {}", settings.number_of_halves);
}

fn display_or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

fn list_reports(store: SharedStore) {
    let tracker = Tracker::new(Box::new(store));
    let reports = tracker.reports().sorted_desc();
    if reports.is_empty() {
        println!("No scouting reports saved yet.");
        return;
    }

    for report in reports {
        let number = if report.player_number.is_empty() {
            String::new()
        } else {
            format!(" (#{})", report.player_number)
        };
        println!(
            "[{}] {}{} vs {} — {} — played {}",
            report.id,
            report.player_name,
            number,
            display_or_dash(&report.opponent),
            report.date,
            clock::format_mmss(report.playtime as i64),
        );
        println!(
            "      involvement {:.1}/min | passes {} ({}%) | shots {} ({}%)",
            report.totals.involvement,
            report.totals.total_passes,
            report.totals.pass_accuracy,
            report.stats.goals + report.stats.attempts,
            report.totals.shot_accuracy,
        );
        if report.is_goalkeeper {
            println!(
                "      keeper: save {}% | defended {} | against {}",
                report.totals.save_pct, report.stats.goals_defended, report.stats.goals_against,
            );
        }
    }
}

fn delete_report(store: SharedStore, id: u64) -> Result<()> {
    if !util::confirm("Delete this scouting report?") {
        return Ok(());
    }
    let mut tracker = Tracker::new(Box::new(store));
    tracker.delete_report(id)?;
    println!("Report {} deleted.", id);
    Ok(())
}
