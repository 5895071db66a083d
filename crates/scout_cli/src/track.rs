//! Interactive match-tracking loop.
//!
//! Counter mutations are typed as `+name` / `-name`; the playtime clock
//! catches up with real elapsed time before every command, so the session
//! stays accurate even though input is blocking.

use std::time::Instant;

use anyhow::Result;

use scout_core::{clock, CounterKind, SharedStore, Tracker, TrackerError};

use crate::util;

pub fn run(store: SharedStore, opponent: Option<&str>) -> Result<()> {
    let mut tracker = Tracker::new(Box::new(store));

    if tracker.restore_live_state() && tracker.has_progress() {
        println!(
            "Resumed in-progress match vs {} at {}.",
            display_opponent(tracker.opponent()),
            clock::format_mmss(tracker.playtime_secs() as i64)
        );
    } else {
        let opponent = match opponent {
            Some(opponent) => opponent.to_string(),
            None => util::read_line("Opponent: ").unwrap_or_default(),
        };
        if let Err(err) = tracker.start_match(&opponent) {
            anyhow::bail!("cannot start scouting: {} (run `scoutmatch configure` first)", err);
        }
        println!("Scouting {} vs {}.", tracker.settings().player_name, display_opponent(&opponent));
    }

    println!("Commands: +<counter> -<counter> play stats min+ min- end discard quit help");
    let mut last = Instant::now();

    loop {
        let line = match util::read_line("> ") {
            Some(line) => line,
            None => break,
        };

        // catch up the playtime clock with the real time spent idle
        let now = Instant::now();
        let elapsed = now.duration_since(last).as_secs() as u32;
        last = now;
        tracker.tick_seconds(elapsed);

        match line.as_str() {
            "" => print_status(&tracker),
            "help" => print_help(),
            "play" => {
                tracker.toggle_playing();
                if tracker.is_playing() {
                    println!("Player is on the field.");
                } else {
                    println!("Player is in the substitution zone.");
                }
            }
            "min+" => {
                tracker.add_minute();
                print_status(&tracker);
            }
            "min-" => {
                tracker.subtract_minute();
                print_status(&tracker);
            }
            "stats" => print_stats(&tracker),
            "end" => {
                if !util::confirm("End match and save the scouting?") {
                    continue;
                }
                match tracker.end_match() {
                    Ok(report) => {
                        println!("Game of {} saved (report {}).", report.player_name, report.id);
                        break;
                    }
                    Err(err) => println!("Cannot end match: {}", err),
                }
            }
            "discard" => {
                if util::confirm("Discard this match without saving?") {
                    tracker.discard_match();
                    break;
                }
            }
            "quit" => {
                // live state is already persisted; resume later with `track`
                tracker.save_live_state();
                break;
            }
            other => handle_counter(&mut tracker, other),
        }
    }

    Ok(())
}

fn handle_counter(tracker: &mut Tracker, input: &str) {
    let result = if let Some(name) = input.strip_prefix('+') {
        tracker.increment_named(name)
    } else if let Some(name) = input.strip_prefix('-') {
        tracker.decrement_named(name)
    } else {
        println!("Unknown command: {} (try `help`)", input);
        return;
    };

    match result {
        Ok(()) => print_status(tracker),
        Err(TrackerError::UnknownCounter(name)) => {
            println!("Unknown counter: {} (available: {})", name, counter_names());
        }
        Err(err) => println!("{}", err),
    }
}

fn counter_names() -> String {
    CounterKind::ALL.map(|k| k.as_str()).join(", ")
}

fn display_opponent(opponent: &str) -> &str {
    if opponent.is_empty() {
        "?"
    } else {
        opponent
    }
}

fn print_status(tracker: &Tracker) {
    let c = tracker.counters();
    println!(
        "{} | int {} ast {} goal {} att {} pass {}/{}{}",
        clock::format_mmss(tracker.playtime_secs() as i64),
        c.interceptions,
        c.assists,
        c.goals,
        c.attempts,
        c.good_passes,
        c.bad_passes,
        if tracker.settings().goalkeeper {
            format!(" | def {} against {}", c.goals_defended, c.goals_against)
        } else {
            String::new()
        }
    );
}

fn print_stats(tracker: &Tracker) {
    let totals = tracker.derived();
    println!("Time played:       {}", clock::format_mmss(tracker.playtime_secs() as i64));
    println!("Involvement:       {:.1}/min", totals.involvement);
    println!("Passing accuracy:  {}%", totals.pass_accuracy);
    println!("Shot accuracy:     {}%", totals.shot_accuracy);
    println!("Total passes:      {}", totals.total_passes);
    if tracker.settings().goalkeeper {
        println!("Save percentage:   {}%", totals.save_pct);
    }
}

fn print_help() {
    println!("+<counter> / -<counter>  adjust a tally ({})", counter_names());
    println!("play                     toggle the playtime clock");
    println!("min+ / min-              adjust playtime by one minute");
    println!("stats                    show derived statistics");
    println!("end                      end the match and save the report");
    println!("discard                  drop the match without saving");
    println!("quit                     leave, keeping the live state to resume");
}
