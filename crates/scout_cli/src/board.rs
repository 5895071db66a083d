//! Interactive scoreboard and shot-clock loop.
//!
//! Every command first runs a frame against the wall clock, so the clocks
//! stay correct across however long the operator hesitates at the prompt.

use std::time::Instant;

use anyhow::Result;

use scout_core::{clock, AlertSink, Scoreboard, SharedStore, Team, TonePattern};

use crate::util;

/// Sink that renders cues on a plain terminal: the bell rings once per tone
/// repeat and vibration patterns are printed.
struct TerminalAlerts;

impl AlertSink for TerminalAlerts {
    fn tone(&mut self, pattern: &TonePattern, _volume: f32) {
        for _ in 0..pattern.repeats {
            print!("\x07");
        }
        println!(
            "  ** {:.0} Hz x{} ({} ms) **",
            pattern.freq_hz, pattern.repeats, pattern.tone_ms
        );
    }

    fn vibrate(&mut self, pattern: &[u32]) {
        println!("  ~~ vibrate {:?} ~~", pattern);
    }
}

pub fn run(store: SharedStore) -> Result<()> {
    let mut sb = Scoreboard::load(Box::new(store), Box::new(TerminalAlerts));

    println!("Commands: start shot reset set <sec> next period h+ h- a+ a- home <name> away <name> new show quit help");
    render(&sb);

    loop {
        let line = match util::read_line("> ") {
            Some(line) => line,
            None => break,
        };

        sb.frame(Instant::now());

        let mut parts = line.split_whitespace();
        match parts.next() {
            None | Some("show") => render(&sb),
            Some("help") => print_help(),
            Some("start") | Some("pause") => {
                sb.toggle_game();
                render(&sb);
            }
            Some("shot") => {
                sb.toggle_shot();
                render(&sb);
            }
            Some("reset") => {
                sb.reset_shot();
                render(&sb);
            }
            Some("set") => match parts.next().and_then(|v| v.parse::<u32>().ok()) {
                Some(secs) => {
                    sb.rearm_shot(secs);
                    render(&sb);
                }
                None => println!("Usage: set <seconds>"),
            },
            Some("next") => {
                sb.next_phase();
                render(&sb);
            }
            Some("period") => {
                sb.reset_period();
                render(&sb);
            }
            Some("h+") => {
                sb.add_score(Team::Home, 1);
                render(&sb);
            }
            Some("h-") => {
                sb.add_score(Team::Home, -1);
                render(&sb);
            }
            Some("a+") => {
                sb.add_score(Team::Away, 1);
                render(&sb);
            }
            Some("a-") => {
                sb.add_score(Team::Away, -1);
                render(&sb);
            }
            Some("home") => {
                sb.set_team_name(Team::Home, &parts.collect::<Vec<_>>().join(" "));
                render(&sb);
            }
            Some("away") => {
                sb.set_team_name(Team::Away, &parts.collect::<Vec<_>>().join(" "));
                render(&sb);
            }
            Some("new") => {
                if util::confirm("Reset scores and clocks for a new game?") {
                    sb.new_game();
                    render(&sb);
                }
            }
            Some("quit") => {
                sb.pause_ticking();
                break;
            }
            Some(other) => println!("Unknown command: {} (try `help`)", other),
        }
    }

    Ok(())
}

fn render(sb: &Scoreboard) {
    let s = sb.state();
    let shot_secs = s.shot_remaining.ceil() as i64;
    println!(
        "[{}] {} {} - {} {} | {} | shot {:>3}{}",
        s.phase.label(),
        s.home_name,
        s.home_score,
        s.away_score,
        s.away_name,
        clock::format_mmss(s.active_remaining().ceil() as i64),
        shot_secs,
        match (s.game_running, s.shot_running) {
            (true, true) => "",
            (true, false) => " (shot paused)",
            _ => " (paused)",
        }
    );
}

fn print_help() {
    println!("start / pause   start or pause the game clock (and shot clock)");
    println!("shot            pause or resume only the shot clock");
    println!("reset           rearm the shot clock to its configured duration");
    println!("set <sec>       rearm the shot clock to an arbitrary duration");
    println!("next            advance to the next match phase");
    println!("period          reinitialize the current period clock");
    println!("h+ h- a+ a-     adjust the home/away score");
    println!("home <name>     rename the home team");
    println!("away <name>     rename the away team");
    println!("new             reset everything for a fresh game");
    println!("show            redraw the scoreboard line");
    println!("quit            leave; clocks stop until the next session");
}
