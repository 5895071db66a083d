//! Small stdin helpers for the interactive loops.

use std::io::{self, Write};

/// Print a prompt and read one trimmed line. `None` on EOF.
pub fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().ok();

    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}

/// Blocking yes/no confirmation. Only an explicit `y`/`yes` confirms.
pub fn confirm(prompt: &str) -> bool {
    match read_line(&format!("{} [y/N] ", prompt)) {
        Some(answer) => matches!(answer.to_lowercase().as_str(), "y" | "yes"),
        None => false,
    }
}
