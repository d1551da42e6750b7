//! Stdin conflict prompt.

use std::io::{self, BufRead, Write};
use vault_archive_core::{ConflictChoice, ConflictPrompt};

/// Prints the prompt and reads choices until one offered choice is typed.
///
/// End of input or a read error answers `Cancel`.
pub fn ask(prompt: &ConflictPrompt) -> ConflictChoice {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let options = prompt
        .choices
        .iter()
        .map(|choice| choice.label())
        .collect::<Vec<_>>()
        .join(" / ");

    loop {
        let _ = writeln!(stdout, "{}\n{}", prompt.title, prompt.message);
        let _ = write!(stdout, "{options}: ");
        let _ = stdout.flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => return ConflictChoice::Cancel,
            Ok(_) => {}
        }
        if let Some(choice) = parse_answer(&line, &prompt.choices) {
            return choice;
        }
        let _ = writeln!(stdout, "unrecognized answer `{}`", line.trim());
    }
}

fn parse_answer(answer: &str, offered: &[ConflictChoice]) -> Option<ConflictChoice> {
    let answer = answer.trim().to_ascii_lowercase();
    if answer.is_empty() {
        return None;
    }
    if let Some(exact) = offered.iter().copied().find(|choice| choice.as_str() == answer) {
        return Some(exact);
    }

    let mut matches = offered
        .iter()
        .copied()
        .filter(|choice| choice.as_str().starts_with(&answer));
    match (matches.next(), matches.next()) {
        (Some(choice), None) => Some(choice),
        _ => None,
    }
}
