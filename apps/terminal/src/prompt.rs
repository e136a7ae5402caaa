//! Line-input helpers for the terminal menus.
//!
//! All retries on invalid input live here or in the flows that call
//! these helpers; nothing below this layer ever re-prompts.

use std::io::{self, Write};
use std::str::FromStr;

/// Prints `label`, reads one line from stdin and returns it trimmed.
pub fn prompt(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Re-prompts until the input is non-empty.
pub fn prompt_nonempty(label: &str) -> io::Result<String> {
    loop {
        let input = prompt(label)?;
        if !input.is_empty() {
            return Ok(input);
        }
        println!("[x] Input cannot be empty.");
    }
}

/// Re-prompts until the input parses as `T`.
pub fn prompt_parse<T: FromStr>(label: &str) -> io::Result<T> {
    loop {
        let input = prompt(label)?;
        match input.parse() {
            Ok(value) => return Ok(value),
            Err(_) => println!("[x] Invalid input, try again."),
        }
    }
}

/// Re-prompts until the input parses as `T`; entering `q` cancels.
pub fn prompt_parse_or_quit<T: FromStr>(label: &str) -> io::Result<Option<T>> {
    loop {
        let input = prompt(label)?;
        if input.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        match input.parse() {
            Ok(value) => return Ok(Some(value)),
            Err(_) => println!("[x] Invalid input, try again (or q to cancel)."),
        }
    }
}
