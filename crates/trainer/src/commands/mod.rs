pub mod drill;
pub mod explore;
pub mod history;
pub mod import;

use std::io::{self, BufRead, Write};

/// Print `prompt` and read one trimmed line; `None` at end of input.
pub(crate) fn prompt_line(input: &mut impl BufRead, prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
