//! Numbered menus and questions for the interactive CLI.
//!
//! Generic over the reader and writer so they can be driven from tests.

use std::io::{self, BufRead, Write};

/// Prints `options` as a numbered list and reads choices until a valid one is
/// entered. Returns `None` when there is nothing to choose from or input ends.
pub fn choose<R, W, S>(
    input: &mut R,
    output: &mut W,
    label: &str,
    options: &[S],
) -> io::Result<Option<usize>>
where
    R: BufRead,
    W: Write,
    S: AsRef<str>,
{
    if options.is_empty() {
        return Ok(None);
    }

    writeln!(output, "\n{label}:")?;
    for (idx, option) in options.iter().enumerate() {
        writeln!(output, "{}. {}", idx + 1, option.as_ref())?;
    }

    loop {
        write!(output, "Enter the number of your choice (1-{}): ", options.len())?;
        output.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        match line.parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => return Ok(Some(n - 1)),
            Ok(_) => writeln!(output, "Please enter a number between 1 and {}.", options.len())?,
            Err(_) => writeln!(output, "Invalid input. Please enter a valid number.")?,
        }
    }
}

/// Asks a free-form question; an empty answer (or end of input) yields `default`
pub fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    default: &str,
) -> io::Result<String> {
    write!(output, "{question} [{default}]: ")?;
    output.flush()?;

    Ok(read_line(input)?
        .filter(|answer| !answer.is_empty())
        .unwrap_or_else(|| default.to_string()))
}

/// Yes/no question defaulting to yes
pub fn confirm<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> io::Result<bool> {
    let answer = ask(input, output, &format!("{question} (yes/no)"), "yes")?;
    Ok(matches!(answer.to_lowercase().as_str(), "yes" | "y"))
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
