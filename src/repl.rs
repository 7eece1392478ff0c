//! Interactive and scripted drivers shared by all levels
//!
//! Each interaction is printed and then appended to the level's session log.
//! A log write failure is reported and the session continues.

use crate::levels::Assistant;
use crate::session::SessionLog;
use std::io::{self, BufRead, Write};
use tracing::warn;

fn answer_and_log(
    assistant: &mut dyn Assistant,
    log: &SessionLog,
    query: &str,
    output: &mut dyn Write,
) -> io::Result<()> {
    let response = assistant.respond(query);
    writeln!(output, "{}", response)?;
    output.flush()?;
    if let Err(e) = log.record(query, &response) {
        warn!(path = %log.path().display(), error = %e, "failed to append session log");
    }
    Ok(())
}

/// Read queries line by line until `exit`, `quit` or end of input.
/// Returns the number of answered queries.
pub fn run_interactive(
    assistant: &mut dyn Assistant,
    log: &SessionLog,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> io::Result<usize> {
    writeln!(output, "{} (type 'exit' to quit)", assistant.level().title())?;

    let mut answered = 0;
    let mut line = String::new();
    loop {
        write!(output, "You: ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output, "\nBye!")?;
            return Ok(answered);
        }

        let query = line.trim();
        if query.eq_ignore_ascii_case("exit") || query.eq_ignore_ascii_case("quit") {
            writeln!(output, "Bye!")?;
            return Ok(answered);
        }
        if query.is_empty() {
            continue;
        }

        answer_and_log(assistant, log, query, output)?;
        answered += 1;
    }
}

/// Answer a fixed list of queries, echoing each one first.
pub fn run_batch<'a, I>(
    assistant: &mut dyn Assistant,
    log: &SessionLog,
    queries: I,
    output: &mut dyn Write,
) -> io::Result<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    writeln!(output, "{}", assistant.level().title())?;

    let mut answered = 0;
    for query in queries {
        writeln!(output, "\nYou: {}", query)?;
        answer_and_log(assistant, log, query, output)?;
        answered += 1;
    }
    Ok(answered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::{CalculatorAssistant, Level, MIXED_REQUEST_REFUSAL};
    use crate::provider::{MockProvider, Persona};
    use std::io::Cursor;

    fn level2() -> CalculatorAssistant {
        CalculatorAssistant::new(Box::new(MockProvider::new(Persona::Concise)))
    }

    #[test]
    fn test_interactive_session_logs_each_answer() {
        let dir = tempfile::tempdir().unwrap();
        let log = SessionLog::for_level(dir.path(), Level::Two);
        let mut assistant = level2();
        let mut input = Cursor::new("15 + 23\n\nMultiply 9 and 8\nexit\nnever read\n");
        let mut output = Vec::new();

        let answered = run_interactive(&mut assistant, &log, &mut input, &mut output).unwrap();
        let printed = String::from_utf8(output).unwrap();

        assert_eq!(answered, 2);
        assert!(printed.starts_with("Level 2 - LLM + Calculator Tool (type 'exit' to quit)"));
        assert!(printed.contains("Calculator result: 38"));
        assert!(printed.contains("Calculator result: 72"));
        assert!(printed.trim_end().ends_with("Bye!"));
        assert_eq!(log.count_entries().unwrap(), 2);
    }

    #[test]
    fn test_interactive_ends_on_eof() {
        let dir = tempfile::tempdir().unwrap();
        let log = SessionLog::for_level(dir.path(), Level::Two);
        let mut assistant = level2();
        let mut input = Cursor::new("What is the capital of France?");
        let mut output = Vec::new();

        let answered = run_interactive(&mut assistant, &log, &mut input, &mut output).unwrap();
        let printed = String::from_utf8(output).unwrap();

        assert_eq!(answered, 1);
        assert!(printed.contains("Answer: Paris"));
        assert!(printed.ends_with("\nBye!\n"));
    }

    #[test]
    fn test_batch_appends_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let log = SessionLog::for_level(dir.path(), Level::Two);
        let prompts = Level::Two.demo_prompts();

        for _ in 0..2 {
            let mut assistant = level2();
            let mut output = Vec::new();
            let answered =
                run_batch(&mut assistant, &log, prompts.iter().copied(), &mut output).unwrap();
            assert_eq!(answered, prompts.len());
            assert!(String::from_utf8(output)
                .unwrap()
                .contains(MIXED_REQUEST_REFUSAL));
        }

        assert_eq!(log.count_entries().unwrap(), 2 * prompts.len());
    }
}
