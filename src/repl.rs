use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};

use crate::error;
use crate::printer::{self, Format};
use crate::scanner;

const PROMPT: &str = " > ";

/// Run the interactive prompt. Each line is scanned on its own and the
/// resulting tokens are printed.
pub fn run_repl(format: Format) -> Result<(), ReadlineError> {
    let mut editor = DefaultEditor::new()?;

    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e),
        };

        if line.trim().is_empty() {
            continue;
        }
        if let Err(e) = editor.add_history_entry(line.as_str()) {
            warn!("could not record history: {e}");
        }

        print!("{}", scan_line(&line, format));
    }

    debug!("prompt closed");
    Ok(())
}

/// Scan one line of input and render its tokens. Diagnostics go to stderr.
fn scan_line(line: &str, format: Format) -> String {
    let scan = scanner::scan(line);
    for report in error::render(&scan.diagnostics, "<stdin>", line) {
        eprintln!("{report:?}");
    }
    printer::render(&scan.tokens, format)
}
