//! Colored stderr reporting. Stdout is reserved for headers and response bodies.

use console::{Style, Term};
use ureq::http::StatusCode;

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
        }
    }

    /// Report a response status line: green on success, yellow on 4xx/5xx.
    pub(crate) fn status(&self, status: StatusCode, msg: &str) {
        let style = if status.is_client_error() || status.is_server_error() {
            &self.yellow
        } else {
            &self.green
        };
        let _ = self.term.write_line(&style.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }
}
