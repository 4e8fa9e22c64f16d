//! Progress reporting for the seed workflow

use std::io::Write;

const BAR_LENGTH: usize = 50;
const FILL: char = '█';

/// Receives the workflow's status lines and per-stage progress.
pub trait SeedProgress {
    /// A status line, e.g. "Populating services...".
    fn message(&mut self, text: &str);

    /// `completed` of `total` items of `stage` are done.
    fn advance(&mut self, stage: &str, completed: usize, total: usize);
}

/// Text rendering of one progress bar state, without line control characters.
pub fn render_bar(stage: &str, completed: usize, total: usize) -> String {
    let ratio = if total == 0 {
        1.0
    } else {
        completed.min(total) as f64 / total as f64
    };
    let filled = (BAR_LENGTH as f64 * ratio) as usize;
    let bar: String = std::iter::repeat_n(FILL, filled)
        .chain(std::iter::repeat_n('-', BAR_LENGTH - filled))
        .collect();

    format!("{stage} |{bar}| {:.1}% Complete", ratio * 100.0)
}

/// Writes messages as lines and redraws progress bars in place.
pub struct ConsoleProgress<W: Write> {
    out: W,
}

impl<W: Write> ConsoleProgress<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: &str) {
        let result = self
            .out
            .write_all(text.as_bytes())
            .and_then(|_| self.out.flush());
        if let Err(err) = result {
            log::debug!("Failed to write seed progress: {}", err);
        }
    }
}

impl ConsoleProgress<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> SeedProgress for ConsoleProgress<W> {
    fn message(&mut self, text: &str) {
        self.write(&format!("{text}\n"));
    }

    fn advance(&mut self, stage: &str, completed: usize, total: usize) {
        let mut line = format!("\r{}", render_bar(stage, completed, total));
        if completed >= total {
            line.push('\n');
        }
        self.write(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_shows_fraction_of_fifty_cells() {
        let line = render_bar("Providers", 1, 3);
        let filled = line.chars().filter(|c| *c == FILL).count();
        let empty = line.chars().filter(|c| *c == '-').count();

        assert_eq!(filled, 16);
        assert_eq!(filled + empty, 50);
        assert!(line.starts_with("Providers |"));
        assert!(line.ends_with("| 33.3% Complete"));
    }

    #[test]
    fn empty_stage_renders_complete() {
        assert!(render_bar("Options", 0, 0).ends_with("100.0% Complete"));
    }

    #[test]
    fn console_output_finishes_line_on_completion() {
        let mut progress = ConsoleProgress::new(Vec::new());
        progress.message("Populating providers...");
        progress.advance("Providers", 0, 2);
        progress.advance("Providers", 1, 2);
        progress.advance("Providers", 2, 2);

        let output = String::from_utf8(progress.into_inner()).unwrap();
        assert!(output.starts_with("Populating providers...\n\rProviders |"));
        assert!(output.ends_with("| 100.0% Complete\n"));
        assert_eq!(output.matches('\n').count(), 2);
    }
}
