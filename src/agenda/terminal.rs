use std::io::{self, Write};

use console::Style;

use crate::agenda::presenter::{RenderedLine, Tone};

pub struct TerminalWriter {
    colors: bool,
}

impl TerminalWriter {
    /// Colors follow terminal detection on stdout (`NO_COLOR`, `CLICOLOR`, tty).
    pub fn stdout() -> Self {
        Self::with_colors(console::colors_enabled())
    }

    pub fn with_colors(colors: bool) -> Self {
        Self { colors }
    }

    fn style(&self, tone: Option<Tone>) -> Style {
        let style = match tone {
            Some(Tone::Affirmative) => Style::new().green(),
            Some(Tone::Alert) => Style::new().red(),
            Some(Tone::Cautionary) => Style::new().yellow(),
            None => Style::new(),
        };
        style.force_styling(self.colors)
    }

    pub fn paint(&self, line: &RenderedLine) -> String {
        line.segments
            .iter()
            .map(|segment| self.style(segment.tone).apply_to(&segment.text).to_string())
            .collect()
    }

    pub fn write_lines<W: Write>(&self, out: &mut W, lines: &[RenderedLine]) -> io::Result<()> {
        for line in lines {
            writeln!(out, "{}", self.paint(line))?;
        }
        Ok(())
    }

    pub fn notice<W: Write>(&self, out: &mut W, text: &str, tone: Tone) -> io::Result<()> {
        writeln!(out, "{}\n", self.style(Some(tone)).apply_to(text))
    }
}
