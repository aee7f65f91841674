use std::io::{self, Stderr, Stdout, Write};

use tracing::{debug, warn};

use super::{Block, DisplaySurface, ListItem, Region, SelectOption, Selector};

/// Writes every render as plain text. Selector contents are not printed,
/// they only matter to interactive front ends.
pub struct TerminalSurface<W: Write, E: Write> {
    out: W,
    err: E,
}

impl TerminalSurface<Stdout, Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<W: Write, E: Write> TerminalSurface<W, E> {
    pub fn new(out: W, err: E) -> Self {
        Self { out, err }
    }

    pub fn into_inner(self) -> (W, E) {
        (self.out, self.err)
    }

    fn write_list(&mut self, header: &str, items: &[ListItem]) -> io::Result<()> {
        writeln!(self.out, "== {} ==", header)?;
        if items.is_empty() {
            writeln!(self.out, "  (none)")?;
        }
        for item in items {
            writeln!(self.out, "  [{}] {}", item.key, item.text)?;
            if let Some(detail) = &item.detail {
                writeln!(self.out, "      {}", detail)?;
            }
        }
        writeln!(self.out)
    }

    fn write_panel(&mut self, blocks: &[Block]) -> io::Result<()> {
        for block in blocks {
            match block {
                Block::Heading(text) => writeln!(self.out, "== {} ==", text)?,
                Block::Paragraph(text) => writeln!(self.out, "{}", text)?,
                Block::Bullets(items) => {
                    for item in items {
                        writeln!(self.out, "  - {}", item)?;
                    }
                }
            }
        }
        writeln!(self.out)
    }
}

impl<W: Write, E: Write> DisplaySurface for TerminalSurface<W, E> {
    fn render_list(&mut self, region: Region, header: &str, items: Vec<ListItem>) {
        if let Err(e) = self.write_list(header, &items) {
            warn!("Failed to write {}: {}", region, e);
        }
    }

    fn render_options(&mut self, selector: Selector, options: Vec<SelectOption>) {
        debug!("{} selector now has {} options", selector, options.len());
    }

    fn render_panel(&mut self, region: Region, blocks: Vec<Block>) {
        if let Err(e) = self.write_panel(&blocks) {
            warn!("Failed to write {}: {}", region, e);
        }
    }

    fn show_notice(&mut self, message: &str) {
        if let Err(e) = writeln!(self.out, "{}", message) {
            warn!("Failed to write notice: {}", e);
        }
    }

    fn show_error(&mut self, message: &str) {
        if let Err(e) = writeln!(self.err, "Error: {}", message) {
            warn!("Failed to write error: {}", e);
        }
    }
}
