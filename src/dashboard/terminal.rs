use super::Surface;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::Print;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use std::io::{self, Stdout, Write};
use std::time::Duration;
use tracing::warn;

/// Fixed-size window at the top-left of the alternate screen.
///
/// Writes are queued and only reach the terminal on [`Surface::refresh`].
pub struct TerminalSurface {
    out: Stdout,
    rows: u16,
    cols: u16,
    active: bool,
}

impl TerminalSurface {
    pub fn open(rows: u16, cols: u16) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut out = io::stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All)) {
            let _ = disable_raw_mode();
            return Err(err);
        }
        Ok(Self {
            out,
            rows,
            cols,
            active: true,
        })
    }

    fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(self.out, Show, LeaveAlternateScreen)?;
        disable_raw_mode()
    }
}

impl Surface for TerminalSurface {
    fn poll_key(&mut self) -> io::Result<Option<char>> {
        if !event::poll(Duration::ZERO)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char(c) => Ok(Some(c)),
                _ => Ok(None),
            },
            _ => Ok(None),
        }
    }

    fn erase(&mut self) -> io::Result<()> {
        let blank = " ".repeat(usize::from(self.cols));
        for row in 0..self.rows {
            queue!(self.out, MoveTo(0, row), Print(&blank))?;
        }
        Ok(())
    }

    fn draw_border(&mut self) -> io::Result<()> {
        if self.rows < 2 || self.cols < 2 {
            return Ok(());
        }
        let last_row = self.rows - 1;
        let last_col = self.cols - 1;
        let horizontal = "─".repeat(usize::from(self.cols - 2));

        queue!(self.out, MoveTo(0, 0), Print(format!("┌{horizontal}┐")))?;
        for row in 1..last_row {
            queue!(
                self.out,
                MoveTo(0, row),
                Print('│'),
                MoveTo(last_col, row),
                Print('│')
            )?;
        }
        queue!(
            self.out,
            MoveTo(0, last_row),
            Print(format!("└{horizontal}┘"))
        )
    }

    fn put_str(&mut self, row: u16, col: u16, text: &str) -> io::Result<()> {
        // Keep clear of the right and bottom border.
        if row.saturating_add(1) >= self.rows || col.saturating_add(1) >= self.cols {
            return Ok(());
        }
        let room = usize::from(self.cols - 1 - col);
        let clipped: String = text.chars().take(room).collect();
        queue!(self.out, MoveTo(col, row), Print(clipped))
    }

    fn refresh(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn close(mut self) -> io::Result<()> {
        self.restore()
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            warn!(error = %err, "failed to restore terminal");
        }
    }
}
