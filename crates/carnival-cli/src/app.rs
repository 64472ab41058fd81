//! Interactive command loop
//!
//! One command per input line. Engine failures are already reported in the
//! event log, so the loop only needs to keep going.

use anyhow::Result;
use carnival_core::prelude::*;
use crossterm::{
    cursor::MoveTo,
    queue,
    terminal::{self, Clear, ClearType},
};
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::debug;

use crate::render::{frame, View, FALLBACK_SIZE};

/// Whether the loop should keep running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    pub engine: SimulationEngine,
    pub view: View,
    /// Clear the terminal before every frame
    pub clear_screen: bool,
}

impl App {
    pub fn new(engine: SimulationEngine) -> Self {
        Self {
            engine,
            view: View::default(),
            clear_screen: true,
        }
    }

    /// Render, read a command, apply it; until `q`, menu quit or end of input
    pub fn run(&mut self, input: &mut impl BufRead, out: &mut impl Write) -> Result<()> {
        writeln!(out, "Welcome to the Dark Carnival RNG Ecology.")?;
        loop {
            self.draw(out)?;
            let Some(line) = read_line(input)? else {
                break;
            };
            if self.handle(&line, input, out)? == Flow::Quit {
                break;
            }
        }
        out.flush()?;
        Ok(())
    }

    fn draw(&self, out: &mut impl Write) -> Result<()> {
        if self.clear_screen {
            queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        let size = terminal::size().unwrap_or(FALLBACK_SIZE);
        write!(out, "{}>> ", frame(&self.engine, self.view, size))?;
        out.flush()?;
        Ok(())
    }

    /// Apply one command line
    pub fn handle(
        &mut self,
        line: &str,
        input: &mut impl BufRead,
        out: &mut impl Write,
    ) -> Result<Flow> {
        let command = line.trim().to_lowercase();
        debug!(command = %command, "command");

        match command.as_str() {
            "" => {
                self.engine.tick();
            }
            "q" => return Ok(Flow::Quit),
            "v" => self.view = self.view.next(),
            "a" => {
                let answer = prompt(input, out, "How many ticks to auto-run? ")?;
                let _ = self.engine.auto_run_input(answer.as_deref().unwrap_or(""));
            }
            "m" => return self.menu(input, out),
            "c" => {
                self.engine.connect_nearest();
            }
            "t" => {
                let _ = self.engine.talk();
            }
            "h" => {
                let _ = self.engine.hug();
            }
            "x" => {
                let name = prompt(input, out, "Filename: ")?.unwrap_or_default();
                self.export(&name);
            }
            "i" => {
                let name = prompt(input, out, "Filename: ")?.unwrap_or_default();
                let _ = self.engine.import_seed(Path::new(name.trim()));
            }
            _ => self.engine.push_log("Unknown command."),
        }
        Ok(Flow::Continue)
    }

    fn export(&mut self, name: &str) {
        let name = name.trim();
        let path = (!name.is_empty()).then(|| Path::new(name));
        let _ = self.engine.export_seed(path);
    }

    fn menu(&mut self, input: &mut impl BufRead, out: &mut impl Write) -> Result<Flow> {
        loop {
            writeln!(out, "\n--- MENU ---")?;
            writeln!(out, "1. Resume")?;
            writeln!(out, "2. Save Game")?;
            writeln!(out, "3. Load Game")?;
            writeln!(out, "4. Quit")?;

            let Some(choice) = prompt(input, out, "Select: ")? else {
                return Ok(Flow::Quit);
            };
            match choice.trim() {
                "1" => return Ok(Flow::Continue),
                "2" => {
                    let name = prompt(input, out, "Save filename: ")?.unwrap_or_default();
                    self.export(&name);
                }
                "3" => {
                    let name = prompt(input, out, "Load filename: ")?.unwrap_or_default();
                    let _ = self.engine.import_seed(Path::new(name.trim()));
                }
                "4" => return Ok(Flow::Quit),
                _ => writeln!(out, "Invalid choice.")?,
            }
        }
    }
}

/// One line without its terminator; `None` at end of input
fn read_line(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn prompt(input: &mut impl BufRead, out: &mut impl Write, question: &str) -> Result<Option<String>> {
    write!(out, "{question}")?;
    out.flush()?;
    read_line(input)
}
