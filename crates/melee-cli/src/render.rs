//! Live terminal renderer for watched battles.
//!
//! [`WatchRenderer`] implements [`Observer`] and redraws the whole frame at
//! each turn boundary: the map with faction colors, the route the active
//! agent just walked, and a stats panel with one line per agent. Drawing
//! happens on the alternate screen so the shell scrollback stays clean.
//!
//! Terminal failures never disturb the battle itself. The first I/O error
//! stops all further drawing and is surfaced by [`WatchRenderer::finish`].

use std::io::{self, Stdout, Write};
use std::thread;
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use melee_core::agent::{Agent, Condition, Faction};
use melee_core::cell::Cell;
use melee_core::event::{CombatEvent, Observer};
use melee_core::grid::Tile;
use melee_core::outcome::Outcome;
use melee_core::view::BattleView;

const MAP_TOP: u16 = 2;

/// Observer that animates the battle on the terminal.
pub struct WatchRenderer {
    out: Stdout,
    delay: Duration,
    /// Route walked by the most recent move, drawn as a trail of `*`.
    route: Vec<Cell>,
    ended: Option<Outcome>,
    failed: Option<io::Error>,
    restored: bool,
}

impl WatchRenderer {
    /// Switches the terminal to the alternate screen and hides the cursor.
    pub fn new(delay_ms: u64) -> io::Result<Self> {
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, Hide)?;
        Ok(Self {
            out,
            delay: Duration::from_millis(delay_ms),
            route: Vec::new(),
            ended: None,
            failed: None,
            restored: false,
        })
    }

    /// Restores the terminal and reports the first drawing error, if any.
    pub fn finish(mut self) -> io::Result<()> {
        self.restore();
        match self.failed.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        let _ = execute!(self.out, ResetColor, Show, LeaveAlternateScreen);
    }

    fn draw(&mut self, view: &BattleView<'_>) -> io::Result<()> {
        queue!(
            self.out,
            Clear(ClearType::All),
            MoveTo(0, 0),
            SetAttribute(Attribute::Bold),
            Print(format!("Round {}", view.current_round())),
            SetAttribute(Attribute::Reset)
        )?;

        let grid = view.grid();
        for y in 0..grid.height() {
            queue!(self.out, MoveTo(0, MAP_TOP + row(y)))?;
            for x in 0..grid.width() {
                self.draw_cell(view, Cell::new(x, y))?;
            }
        }

        let mut line = MAP_TOP + row(grid.height()) + 1;
        for agent in view.agents() {
            queue!(self.out, MoveTo(0, line))?;
            self.draw_agent_line(view, agent)?;
            line += 1;
        }

        if let Some(outcome) = self.ended {
            queue!(
                self.out,
                MoveTo(0, line + 1),
                SetAttribute(Attribute::Bold),
                Print(outcome.to_string()),
                SetAttribute(Attribute::Reset)
            )?;
        }

        self.out.flush()
    }

    fn draw_cell(&mut self, view: &BattleView<'_>, cell: Cell) -> io::Result<()> {
        if let Some(id) = view.occupant(cell) {
            if let Some(agent) = view.agent(id) {
                let active = view.active_agent() == Some(id);
                let targeted = view.target_agent() == Some(id);
                queue!(self.out, SetForegroundColor(faction_color(agent.faction())))?;
                if active {
                    queue!(self.out, SetAttribute(Attribute::Bold))?;
                }
                if targeted {
                    queue!(self.out, SetAttribute(Attribute::Reverse))?;
                }
                queue!(
                    self.out,
                    Print(agent.glyph()),
                    SetAttribute(Attribute::Reset),
                    ResetColor
                )?;
                return Ok(());
            }
        }
        if self.route.contains(&cell) {
            queue!(
                self.out,
                SetForegroundColor(Color::Yellow),
                Print('*'),
                ResetColor
            )?;
            return Ok(());
        }
        let glyph = view.grid().tile(cell).map_or(' ', Tile::glyph);
        queue!(
            self.out,
            SetAttribute(Attribute::Dim),
            Print(glyph),
            SetAttribute(Attribute::Reset)
        )
    }

    fn draw_agent_line(&mut self, view: &BattleView<'_>, agent: &Agent) -> io::Result<()> {
        let active = view.active_agent() == Some(agent.id());
        if agent.condition() == Condition::Dead {
            queue!(self.out, SetAttribute(Attribute::CrossedOut))?;
        } else if active {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        let text = format!(
            "{:>3} {} {:>4}  {}",
            agent.id().as_u32(),
            agent.glyph(),
            agent.hp(),
            agent.condition().label()
        );
        queue!(
            self.out,
            SetForegroundColor(faction_color(agent.faction())),
            Print(text),
            SetAttribute(Attribute::Reset),
            ResetColor
        )
    }
}

impl Observer for WatchRenderer {
    fn on_event(&mut self, event: &CombatEvent, view: BattleView<'_>) {
        if self.failed.is_some() {
            return;
        }
        // One frame per completed turn keeps the pacing readable. Moves and
        // attacks only record state that the turn-end frame will show.
        let beat = match event {
            CombatEvent::TurnStarted { .. } => {
                self.route.clear();
                false
            }
            CombatEvent::Moved { route, .. } => {
                self.route.clone_from(route);
                false
            }
            CombatEvent::Attacked { .. } => false,
            CombatEvent::Died { .. }
            | CombatEvent::TurnEnded { .. }
            | CombatEvent::RoundCompleted { .. } => true,
            CombatEvent::CombatEnded { outcome } => {
                self.ended = Some(*outcome);
                true
            }
        };
        if !beat {
            return;
        }
        if let Err(err) = self.draw(&view) {
            self.failed = Some(err);
            return;
        }
        if self.ended.is_some() {
            // Hold the final frame long enough to read the report.
            thread::sleep(self.delay.saturating_mul(8));
        } else {
            thread::sleep(self.delay);
        }
    }
}

impl Drop for WatchRenderer {
    fn drop(&mut self) {
        self.restore();
    }
}

const fn faction_color(faction: Faction) -> Color {
    match faction {
        Faction::Elf => Color::Green,
        Faction::Goblin => Color::Red,
    }
}

fn row(y: i32) -> u16 {
    u16::try_from(y).unwrap_or(u16::MAX)
}
