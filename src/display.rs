//! Rendering layer: all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! level being played. No game logic is performed; this module only
//! translates state into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use ballistic_game::compute::{to_cell, MAX_X, MAX_Y};
use ballistic_game::entities::{Cell, Level, Target, TargetKind};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_STAGE: Color = Color::Yellow;
const C_HUD_ATTEMPTS: Color = Color::Red;
const C_CANNON: Color = Color::Red;
const C_POINT: Color = Color::Green;
const C_OBSTACLE: Color = Color::DarkYellow;
const C_BOSS: Color = Color::Blue;
const C_TRAJECTORY: Color = Color::White;
const C_GAUGE: Color = Color::Cyan;
const C_MESSAGE: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

// ── Layout ────────────────────────────────────────────────────────────────────

const COLS: i32 = MAX_X as i32 + 1;
const ROWS: i32 = MAX_Y as i32 + 1;
/// Every grid cell is two terminal columns wide so the field is not squashed.
const CELL_W: u16 = 2;
const BOARD_LEFT: u16 = 1;
const BOARD_TOP: u16 = 2;
const GAUGE_WIDTH: usize = 30;

/// Everything besides the level that the aiming screen shows.
pub struct Hud<'a> {
    pub stage: usize,
    pub stage_count: usize,
    pub angle: i32,
    pub force: i32,
    pub message: &'a str,
}

fn board_bottom() -> u16 {
    BOARD_TOP + ROWS as u16
}

/// Screen position of a grid cell, `None` when it lies outside the field.
fn cell_to_screen((x, y): Cell) -> Option<(u16, u16)> {
    if !(0..COLS).contains(&x) || !(0..ROWS).contains(&y) {
        return None;
    }
    let col = BOARD_LEFT + x as u16 * CELL_W;
    let row = BOARD_TOP + (ROWS - 1 - y) as u16;
    Some((col, row))
}

fn put<W: Write>(out: &mut W, cell: Cell, glyph: &str, color: Color) -> std::io::Result<()> {
    if let Some((col, row)) = cell_to_screen(cell) {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Render the aiming screen: field, last shot, gauges and status line.
pub fn render<W: Write>(out: &mut W, level: &Level, hud: &Hud) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out)?;
    draw_hud(out, level, hud)?;
    draw_trajectory(out, level)?;
    for target in level.targets() {
        draw_target(out, target)?;
    }
    put(out, (0, 0), "●", C_CANNON)?;
    draw_gauges(out, hud)?;
    draw_message(out, hud.message)?;
    draw_controls_hint(out)?;

    finish(out)
}

/// Render a full-screen message box, optionally over the final state of a
/// level.
pub fn render_banner<W: Write>(
    out: &mut W,
    level: Option<&Level>,
    lines: &[(&str, Color)],
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    if let Some(level) = level {
        draw_border(out)?;
        draw_trajectory(out, level)?;
        for target in level.targets() {
            draw_target(out, target)?;
        }
        put(out, (0, 0), "●", C_CANNON)?;
    }

    let width = BOARD_LEFT + COLS as u16 * CELL_W + 1;
    let cx = width / 2;
    let start_row = (BOARD_TOP + ROWS as u16 / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    finish(out)
}

fn finish<W: Write>(out: &mut W) -> std::io::Result<()> {
    // Park cursor below everything and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, board_bottom() + 5))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W) -> std::io::Result<()> {
    let inner = COLS as usize * CELL_W as usize;
    let right = BOARD_LEFT + inner as u16;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, BOARD_TOP - 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(inner))))?;

    out.queue(cursor::MoveTo(0, board_bottom()))?;
    out.queue(Print(format!("└{}┘", "─".repeat(inner))))?;

    for row in BOARD_TOP..board_bottom() {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(right, row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, level: &Level, hud: &Hud) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_STAGE))?;
    out.queue(Print(format!("Stage {}/{}", hud.stage, hud.stage_count)))?;

    let shots: String = "●".repeat(level.attempts() as usize);
    let attempts_text = format!("Attempts: {}", shots);
    let width = BOARD_LEFT + COLS as u16 * CELL_W + 1;
    let rx = width.saturating_sub(attempts_text.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_ATTEMPTS))?;
    out.queue(Print(&attempts_text))?;

    Ok(())
}

// ── Field contents ────────────────────────────────────────────────────────────

fn draw_trajectory<W: Write>(out: &mut W, level: &Level) -> std::io::Result<()> {
    for &point in level.trajectory() {
        put(out, to_cell(point), "·", C_TRAJECTORY)?;
    }
    Ok(())
}

fn draw_target<W: Write>(out: &mut W, target: &Target) -> std::io::Result<()> {
    match target.kind() {
        TargetKind::Point => put(out, target.position(), "()", C_POINT),
        TargetKind::Obstacle => {
            // Rows above the field are never drawn
            let (x, _) = target.position();
            let height = target.height().unwrap_or(0).min(ROWS as u32);
            for y in 0..height as i32 {
                put(out, (x, y), "██", C_OBSTACLE)?;
            }
            Ok(())
        }
        TargetKind::Boss => {
            let health = target.health().unwrap_or(0);
            let (x, y) = target.position();
            // Top-left cell carries the remaining health
            put(out, (x, y + 1), &format!("B{}", health.min(9)), C_BOSS)?;
            put(out, (x + 1, y + 1), "▓▓", C_BOSS)?;
            put(out, (x, y), "▓▓", C_BOSS)?;
            put(out, (x + 1, y), "▓▓", C_BOSS)
        }
    }
}

// ── Gauges, status and hint (below the field) ─────────────────────────────────

fn gauge(value: i32, max: i32) -> String {
    let filled = (value.clamp(0, max) as usize * GAUGE_WIDTH) / max as usize;
    format!("[{}{}]", "█".repeat(filled), "·".repeat(GAUGE_WIDTH - filled))
}

fn draw_gauges<W: Write>(out: &mut W, hud: &Hud) -> std::io::Result<()> {
    let row = board_bottom() + 1;
    out.queue(style::SetForegroundColor(C_GAUGE))?;

    out.queue(cursor::MoveTo(1, row))?;
    out.queue(Print(format!("Angle {} {:>3}°", gauge(hud.angle, 90), hud.angle)))?;

    out.queue(cursor::MoveTo(1, row + 1))?;
    out.queue(Print(format!("Force {} {:>3}%", gauge(hud.force, 100), hud.force)))?;

    Ok(())
}

fn draw_message<W: Write>(out: &mut W, message: &str) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, board_bottom() + 3))?;
    out.queue(style::SetForegroundColor(C_MESSAGE))?;
    out.queue(Print(message))?;
    Ok(())
}

fn draw_controls_hint<W: Write>(out: &mut W) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, board_bottom() + 4))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "↑ ↓ / W S : Angle   ← → / A D : Force   PgUp PgDn : Force ±10   SPACE : Fire   Q : Quit",
    ))?;
    Ok(())
}
