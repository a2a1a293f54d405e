use bracket_terminal::prelude::*;

use crate::session::{RenderSnapshot, SessionState};

const EVENT_ROWS: usize = 4;

pub fn draw(ctx: &mut BTerm, snapshot: &RenderSnapshot) {
    draw_cells(ctx, snapshot);
    draw_actors(ctx, snapshot);
    draw_countdown(ctx, snapshot);
    draw_events(ctx, snapshot);
    draw_charges(ctx, snapshot);
    draw_state_line(ctx, snapshot);
    draw_outcome(ctx, snapshot);
}

fn draw_cells(ctx: &mut BTerm, snapshot: &RenderSnapshot) {
    for y in 0..snapshot.height {
        for x in 0..snapshot.width {
            let (glyph, color) = snapshot.cells[(y * snapshot.width + x) as usize];
            ctx.set(x, y, color, RGB::named(BLACK), to_cp437(glyph));
        }
    }
}

fn draw_actors(ctx: &mut BTerm, snapshot: &RenderSnapshot) {
    for actor in &snapshot.actors {
        ctx.set(
            actor.pos.x,
            actor.pos.y,
            actor.color,
            RGB::named(BLACK),
            to_cp437(actor.glyph),
        );
    }
}

/// Countdown heats up as it runs out: green when nearly done, red when
/// the clock still has a long way to go.
fn draw_countdown(ctx: &mut BTerm, snapshot: &RenderSnapshot) {
    let color = if snapshot.countdown < 5 {
        RGB::named(GREEN)
    } else if snapshot.countdown < 10 {
        RGB::named(YELLOW)
    } else if snapshot.countdown < 15 {
        RGB::named(ORANGE)
    } else {
        RGB::named(RED)
    };
    ctx.print_color(
        0,
        0,
        color,
        RGB::named(BLACK),
        format!("Time: {}", snapshot.countdown),
    );
}

fn draw_events(ctx: &mut BTerm, snapshot: &RenderSnapshot) {
    let x = (snapshot.width - 44).max(0);
    for (row, entry) in snapshot.events.iter().take(EVENT_ROWS).enumerate() {
        ctx.print_color(
            x,
            row as i32,
            RGB::named(DARK_GRAY),
            RGB::named(BLACK),
            entry,
        );
    }
}

fn charge_color(charges: u32) -> RGB {
    if charges > 1 {
        RGB::named(GREEN)
    } else if charges > 0 {
        RGB::named(YELLOW)
    } else {
        RGB::named(RED)
    }
}

fn draw_charges(ctx: &mut BTerm, snapshot: &RenderSnapshot) {
    let y = snapshot.height - 2;
    ctx.print_color(
        0,
        y,
        charge_color(snapshot.dashes),
        RGB::named(BLACK),
        format!("Dashes: {}", snapshot.dashes),
    );
    ctx.print_color(
        9,
        y,
        charge_color(snapshot.destroys),
        RGB::named(BLACK),
        format!(", Destroys: {}", snapshot.destroys),
    );
}

fn draw_state_line(ctx: &mut BTerm, snapshot: &RenderSnapshot) {
    let (label, color) = match snapshot.state {
        SessionState::Running => ("State: RUNNING", RGB::named(GREEN)),
        SessionState::Paused => ("State: PAUSED", RGB::named(YELLOW)),
        SessionState::Stopped => ("State: STOPPED", RGB::named(RED)),
    };
    ctx.print_color(0, snapshot.height - 1, color, RGB::named(BLACK), label);
}

fn draw_outcome(ctx: &mut BTerm, snapshot: &RenderSnapshot) {
    if let Some(outcome) = snapshot.outcome {
        let color = if snapshot.countdown == 0 {
            RGB::named(GREEN)
        } else {
            RGB::named(RED)
        };
        ctx.print_color(0, 1, color, RGB::named(BLACK), outcome);
    }
}
