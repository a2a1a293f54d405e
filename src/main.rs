use std::env;
use std::time::Instant;

use bracket_terminal::prelude::*;

use cavedash::render;
use cavedash::scripted_input::ScriptedInput;
use cavedash::session::{Command, Direction, Session, SessionConfig, SessionState};

struct CaveDashState {
    session: Session,
    config: SessionConfig,
    clock: Instant,
    script: Option<ScriptedInput>,
}

impl CaveDashState {
    fn now_ms(&self) -> i64 {
        self.clock.elapsed().as_millis() as i64
    }

    /// Scripted input takes priority; live keys only matter once the
    /// script runs dry.
    fn next_command(&mut self, ctx: &BTerm) -> Option<Command> {
        if let Some(script) = self.script.as_mut() {
            if let Some(command) = script.next_command() {
                return command;
            }
        }
        ctx.key.and_then(map_key)
    }
}

impl GameState for CaveDashState {
    fn tick(&mut self, ctx: &mut BTerm) {
        let now = self.now_ms();
        let command = self.next_command(ctx);

        if self.session.state() == SessionState::Stopped {
            match command {
                Some(Command::Confirm) => match Session::new(&self.config, now) {
                    Ok(session) => self.session = session,
                    Err(err) => {
                        eprintln!("failed to generate a fresh cave: {err}");
                        ctx.quit();
                    }
                },
                Some(Command::Cancel) => ctx.quit(),
                _ => {}
            }
        } else {
            self.session.advance(command, now);
        }

        ctx.cls();
        render::draw(ctx, &self.session.snapshot());
    }
}

fn map_key(key: VirtualKeyCode) -> Option<Command> {
    match key {
        VirtualKeyCode::Up | VirtualKeyCode::W | VirtualKeyCode::K => {
            Some(Command::Move(Direction::Up))
        }
        VirtualKeyCode::Down | VirtualKeyCode::S | VirtualKeyCode::J => {
            Some(Command::Move(Direction::Down))
        }
        VirtualKeyCode::Left | VirtualKeyCode::A | VirtualKeyCode::H => {
            Some(Command::Move(Direction::Left))
        }
        VirtualKeyCode::Right | VirtualKeyCode::D | VirtualKeyCode::L => {
            Some(Command::Move(Direction::Right))
        }
        VirtualKeyCode::Return | VirtualKeyCode::P => Some(Command::Confirm),
        VirtualKeyCode::Escape | VirtualKeyCode::Q => Some(Command::Cancel),
        VirtualKeyCode::LShift | VirtualKeyCode::RShift | VirtualKeyCode::F => Some(Command::Dash),
        VirtualKeyCode::Space | VirtualKeyCode::X => Some(Command::Destroy),
        _ => None,
    }
}

fn main() -> BError {
    let script = match env::args().nth(1) {
        Some(path) => Some(ScriptedInput::from_file(path)?),
        None => None,
    };

    let config = SessionConfig::default();
    let session = Session::new(&config, 0)?;

    let context = BTermBuilder::simple(config.map_width, config.map_height)?
        .with_title("CaveDash")
        .build()?;

    let state = CaveDashState {
        session,
        config,
        clock: Instant::now(),
        script,
    };
    main_loop(context, state)
}
