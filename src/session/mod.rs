use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use bracket_terminal::prelude::RGB;

use crate::actors::{Actor, Enemy, EnemyStatus, Player, PowerUp, PowerUpKind};
use crate::ai::AStar;
use crate::data;
use crate::map::generator::{self, GenerationError};
use crate::map::{CaveMap, DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH};

const MAX_EVENTS: usize = 6;
const COUNTDOWN_STEP_MS: i64 = 1000;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Confirm,
    Cancel,
    Dash,
    Destroy,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    Paused,
    Running,
    Stopped,
}

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub map_width: i32,
    pub map_height: i32,
    pub room_count: usize,
    pub countdown_secs: i32,
    pub power_ups_per_kind: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            map_width: DEFAULT_MAP_WIDTH,
            map_height: DEFAULT_MAP_HEIGHT,
            room_count: 15,
            countdown_secs: 30,
            power_ups_per_kind: 5,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ActorSnapshot {
    pub pos: Point,
    pub glyph: char,
    pub color: RGB,
}

/// Everything the drawing collaborator needs for one frame. It makes no
/// game-logic decisions of its own.
#[derive(Clone, Debug)]
pub struct RenderSnapshot {
    pub width: i32,
    pub height: i32,
    pub cells: Vec<(char, RGB)>,
    pub actors: Vec<ActorSnapshot>,
    pub countdown: i32,
    pub dashes: u32,
    pub destroys: u32,
    pub state: SessionState,
    pub outcome: Option<&'static str>,
    pub events: Vec<String>,
}

/// One full game: map, actors, countdown, and the tick state machine.
/// A new game is a new Session value.
pub struct Session {
    map: CaveMap,
    player: Player,
    enemies: Vec<Enemy>,
    power_ups: Vec<PowerUp>,
    state: SessionState,
    astar: AStar,
    countdown: i32,
    countdown_timer: i64,
    last_dir: Option<Direction>,
    events: Vec<String>,
}

impl Session {
    pub fn new(config: &SessionConfig, now: i64) -> Result<Self, GenerationError> {
        let mut rng = RandomNumberGenerator::new();
        Self::with_rng(config, &mut rng, now)
    }

    pub fn with_rng(
        config: &SessionConfig,
        rng: &mut RandomNumberGenerator,
        now: i64,
    ) -> Result<Self, GenerationError> {
        let map = generator::generate(
            config.map_width,
            config.map_height,
            config.room_count,
            rng,
        )?;

        let template = data::player_template();
        let mut player = Player::new(
            Actor::new(template.glyph, template.color),
            template.move_delay_ms,
            now,
        );
        player.actor.move_to(map.first_walkable(), &map);

        let mut power_ups = Vec::new();
        for template in data::power_up_templates() {
            for _ in 0..config.power_ups_per_kind {
                let mut actor = Actor::new(template.glyph, template.color);
                actor.move_to(map.random_open_point(rng), &map);
                power_ups.push(PowerUp {
                    kind: template.kind,
                    actor,
                });
            }
        }

        let mut spawn = map.last_walkable();
        let mut enemies = Vec::new();
        for template in data::enemy_roster() {
            let mut enemy = Enemy::new(
                template.name,
                Actor::new(template.glyph, template.color),
                template.move_delay_ms,
                now,
            );
            enemy.actor.move_to(spawn, &map);
            spawn.x -= 1;
            enemies.push(enemy);
        }

        let astar = AStar::new(config.map_width, config.map_height);
        let mut session = Self {
            map,
            player,
            enemies,
            power_ups,
            state: SessionState::Paused,
            astar,
            countdown: config.countdown_secs,
            countdown_timer: now,
            last_dir: None,
            events: Vec::new(),
        };
        session.push_event("Paused. Confirm to descend.");
        Ok(session)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn countdown(&self) -> i32 {
        self.countdown
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    pub fn map(&self) -> &CaveMap {
        &self.map
    }

    /// Win and loss both land in Stopped; surviving the full countdown is
    /// the win.
    pub fn outcome(&self) -> Option<&'static str> {
        if self.state != SessionState::Stopped {
            return None;
        }
        if self.countdown == 0 {
            Some("GAME OVER! YOU WON!")
        } else {
            Some("GAME OVER! YOU LOST!")
        }
    }

    /// Advances one tick of the cooperative loop: player cadence gate,
    /// enemy cadence gates, collision, pickups, countdown.
    pub fn advance(&mut self, command: Option<Command>, now: i64) {
        match command {
            Some(Command::Confirm) => match self.state {
                SessionState::Paused => {
                    self.state = SessionState::Running;
                    self.push_event("The cave stirs.");
                }
                SessionState::Running => {
                    self.state = SessionState::Paused;
                    self.push_event("Paused.");
                }
                SessionState::Stopped => {}
            },
            Some(Command::Cancel) => {
                if self.state != SessionState::Stopped {
                    self.state = SessionState::Stopped;
                    self.push_event("Abandoned the descent.");
                }
            }
            _ => {}
        }

        if self.state != SessionState::Running {
            return;
        }

        self.player_turn(command, now);
        self.enemy_turn(now);

        if self.resolve_collisions() {
            return;
        }
        self.collect_power_up();
        self.tick_countdown(now);
    }

    fn player_turn(&mut self, command: Option<Command>, now: i64) {
        // A repeated direction waits out the cadence; anything else, or an
        // active dash, acts immediately.
        let same_input = match (command, self.last_dir) {
            (Some(Command::Move(dir)), Some(last)) => dir == last,
            (None, None) => true,
            _ => false,
        };
        let gate_open = now >= self.player.move_timer + self.player.move_delay;
        if !gate_open && same_input && !self.player.is_dashing() {
            return;
        }

        if self.player.is_dashing() {
            if let Some(dir) = self.last_dir {
                let (dx, dy) = dir.delta();
                if !self.player.actor.walk(dx, dy, &self.map) {
                    self.player.stop_dash();
                    self.push_event("The dash slams into rock.");
                }
            }
        } else {
            match command {
                Some(Command::Move(dir)) => {
                    let (dx, dy) = dir.delta();
                    self.player.actor.walk(dx, dy, &self.map);
                    self.last_dir = Some(dir);
                }
                Some(Command::Dash) => {
                    if self.player.dash() {
                        self.push_event("Dash!");
                    }
                }
                Some(Command::Destroy) => {
                    if let Some(kills) =
                        self.player.destroy(&mut self.map, &mut self.enemies)
                    {
                        if kills > 0 {
                            self.push_event(format!("The blast takes {kills} down."));
                        } else {
                            self.push_event("The blast levels the cave.");
                        }
                    }
                }
                _ => {}
            }
        }
        self.player.move_timer = now;
    }

    fn enemy_turn(&mut self, now: i64) {
        let goal = self.player.actor.pos;
        for i in 0..self.enemies.len() {
            if !self.enemies[i].actor.is_alive() {
                continue;
            }
            if now < self.enemies[i].move_timer + self.enemies[i].current_delay() {
                continue;
            }
            if self.enemies[i].status() == EnemyStatus::Stunned {
                self.enemies[i].unstun();
            }
            let start = self.enemies[i].actor.pos;
            let path = self.astar.find_path(&self.map, start, goal);
            if let Some(&step) = path.first() {
                self.enemies[i].actor.move_to(step, &self.map);
            }
            self.enemies[i].move_timer = now;
        }
    }

    /// True when the session ended on contact.
    fn resolve_collisions(&mut self) -> bool {
        let player_pos = self.player.actor.pos;
        let dashing = self.player.is_dashing();
        let mut stunned_names = Vec::new();
        for enemy in &mut self.enemies {
            if !enemy.actor.is_alive() || enemy.actor.pos != player_pos {
                continue;
            }
            if dashing {
                enemy.stun();
                stunned_names.push(enemy.name);
            } else if enemy.status() != EnemyStatus::Stunned {
                self.state = SessionState::Stopped;
                let name = enemy.name;
                self.push_event(format!("The {name} catches you."));
                return true;
            }
        }
        for name in stunned_names {
            self.push_event(format!("Dashed through the {name}."));
        }
        false
    }

    fn collect_power_up(&mut self) {
        let player_pos = self.player.actor.pos;
        let mut collected = None;
        for power_up in &mut self.power_ups {
            if !power_up.actor.is_alive() || power_up.actor.pos != player_pos {
                continue;
            }
            match power_up.kind {
                PowerUpKind::Dash => self.player.dashes += 1,
                PowerUpKind::Destroy => self.player.destroys += 1,
            }
            power_up.actor.kill();
            collected = Some(power_up.kind);
            break;
        }
        match collected {
            Some(PowerUpKind::Dash) => self.push_event("Picked up a dash charge."),
            Some(PowerUpKind::Destroy) => self.push_event("Picked up a destroy charge."),
            None => {}
        }
    }

    fn tick_countdown(&mut self, now: i64) {
        if now >= self.countdown_timer + COUNTDOWN_STEP_MS {
            self.countdown -= 1;
            self.countdown_timer = now;
        }
        if self.countdown == 0 {
            self.state = SessionState::Stopped;
            self.push_event("Dawn breaks. You survived.");
        }
    }

    fn push_event<S: Into<String>>(&mut self, entry: S) {
        self.events.insert(0, entry.into());
        self.events.truncate(MAX_EVENTS);
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        let cells = self
            .map
            .cells
            .iter()
            .map(|cell| cell.terrain.appearance())
            .collect();

        let mut actors = Vec::new();
        for power_up in &self.power_ups {
            if power_up.actor.is_alive() {
                actors.push(actor_snapshot(&power_up.actor));
            }
        }
        if self.player.actor.is_alive() {
            actors.push(actor_snapshot(&self.player.actor));
        }
        for enemy in &self.enemies {
            if enemy.actor.is_alive() {
                actors.push(actor_snapshot(&enemy.actor));
            }
        }

        RenderSnapshot {
            width: self.map.width,
            height: self.map.height,
            cells,
            actors,
            countdown: self.countdown,
            dashes: self.player.dashes,
            destroys: self.player.destroys,
            state: self.state,
            outcome: self.outcome(),
            events: self.events.clone(),
        }
    }
}

fn actor_snapshot(actor: &Actor) -> ActorSnapshot {
    ActorSnapshot {
        pos: actor.pos,
        glyph: actor.glyph,
        color: actor.effective_color(),
    }
}
