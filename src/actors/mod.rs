use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::{RED, RGB, WHITE};

use crate::map::{CaveMap, Terrain};

pub const STUN_DELAY_MS: i64 = 2000;
const RAGE_FACTOR: f32 = 0.8;
const DESTROY_RADIUS: i32 = 5;
const FADE_FACTOR: f32 = 0.45;

/// Layered color record: a temporary override beats the faded variant,
/// which beats the base. Only one override slot exists; applying an
/// override while faded drops the fade.
#[derive(Copy, Clone, Debug)]
pub struct ColorState {
    base: RGB,
    faded: bool,
    temporary: Option<RGB>,
}

impl ColorState {
    pub fn new(base: RGB) -> Self {
        Self {
            base,
            faded: false,
            temporary: None,
        }
    }

    pub fn effective(&self) -> RGB {
        if let Some(temporary) = self.temporary {
            temporary
        } else if self.faded {
            RGB::from_f32(
                self.base.r * FADE_FACTOR,
                self.base.g * FADE_FACTOR,
                self.base.b * FADE_FACTOR,
            )
        } else {
            self.base
        }
    }

    pub fn is_faded(&self) -> bool {
        self.faded
    }
}

#[derive(Clone, Debug)]
pub struct Actor {
    pub pos: Point,
    pub glyph: char,
    color: ColorState,
    alive: bool,
}

impl Actor {
    pub fn new(glyph: char, color: RGB) -> Self {
        Self {
            pos: Point::zero(),
            glyph,
            color: ColorState::new(color),
            alive: true,
        }
    }

    pub fn can_walk(&self, x: i32, y: i32, map: &CaveMap) -> bool {
        if !self.alive {
            return false;
        }
        map.in_bounds(x, y) && !map.is_blocking(Point::new(x, y))
    }

    /// Relative step; silently refuses blocked or dead moves.
    pub fn walk(&mut self, dx: i32, dy: i32, map: &CaveMap) -> bool {
        if !self.alive {
            return false;
        }
        let nx = self.pos.x + dx;
        let ny = self.pos.y + dy;
        if self.can_walk(nx, ny, map) {
            self.pos = Point::new(nx, ny);
            return true;
        }
        false
    }

    pub fn move_to(&mut self, target: Point, map: &CaveMap) {
        if !self.alive {
            return;
        }
        if self.can_walk(target.x, target.y, map) {
            self.pos = target;
        }
    }

    pub fn fade(&mut self) {
        if !self.alive {
            return;
        }
        self.color.faded = true;
    }

    pub fn unfade(&mut self) {
        if !self.alive {
            return;
        }
        self.color.faded = false;
    }

    pub fn change_color(&mut self, color: RGB) {
        if !self.alive {
            return;
        }
        self.color.temporary = Some(color);
        self.color.faded = false;
    }

    pub fn revert_color(&mut self) {
        if !self.alive {
            return;
        }
        self.color.temporary = None;
    }

    /// Replaces the base outright; rage transfer uses this, and it applies
    /// even to a dead actor so the roster keeps its final colors.
    pub fn set_base_color(&mut self, color: RGB) {
        self.color.base = color;
    }

    pub fn effective_color(&self) -> RGB {
        self.color.effective()
    }

    pub fn is_faded(&self) -> bool {
        self.color.is_faded()
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }

    pub fn revive(&mut self) {
        self.alive = true;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PowerUpKind {
    Dash,
    Destroy,
}

#[derive(Clone, Debug)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub actor: Actor,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EnemyStatus {
    Normal,
    Stunned,
    Raged,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub name: &'static str,
    pub actor: Actor,
    pub move_timer: i64,
    base_delay: i64,
    stunned: bool,
    raged: bool,
}

impl Enemy {
    pub fn new(name: &'static str, actor: Actor, move_delay: i64, now: i64) -> Self {
        Self {
            name,
            actor,
            move_timer: now,
            base_delay: move_delay,
            stunned: false,
            raged: false,
        }
    }

    /// Stun beats rage when both apply.
    pub fn status(&self) -> EnemyStatus {
        if self.stunned {
            EnemyStatus::Stunned
        } else if self.raged {
            EnemyStatus::Raged
        } else {
            EnemyStatus::Normal
        }
    }

    pub fn current_delay(&self) -> i64 {
        if self.stunned {
            STUN_DELAY_MS
        } else {
            self.base_delay
        }
    }

    pub fn base_delay(&self) -> i64 {
        self.base_delay
    }

    pub fn stun(&mut self) {
        self.actor.fade();
        self.stunned = true;
    }

    pub fn unstun(&mut self) {
        self.actor.unfade();
        self.stunned = false;
    }

    /// Permanent cadence boost plus a color transfer from the enemy that
    /// just died. Ignored while stunned; a rage taken before the stun is
    /// already baked into the base delay and survives the unstun.
    pub fn rage(&mut self, color: RGB) {
        if self.stunned {
            return;
        }
        self.base_delay = (self.base_delay as f32 * RAGE_FACTOR) as i64;
        self.actor.set_base_color(color);
        self.raged = true;
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub actor: Actor,
    pub move_delay: i64,
    pub move_timer: i64,
    pub dashes: u32,
    pub destroys: u32,
    dashing: bool,
}

impl Player {
    pub fn new(actor: Actor, move_delay: i64, now: i64) -> Self {
        Self {
            actor,
            move_delay,
            move_timer: now,
            dashes: 0,
            destroys: 0,
            dashing: false,
        }
    }

    pub fn is_dashing(&self) -> bool {
        self.dashing
    }

    /// Spends a charge and starts the dash; does nothing at zero charges.
    pub fn dash(&mut self) -> bool {
        if self.dashes == 0 {
            return false;
        }
        self.actor.change_color(RGB::named(WHITE));
        self.dashing = true;
        self.dashes -= 1;
        true
    }

    pub fn stop_dash(&mut self) {
        self.actor.revert_color();
        self.dashing = false;
    }

    /// Bombs an 11x11 box around the player, killing any enemy caught in
    /// it. Every other living enemy rages once per kill, compounding
    /// within a single activation. Returns the kill count, or None when
    /// no charge was available.
    pub fn destroy(&mut self, map: &mut CaveMap, enemies: &mut [Enemy]) -> Option<u32> {
        if self.destroys == 0 {
            return None;
        }
        self.actor.change_color(RGB::named(RED));
        let pos = self.actor.pos;
        let mut kills = 0;
        for dx in -DESTROY_RADIUS..=DESTROY_RADIUS {
            for dy in -DESTROY_RADIUS..=DESTROY_RADIUS {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let target = Point::new(pos.x + dx, pos.y + dy);
                if map.in_bounds(target.x, target.y) {
                    map.carve_point(target, Terrain::Bombed);
                }
                for victim in 0..enemies.len() {
                    if !enemies[victim].actor.is_alive() || enemies[victim].actor.pos != target {
                        continue;
                    }
                    enemies[victim].actor.kill();
                    kills += 1;
                    let transfer = enemies[victim].actor.effective_color();
                    for (other, enemy) in enemies.iter_mut().enumerate() {
                        if other != victim && enemy.actor.is_alive() {
                            enemy.rage(transfer);
                        }
                    }
                }
            }
        }
        self.actor.revert_color();
        self.destroys -= 1;
        Some(kills)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bracket_geometry::prelude::Rect;

    fn open_map() -> CaveMap {
        let mut map = CaveMap::solid_rock(30, 30);
        map.dig(Rect::with_exact(1, 1, 29, 29), Terrain::Cave);
        map
    }

    fn enemy_at(x: i32, y: i32, delay: i64) -> Enemy {
        let mut actor = Actor::new('e', RGB::from_u8(90, 200, 90));
        actor.pos = Point::new(x, y);
        Enemy::new("test dummy", actor, delay, 0)
    }

    #[test]
    fn dead_actor_refuses_movement() {
        let map = open_map();
        let mut actor = Actor::new('@', RGB::from_u8(90, 220, 220));
        actor.pos = Point::new(5, 5);
        actor.kill();
        assert!(!actor.walk(1, 0, &map));
        actor.move_to(Point::new(6, 5), &map);
        assert_eq!(actor.pos, Point::new(5, 5));
        assert!(!actor.is_alive());

        actor.revive();
        assert!(actor.walk(1, 0, &map));
        assert_eq!(actor.pos, Point::new(6, 5));
    }

    #[test]
    fn walk_refuses_blocked_cells() {
        let mut map = open_map();
        map.cells[(5 * map.width + 6) as usize].blocking = true;
        let mut actor = Actor::new('@', RGB::from_u8(90, 220, 220));
        actor.pos = Point::new(5, 5);
        assert!(!actor.walk(1, 0, &map));
        assert_eq!(actor.pos, Point::new(5, 5));
        assert!(actor.walk(0, 1, &map));
        assert_eq!(actor.pos, Point::new(5, 6));
    }

    #[test]
    fn override_beats_fade_and_drops_it() {
        let base = RGB::from_u8(100, 100, 200);
        let mut actor = Actor::new('e', base);
        actor.fade();
        assert_ne!(actor.effective_color(), base);
        let flash = RGB::named(WHITE);
        actor.change_color(flash);
        assert_eq!(actor.effective_color(), flash);
        // The fade was lost when the override landed.
        actor.revert_color();
        assert_eq!(actor.effective_color(), base);
        assert!(!actor.is_faded());
    }

    #[test]
    fn zero_charge_dash_changes_nothing() {
        let base = RGB::from_u8(90, 220, 220);
        let mut player = Player::new(Actor::new('@', base), 75, 0);
        assert!(!player.dash());
        assert_eq!(player.dashes, 0);
        assert!(!player.is_dashing());
        assert_eq!(player.actor.effective_color(), base);
    }

    #[test]
    fn dash_spends_a_charge_and_stop_reverts() {
        let base = RGB::from_u8(90, 220, 220);
        let mut player = Player::new(Actor::new('@', base), 75, 0);
        player.dashes = 2;
        assert!(player.dash());
        assert_eq!(player.dashes, 1);
        assert!(player.is_dashing());
        assert_eq!(player.actor.effective_color(), RGB::named(WHITE));
        player.stop_dash();
        assert!(!player.is_dashing());
        assert_eq!(player.actor.effective_color(), base);
    }

    #[test]
    fn destroy_kills_inside_and_rages_outside() {
        let mut map = open_map();
        let mut player = Player::new(Actor::new('@', RGB::from_u8(90, 220, 220)), 75, 0);
        player.actor.pos = Point::new(5, 5);
        player.destroys = 1;
        let mut enemies = vec![enemy_at(6, 6, 350), enemy_at(20, 20, 300)];

        let kills = player.destroy(&mut map, &mut enemies);
        assert_eq!(kills, Some(1));
        assert!(!enemies[0].actor.is_alive());
        assert!(enemies[1].actor.is_alive());
        assert_eq!(enemies[1].base_delay(), 240);
        assert_eq!(enemies[1].status(), EnemyStatus::Raged);
        assert_eq!(player.destroys, 0);

        let cell = map.cell_at(Point::new(6, 6)).unwrap();
        assert_eq!(cell.terrain, Terrain::Bombed);
        assert!(!cell.blocking);
    }

    #[test]
    fn destroy_without_charges_is_inert() {
        let mut map = open_map();
        let mut player = Player::new(Actor::new('@', RGB::from_u8(90, 220, 220)), 75, 0);
        player.actor.pos = Point::new(5, 5);
        let mut enemies = vec![enemy_at(6, 6, 350)];
        assert_eq!(player.destroy(&mut map, &mut enemies), None);
        assert!(enemies[0].actor.is_alive());
        assert_ne!(map.cell_at(Point::new(6, 6)).unwrap().terrain, Terrain::Bombed);
    }

    #[test]
    fn rage_compounds_per_kill() {
        let mut enemy = enemy_at(3, 3, 350);
        let transfer = RGB::from_u8(255, 95, 86);
        enemy.rage(transfer);
        assert_eq!(enemy.base_delay(), 280);
        enemy.rage(transfer);
        assert_eq!(enemy.base_delay(), 224);
        assert_eq!(enemy.status(), EnemyStatus::Raged);
        assert_eq!(enemy.actor.effective_color(), transfer);
    }

    #[test]
    fn stun_overrides_rage_and_blocks_new_rage() {
        let mut enemy = enemy_at(3, 3, 350);
        enemy.rage(RGB::from_u8(255, 95, 86));
        assert_eq!(enemy.base_delay(), 280);

        enemy.stun();
        assert_eq!(enemy.status(), EnemyStatus::Stunned);
        assert_eq!(enemy.current_delay(), STUN_DELAY_MS);
        assert!(enemy.actor.is_faded());

        // Rage landing mid-stun is dropped entirely.
        enemy.rage(RGB::from_u8(90, 200, 90));
        assert_eq!(enemy.base_delay(), 280);

        enemy.unstun();
        assert_eq!(enemy.status(), EnemyStatus::Raged);
        assert_eq!(enemy.current_delay(), 280);
        assert!(!enemy.actor.is_faded());
    }
}
