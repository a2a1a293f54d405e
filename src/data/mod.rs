use bracket_terminal::prelude::RGB;

use crate::actors::PowerUpKind;

#[derive(Clone, Debug)]
pub struct PlayerTemplate {
    pub glyph: char,
    pub color: RGB,
    pub move_delay_ms: i64,
}

pub fn player_template() -> PlayerTemplate {
    PlayerTemplate {
        glyph: '@',
        color: RGB::from_u8(80, 220, 220),
        move_delay_ms: 75,
    }
}

#[derive(Clone, Debug)]
pub struct EnemyTemplate {
    pub name: &'static str,
    pub glyph: char,
    pub color: RGB,
    pub move_delay_ms: i64,
}

impl EnemyTemplate {
    fn new(name: &'static str, glyph: char, color: RGB, move_delay_ms: i64) -> Self {
        Self {
            name,
            glyph,
            color,
            move_delay_ms,
        }
    }
}

/// The fixed pack, slowest first. Faster enemies wear hotter colors.
pub fn enemy_roster() -> Vec<EnemyTemplate> {
    vec![
        EnemyTemplate::new("Drifter", '?', RGB::from_u8(96, 165, 255), 350),
        EnemyTemplate::new("Lurker", '$', RGB::from_u8(126, 211, 33), 300),
        EnemyTemplate::new("Stalker", '&', RGB::from_u8(241, 241, 87), 250),
        EnemyTemplate::new("Hunter", '%', RGB::from_u8(255, 170, 64), 200),
        EnemyTemplate::new("Fiend", '#', RGB::from_u8(255, 95, 86), 150),
    ]
}

#[derive(Clone, Debug)]
pub struct PowerUpTemplate {
    pub kind: PowerUpKind,
    pub glyph: char,
    pub color: RGB,
}

pub fn power_up_templates() -> [PowerUpTemplate; 2] {
    [
        PowerUpTemplate {
            kind: PowerUpKind::Dash,
            glyph: '>',
            color: RGB::from_u8(0, 139, 139),
        },
        PowerUpTemplate {
            kind: PowerUpKind::Destroy,
            glyph: 'x',
            color: RGB::from_u8(0, 139, 139),
        },
    ]
}
