//! Characters and the player's resources.
//!
//! Combat only reaches outside itself through two collaborator traits: the
//! resource store (stamina in, credits and story progress out) and the roster
//! provider. Battle units are copies; nothing that happens in a battle writes
//! back to a [`CharacterTemplate`].

use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::config::BASIC_ATTACK_RADIUS;
use crate::types::{EffectKind, Position, Side, Skill, Unit, UnitId};

/// Player resource store consumed by combat
pub trait PlayerResources {
    fn stamina(&self) -> u32;
    /// Remove `amount` stamina; returns false and changes nothing if short
    fn deduct_stamina(&mut self, amount: u32) -> bool;
    fn grant_credits(&mut self, amount: u32);
    /// Move the story marker forward to `chapter`
    fn advance_chapter(&mut self, chapter: u32);
}

/// Source of the characters a player can field
pub trait RosterProvider {
    fn owned_characters(&self) -> Vec<CharacterTemplate>;
}

/// Persistent stats of a collectible character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterTemplate {
    pub id: String,
    pub name: String,
    pub role: String,
    pub rarity: u8,
    pub hp: i32,
    pub atk: i32,
    pub def: i32,
    pub spd: i32,
    pub skills: Vec<Skill>,
    pub image: Option<String>,
    pub owned: bool,
}

impl CharacterTemplate {
    #[allow(clippy::too_many_arguments)]
    pub fn new(id: &str, name: &str, role: &str, rarity: u8, hp: i32, atk: i32, def: i32, spd: i32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            rarity,
            hp,
            atk,
            def,
            spd,
            skills: Vec::new(),
            image: None,
            owned: true,
        }
    }

    pub fn with_skill(mut self, skill: Skill) -> Self {
        self.skills.push(skill);
        self
    }

    pub fn with_image(mut self, image: &str) -> Self {
        self.image = Some(image.to_string());
        self
    }

    pub fn unowned(mut self) -> Self {
        self.owned = false;
        self
    }

    /// Fresh battle copy: full hp, basic attack first, then the character's skills
    pub fn to_unit(&self, position: Position) -> Unit {
        let mut skills = vec![Skill::basic_attack()];
        skills.extend(self.skills.iter().cloned().map(|mut s| {
            s.cooldown_remaining = 0;
            s
        }));
        Unit {
            id: UnitId(0),
            name: self.name.clone(),
            side: Side::Player,
            hp: self.hp,
            max_hp: self.hp,
            atk: self.atk,
            def: self.def,
            spd: self.spd,
            position,
            skills,
            moved: false,
            attacked: false,
            buffs: Vec::new(),
            phase: None,
        }
    }
}

/// The cast available at the start of a new game
pub fn starter_roster() -> Vec<CharacterTemplate> {
    vec![
        CharacterTemplate::new("maya", "Maya", "Support", 3, 600, 120, 80, 6)
            .with_skill(Skill::new("Inspiration", EffectKind::TeamBuffAtk, 3, 1))
            .with_image("https://static.wikia.nocookie.net/ongezellig/images/f/fa/Mayahome.png"),
        CharacterTemplate::new("coco", "Coco", "Attacker", 4, 750, 180, 60, 8)
            .with_skill(Skill::new("Power Strike", EffectKind::AreaAroundTarget, 4, 2))
            .with_image("https://static.wikia.nocookie.net/ongezellig/images/7/79/Cocohome.png"),
        CharacterTemplate::new("mymy", "Mymy", "Tank", 5, 900, 100, 120, 4)
            .with_skill(Skill::new("Historical Defense", EffectKind::TeamBuffDef, 5, 1))
            .with_image("https://static.wikia.nocookie.net/ongezellig/images/4/42/Mymyhome.png"),
        CharacterTemplate::new("vera", "Vera Persijn", "Support", 4, 550, 110, 70, 7)
            .with_skill(Skill::new("Guidance", EffectKind::TeamCooldownReduction, 4, 1))
            .with_image("https://static.wikia.nocookie.net/ongezellig/images/1/1c/Verahome.png"),
        CharacterTemplate::new("kiki", "Kiki", "Attacker", 4, 680, 200, 50, 9)
            .with_skill(Skill::new("Pirate's Cutlass", EffectKind::SingleTarget, 3, BASIC_ATTACK_RADIUS))
            .unowned(),
    ]
}

fn enemy(name: &str, hp: i32, atk: i32, def: i32, spd: i32, position: Position, skills: Vec<Skill>) -> Unit {
    Unit {
        id: UnitId(0),
        name: name.to_string(),
        side: Side::Enemy,
        hp,
        max_hp: hp,
        atk,
        def,
        spd,
        position,
        skills,
        moved: false,
        attacked: false,
        buffs: Vec::new(),
        phase: None,
    }
}

/// The fixed Studio Massa encounter: the boss and two escorts
pub fn boss_encounter() -> Vec<Unit> {
    let mut boss = enemy(
        "Studio Massa",
        1200,
        150,
        100,
        5,
        Position::new(0, 2),
        vec![
            Skill::new("Deadline Crunch", EffectKind::SingleTarget, 4, 1),
            Skill::new("Last Gasp", EffectKind::AreaAroundTarget, 5, 1),
            Skill::new("Budget Cuts", EffectKind::SingleTarget, 3, 1),
            Skill::basic_attack(),
        ],
    );
    boss.phase = Some(1);
    let minion = |col| {
        enemy(
            "Minion",
            300,
            80,
            50,
            4,
            Position::new(1, col),
            vec![Skill::new("Attack", EffectKind::SingleTarget, 0, 1)],
        )
    };
    vec![boss, minion(1), minion(3)]
}

/// In-memory player profile: resources, story marker and collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub level: u32,
    pub gems: u32,
    pub credits: u32,
    pub stamina: u32,
    pub max_stamina: u32,
    pub current_chapter: u32,
    pub characters: Vec<CharacterTemplate>,
}

impl PlayerProfile {
    pub fn new() -> Self {
        Self {
            level: 1,
            gems: 1500,
            credits: 5000,
            stamina: 100,
            max_stamina: 100,
            current_chapter: 1,
            characters: starter_roster(),
        }
    }

    /// Refill stamina, capped at the maximum
    pub fn restore_stamina(&mut self, amount: u32) {
        self.stamina = self.stamina.saturating_add(amount).min(self.max_stamina);
    }
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerResources for PlayerProfile {
    fn stamina(&self) -> u32 {
        self.stamina
    }

    fn deduct_stamina(&mut self, amount: u32) -> bool {
        match self.stamina.checked_sub(amount) {
            Some(rest) => {
                self.stamina = rest;
                true
            }
            None => false,
        }
    }

    fn grant_credits(&mut self, amount: u32) {
        self.credits = self.credits.saturating_add(amount);
    }

    fn advance_chapter(&mut self, chapter: u32) {
        self.current_chapter = self.current_chapter.max(chapter);
    }
}

impl RosterProvider for PlayerProfile {
    fn owned_characters(&self) -> Vec<CharacterTemplate> {
        self.characters.iter().filter(|c| c.owned).cloned().collect()
    }
}
