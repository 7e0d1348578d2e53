//! The turn engine.
//!
//! A [`CombatSession`] is created when the player picks a fight and lives
//! until it reaches a terminal [`CombatResult`]. Initiative is rolled once.
//! Each [`CombatSession::process_turn`] call advances exactly one actor: the
//! player's slot needs a [`PlayerAction`], every other slot resolves through
//! the enemy AI. After each full lap the session ticks status effects,
//! counts down skill cooldowns and drops defeated or departed enemies from
//! the order.
//!
//! The session owns no game state. Everything it reads or mutates comes in
//! through a [`CombatContext`] built by the host for each call.

use std::collections::{BTreeMap, BTreeSet};

use rand::prelude::*;

use super::math::{self, AttackOutcome, DefenseOutcome};
use super::types::{CombatResult, InitiativeEntry, Participant, PlayerAction, Skill};
use crate::core::config::EngineConfig;
use crate::core::constants::*;
use crate::core::error::CombatError;
use crate::core::events::{EventSink, GameEvent, Tone};
use crate::effects::{StatusEffectKind, StatusEffectManager};
use crate::enemies::{berserker_multiplier, decide_action, EnemyAction, EnemyId, EnemyRoster, SpecialEffect};
use crate::entity::{Buff, Combatant, Player};
use crate::items::ItemCatalog;
use crate::loot::{LootDrop, LootGenerator};
use crate::world::{open_neighbors, Environment, World};

/// Borrowed handles to everything a combat turn can touch.
pub struct CombatContext<'a, R> {
    pub player: &'a mut Player,
    pub effects: &'a mut StatusEffectManager,
    pub roster: &'a mut EnemyRoster,
    pub world: &'a mut dyn World,
    pub env: &'a Environment,
    pub loot: &'a LootGenerator,
    pub catalog: &'a ItemCatalog,
    pub config: &'a EngineConfig,
    pub events: &'a mut dyn EventSink,
    pub rng: &'a mut R,
    pub now: f64,
}

#[derive(Debug, Clone)]
pub struct CombatSession {
    room: String,
    initiative: Vec<InitiativeEntry>,
    current: usize,
    turn_count: u32,
    result: CombatResult,
    /// Enemy the player last swung at.
    target: Option<EnemyId>,
    cooldowns: BTreeMap<Skill, u32>,
    damage_dealt: BTreeMap<EnemyId, u32>,
    damage_taken: BTreeMap<EnemyId, u32>,
    last_attacker: Option<String>,
    /// Whether the most recent enemy to leave the fight ran rather than died.
    last_enemy_fled: bool,
}

fn participant_active(room: &str, participant: Participant, roster: &EnemyRoster) -> bool {
    match participant {
        Participant::Player => true,
        Participant::Enemy(id) => roster
            .get(id)
            .map_or(false, |e| e.is_alive() && e.current_room == room),
    }
}

impl CombatSession {
    /// Starts a fight with every living enemy in the player's room and rolls
    /// initiative. Ties keep roll order, so the player wins ties.
    pub fn start<R: Rng>(ctx: &mut CombatContext<'_, R>) -> Result<Self, CombatError> {
        let room = ctx.player.current_room.clone();
        let enemies = ctx.roster.alive_in_room(&room);
        if enemies.is_empty() {
            return Err(CombatError::NoEnemies);
        }

        let mut initiative = Vec::with_capacity(enemies.len() + 1);
        initiative.push(InitiativeEntry {
            participant: Participant::Player,
            roll: math::roll_initiative(ctx.player.initiative_bonus, &mut *ctx.rng),
        });
        for id in enemies {
            let bonus = ctx.roster.get(id).map_or(0, |e| e.initiative_bonus);
            initiative.push(InitiativeEntry {
                participant: Participant::Enemy(id),
                roll: math::roll_initiative(bonus, &mut *ctx.rng),
            });
        }
        initiative.sort_by(|a, b| b.roll.cmp(&a.roll));

        let session = Self {
            room,
            initiative,
            current: 0,
            turn_count: 0,
            result: CombatResult::Ongoing,
            target: None,
            cooldowns: BTreeMap::new(),
            damage_dealt: BTreeMap::new(),
            damage_taken: BTreeMap::new(),
            last_attacker: None,
            last_enemy_fled: false,
        };

        let order: Vec<String> = session
            .initiative
            .iter()
            .map(|entry| session.label(entry.participant, ctx.roster))
            .collect();
        log::debug!("combat in {}: {:?}", session.room, session.initiative);
        ctx.events
            .say(format!("Combat begins! Turn order: {}.", order.join(", ")), Tone::Warning);
        Ok(session)
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn result(&self) -> CombatResult {
        self.result
    }

    /// Completed laps of the initiative order.
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn initiative(&self) -> &[InitiativeEntry] {
        &self.initiative
    }

    pub fn current_actor(&self) -> Option<Participant> {
        if self.result.is_terminal() {
            return None;
        }
        self.initiative.get(self.current).map(|e| e.participant)
    }

    pub fn is_player_turn(&self) -> bool {
        self.current_actor() == Some(Participant::Player)
    }

    /// Every enemy in the initiative order, for keeping the roster's
    /// wandering logic away from them.
    pub fn engaged(&self) -> BTreeSet<EnemyId> {
        self.initiative
            .iter()
            .filter_map(|e| match e.participant {
                Participant::Enemy(id) => Some(id),
                Participant::Player => None,
            })
            .collect()
    }

    /// Enemies still alive and still in the fight's room.
    pub fn active_enemies(&self, roster: &EnemyRoster) -> Vec<EnemyId> {
        self.engaged()
            .into_iter()
            .filter(|id| participant_active(&self.room, Participant::Enemy(*id), roster))
            .collect()
    }

    /// Laps left before `skill` can be used again.
    pub fn cooldown(&self, skill: Skill) -> u32 {
        self.cooldowns.get(&skill).copied().unwrap_or(0)
    }

    pub fn damage_dealt_to(&self, id: EnemyId) -> u32 {
        self.damage_dealt.get(&id).copied().unwrap_or(0)
    }

    pub fn damage_taken_from(&self, id: EnemyId) -> u32 {
        self.damage_taken.get(&id).copied().unwrap_or(0)
    }

    /// Adds a newcomer to the end of the order. It acts at the end of the
    /// current lap.
    pub fn add_enemy<R: Rng>(&mut self, id: EnemyId, ctx: &mut CombatContext<'_, R>) -> Result<(), CombatError> {
        if self.result.is_terminal() {
            return Err(CombatError::SessionOver);
        }
        if !participant_active(&self.room, Participant::Enemy(id), ctx.roster) {
            return Err(CombatError::TargetNotInCombat(id));
        }
        if self.engaged().contains(&id) {
            return Ok(());
        }
        let bonus = ctx.roster.get(id).map_or(0, |e| e.initiative_bonus);
        self.initiative.push(InitiativeEntry {
            participant: Participant::Enemy(id),
            roll: math::roll_initiative(bonus, &mut *ctx.rng),
        });
        let name = self.label(Participant::Enemy(id), ctx.roster);
        ctx.events.say(format!("The {name} joins the fight!"), Tone::Warning);
        Ok(())
    }

    /// Advances exactly one actor.
    ///
    /// `action` must be `Some` on the player's slot and `None` on an enemy's.
    /// A rejected command returns an error and leaves the session and the
    /// world untouched.
    pub fn process_turn<R: Rng>(
        &mut self,
        action: Option<PlayerAction>,
        ctx: &mut CombatContext<'_, R>,
    ) -> Result<CombatResult, CombatError> {
        let Some(actor) = self.current_actor() else {
            return Err(CombatError::SessionOver);
        };

        match (actor, action) {
            (Participant::Player, None) => return Err(CombatError::AwaitingPlayerAction),
            (Participant::Enemy(_), Some(_)) => return Err(CombatError::NotPlayersTurn),
            (Participant::Player, Some(action)) => self.player_turn(action, ctx)?,
            (Participant::Enemy(id), None) => self.enemy_turn(id, ctx),
        }

        let cause = self.defeat_cause();
        self.check_outcome(ctx, cause);
        if !self.result.is_terminal() {
            self.advance(ctx);
        }
        Ok(self.result)
    }

    /// Resolves enemy slots until the player is up or the fight ends.
    pub fn run_until_player_turn<R: Rng>(&mut self, ctx: &mut CombatContext<'_, R>) -> CombatResult {
        while self.current_actor().is_some() && !self.is_player_turn() {
            if self.process_turn(None, ctx).is_err() {
                break;
            }
        }
        self.result
    }

    /// The player's command followed by every enemy turn up to the player's
    /// next slot.
    pub fn act<R: Rng>(
        &mut self,
        action: PlayerAction,
        ctx: &mut CombatContext<'_, R>,
    ) -> Result<CombatResult, CombatError> {
        self.process_turn(Some(action), ctx)?;
        Ok(self.run_until_player_turn(ctx))
    }

    fn label(&self, participant: Participant, roster: &EnemyRoster) -> String {
        match participant {
            Participant::Player => "you".to_string(),
            Participant::Enemy(id) => roster
                .get(id)
                .map_or_else(|| format!("enemy {id}"), |e| e.name().to_string()),
        }
    }

    fn defeat_cause(&self) -> String {
        match &self.last_attacker {
            Some(name) => format!("Slain by the {name}"),
            None => "Succumbed to your wounds".to_string(),
        }
    }

    fn check_outcome<R: Rng>(&mut self, ctx: &mut CombatContext<'_, R>, cause: String) {
        if self.result.is_terminal() {
            return;
        }
        if !ctx.player.is_alive() {
            self.result = CombatResult::PlayerDefeat;
            log::debug!("player defeated in {}: {cause}", self.room);
            ctx.events.say("You have been defeated...", Tone::Danger);
            ctx.events.emit(GameEvent::GameOver { cause });
            return;
        }
        if self.active_enemies(ctx.roster).is_empty() {
            if self.last_enemy_fled {
                self.result = CombatResult::EnemyFled;
                ctx.events.say("Your foe has fled. The fight is over.", Tone::Info);
            } else {
                self.result = CombatResult::PlayerVictory;
                ctx.events.say("Victory!", Tone::Success);
            }
        }
    }

    fn advance<R: Rng>(&mut self, ctx: &mut CombatContext<'_, R>) {
        loop {
            self.current += 1;
            if self.current >= self.initiative.len() {
                self.end_lap(ctx);
                if self.result.is_terminal() {
                    return;
                }
            }
            let participant = self.initiative[self.current].participant;
            if participant_active(&self.room, participant, ctx.roster) {
                return;
            }
        }
    }

    /// Housekeeping after every actor has had a slot.
    fn end_lap<R: Rng>(&mut self, ctx: &mut CombatContext<'_, R>) {
        self.turn_count += 1;
        self.current = 0;

        ctx.effects.update(ctx.now, &mut *ctx.player, &mut *ctx.events);
        ctx.player.entity.prune_buffs(ctx.now);

        self.cooldowns.retain(|_, laps| {
            *laps = laps.saturating_sub(1);
            *laps > 0
        });

        let room = &self.room;
        let roster = &*ctx.roster;
        self.initiative
            .retain(|e| participant_active(room, e.participant, roster));
        for id in self.engaged() {
            if let Some(enemy) = ctx.roster.get_mut(id) {
                enemy.entity.prune_buffs(ctx.now);
            }
        }
        log::trace!("lap {} done, {} in order", self.turn_count, self.initiative.len());

        self.check_outcome(ctx, "Succumbed to your wounds".to_string());
    }

    fn player_turn<R: Rng>(&mut self, action: PlayerAction, ctx: &mut CombatContext<'_, R>) -> Result<(), CombatError> {
        match action {
            PlayerAction::Attack(id) => {
                if !self.engaged().contains(&id) || !participant_active(&self.room, Participant::Enemy(id), ctx.roster) {
                    return Err(CombatError::TargetNotInCombat(id));
                }
                self.target = Some(id);
                self.player_attack(id, 0.0, 1.0, ctx);
            }
            PlayerAction::UseItem(item_id) => self.use_item(&item_id, ctx)?,
            PlayerAction::UseSkill(skill) => self.use_skill(skill, ctx)?,
            PlayerAction::Flee => self.attempt_flee(ctx),
        }
        Ok(())
    }

    fn current_target(&self, roster: &EnemyRoster) -> Option<EnemyId> {
        let active = self.active_enemies(roster);
        self.target
            .filter(|id| active.contains(id))
            .or_else(|| {
                self.initiative.iter().find_map(|e| match e.participant {
                    Participant::Enemy(id) if active.contains(&id) => Some(id),
                    _ => None,
                })
            })
    }

    fn player_attack<R: Rng>(
        &mut self,
        id: EnemyId,
        accuracy_penalty: f64,
        damage_multiplier: f64,
        ctx: &mut CombatContext<'_, R>,
    ) {
        let attack_power = ctx.player.attack_power(ctx.now);
        let outcome = math::resolve_player_attack(
            attack_power,
            accuracy_penalty,
            damage_multiplier,
            &ctx.config.combat,
            ctx.env,
            &mut *ctx.rng,
        );
        let Some(enemy) = ctx.roster.get_mut(id) else {
            return;
        };

        match outcome {
            AttackOutcome::Miss => {
                ctx.events.say(format!("You miss the {}.", enemy.name()), Tone::Info);
            }
            AttackOutcome::Hit { damage, is_crit } => {
                let before = enemy.entity.health;
                let dealt = enemy.take_damage(damage, ctx.now);
                *self.damage_dealt.entry(id).or_insert(0) += (before - enemy.entity.health) as u32;
                let crit = if is_crit { "Critical hit! " } else { "" };
                ctx.events.say(
                    format!(
                        "{crit}You hit the {} for {dealt} damage. ({}/{})",
                        enemy.name(),
                        enemy.entity.health,
                        enemy.entity.max_health
                    ),
                    Tone::Success,
                );
                if !enemy.is_alive() {
                    self.enemy_defeated(id, ctx);
                }
            }
        }
    }

    fn enemy_defeated<R: Rng>(&mut self, id: EnemyId, ctx: &mut CombatContext<'_, R>) {
        let Some(enemy) = ctx.roster.get_mut(id) else {
            return;
        };
        enemy.mark_dead(ctx.now);
        self.last_enemy_fled = false;

        let Some(enemy) = ctx.roster.get(id) else {
            return;
        };
        let name = enemy.name().to_string();
        let experience = enemy.experience;
        let drop = ctx.loot.generate_for(enemy, ctx.player, &mut *ctx.rng);

        ctx.events.say(format!("You defeated the {name}!"), Tone::Success);
        ctx.events.emit(GameEvent::EnemyDefeated {
            enemy_name: name.clone(),
            damage_dealt: self.damage_dealt_to(id),
            damage_taken: self.damage_taken_from(id),
            experience,
        });

        if experience > 0 {
            let before = ctx.player.level();
            let levels = ctx.player.gain_experience(experience as u64);
            ctx.events.say(format!("You gain {experience} experience."), Tone::Info);
            for level in before + 1..=before + levels {
                ctx.events.emit(GameEvent::LevelUp { level });
                ctx.events.say(format!("You reached level {level}!"), Tone::Success);
            }
        }

        self.distribute_loot(&name, drop, ctx);
        log::debug!("{name} {id} defeated, {experience} xp");
    }

    /// Coins go straight to the player; items land on the room's floor.
    fn distribute_loot<R: Rng>(&self, enemy_name: &str, drop: LootDrop, ctx: &mut CombatContext<'_, R>) {
        if drop.is_empty() {
            return;
        }
        ctx.player.coins += drop.coins;
        for stack in &drop.items {
            ctx.world.add_item(&self.room, &stack.item_id, stack.quantity);
        }

        let mut parts = Vec::new();
        if drop.coins > 0 {
            parts.push(format!("{} coins", drop.coins));
        }
        for stack in &drop.items {
            let name = ctx.catalog.display_name(&stack.item_id);
            if stack.quantity == 1 {
                parts.push(name.to_string());
            } else {
                parts.push(format!("{name} x{}", stack.quantity));
            }
        }
        ctx.events
            .say(format!("The {enemy_name} dropped: {}.", parts.join(", ")), Tone::Loot);
        ctx.events.emit(GameEvent::LootDropped {
            enemy_name: enemy_name.to_string(),
            coins: drop.coins,
            items: drop.items,
        });
    }

    fn use_item<R: Rng>(&mut self, item_id: &str, ctx: &mut CombatContext<'_, R>) -> Result<(), CombatError> {
        let catalog: &ItemCatalog = ctx.catalog;
        let item = catalog
            .get(item_id)
            .ok_or_else(|| CombatError::UnknownItem(item_id.to_string()))?;
        if !ctx.player.inventory.contains(item_id) {
            return Err(CombatError::ItemNotInInventory(item.name.clone()));
        }
        let usable = item
            .as_usable()
            .ok_or_else(|| CombatError::ItemNotUsable(item.name.clone()))?;

        ctx.player.inventory.remove(item_id, 1);
        let (message, tone) = usable.apply(ctx.player, ctx.effects, ctx.now);
        ctx.events.say(format!("You use the {}. {message}", item.name), tone);
        Ok(())
    }

    fn use_skill<R: Rng>(&mut self, skill: Skill, ctx: &mut CombatContext<'_, R>) -> Result<(), CombatError> {
        let laps = self.cooldown(skill);
        if laps > 0 {
            return Err(CombatError::SkillOnCooldown {
                skill: skill.name(),
                laps,
            });
        }

        match skill {
            Skill::PowerStrike => {
                let target = self.current_target(ctx.roster).ok_or(CombatError::NoEnemies)?;
                self.target = Some(target);
                ctx.events.say("You put your whole weight behind a Power Strike!", Tone::Info);
                self.player_attack(target, POWER_STRIKE_ACCURACY_PENALTY, POWER_STRIKE_MULTIPLIER, ctx);
            }
            Skill::SecondWind => {
                let entity = &mut ctx.player.entity;
                let amount = (entity.max_health as f64 * SECOND_WIND_HEAL_FRACTION).round() as i32;
                let healed = entity.heal(amount);
                ctx.events.say(
                    format!(
                        "You catch your second wind and recover {healed} health. ({}/{})",
                        entity.health, entity.max_health
                    ),
                    Tone::Success,
                );
            }
            Skill::Focus => {
                ctx.player
                    .entity
                    .add_buff(Buff::new(FOCUS_ATTACK_BONUS, 0, ctx.now + FOCUS_DURATION_SECONDS));
                ctx.events.say("You steady your breathing and focus.", Tone::Success);
            }
        }

        self.cooldowns.insert(skill, skill.cooldown());
        Ok(())
    }

    /// A failed or impossible flee still uses up the turn.
    fn attempt_flee<R: Rng>(&mut self, ctx: &mut CombatContext<'_, R>) {
        let exits = open_neighbors(&*ctx.world, &self.room);
        if exits.is_empty() {
            ctx.events.say("There's nowhere to run!", Tone::Warning);
            return;
        }

        let pursuer = self
            .active_enemies(ctx.roster)
            .into_iter()
            .filter_map(|id| ctx.roster.get(id))
            .map(|e| e.ai_type.flee_modifier())
            .reduce(f64::min)
            .unwrap_or(0.0);
        let chance = math::flee_chance(&ctx.config.combat, ctx.env, pursuer);

        if !ctx.rng.gen_bool(chance) {
            ctx.events.say("You try to flee but can't get away!", Tone::Warning);
            return;
        }
        if let Some(destination) = exits.choose(&mut *ctx.rng) {
            ctx.player.current_room = destination.clone();
        }
        self.result = CombatResult::PlayerFled;
        log::debug!("player fled {} to {}", self.room, ctx.player.current_room);
        ctx.events.say("You escape!", Tone::Info);
    }

    fn enemy_turn<R: Rng>(&mut self, id: EnemyId, ctx: &mut CombatContext<'_, R>) {
        if !participant_active(&self.room, Participant::Enemy(id), ctx.roster) {
            return;
        }
        let Some(enemy) = ctx.roster.get(id) else {
            return;
        };
        let name = enemy.name().to_string();
        let action = decide_action(enemy, &self.room, &*ctx.world, &ctx.config.ai, ctx.now, &mut *ctx.rng);
        log::trace!("{name} {id}: {action:?}");

        match action {
            EnemyAction::Wait => {
                ctx.events.say(format!("The {name} watches you warily."), Tone::Info);
            }
            EnemyAction::Move { to } | EnemyAction::Flee { to } => {
                if let Some(enemy) = ctx.roster.get_mut(id) {
                    enemy.current_room = to;
                    enemy.is_fleeing = true;
                    enemy.last_move_time = ctx.now;
                }
                self.last_enemy_fled = true;
                ctx.events.say(format!("The {name} flees!"), Tone::Info);
            }
            EnemyAction::Attack => self.enemy_attack(id, None, ctx),
            EnemyAction::Special { name: key } => self.enemy_attack(id, Some(key.as_str()), ctx),
            EnemyAction::Maneuver(maneuver) => {
                let duration = ctx.config.ai.maneuver_duration;
                if let Some(enemy) = ctx.roster.get_mut(id) {
                    let message = maneuver.apply(&mut enemy.entity, &mut ctx.player.entity, ctx.now, duration);
                    ctx.events.say(message, Tone::Warning);
                }
            }
        }
    }

    /// A regular or special attack. An unknown special key falls back to a
    /// plain attack with a generic line.
    fn enemy_attack<R: Rng>(&mut self, id: EnemyId, special: Option<&str>, ctx: &mut CombatContext<'_, R>) {
        let Some(enemy) = ctx.roster.get(id) else {
            return;
        };
        let name = enemy.name().to_string();
        let attack_power = enemy.attack_power(ctx.now);
        let rage = berserker_multiplier(enemy, &ctx.config.ai);

        let (multiplier, bonus, effect) = match special {
            Some(key) => match enemy.special_attacks.get(key) {
                Some(attack) => {
                    ctx.events.say(attack.message.clone(), Tone::Warning);
                    (attack.damage_multiplier * rage, attack.bonus_damage, attack.effect)
                }
                None => {
                    log::warn!("{name} has no special attack '{key}'");
                    ctx.events.say(format!("The {name} attacks wildly!"), Tone::Warning);
                    (rage, 0, None)
                }
            },
            None => (rage, 0, None),
        };

        let outcome = math::resolve_enemy_attack(attack_power, multiplier, bonus, &ctx.config.combat, ctx.env, &mut *ctx.rng);
        match outcome {
            DefenseOutcome::Dodged => {
                ctx.events.say(format!("You dodge the {name}'s attack!"), Tone::Success);
            }
            DefenseOutcome::Miss => {
                ctx.events.say(format!("The {name} misses you."), Tone::Info);
            }
            DefenseOutcome::Hit { damage, is_crit } => {
                let before = ctx.player.entity.health;
                let taken = ctx.player.take_damage(damage, ctx.now);
                *self.damage_taken.entry(id).or_insert(0) += (before - ctx.player.entity.health) as u32;
                self.last_attacker = Some(name.clone());
                let crit = if is_crit { "Critical hit! " } else { "" };
                ctx.events.say(
                    format!(
                        "{crit}The {name} hits you for {taken} damage. ({}/{})",
                        ctx.player.entity.health, ctx.player.entity.max_health
                    ),
                    Tone::Danger,
                );
                if let Some(effect) = effect {
                    if ctx.player.is_alive() {
                        self.apply_special_effect(id, &name, effect, taken, ctx);
                    }
                }
            }
        }
    }

    fn apply_special_effect<R: Rng>(
        &mut self,
        id: EnemyId,
        name: &str,
        effect: SpecialEffect,
        damage: i32,
        ctx: &mut CombatContext<'_, R>,
    ) {
        match effect {
            SpecialEffect::Poison { strength, duration } => {
                ctx.effects.apply(StatusEffectKind::Poison, duration, strength, ctx.now);
                ctx.events.say("You have been poisoned!", Tone::Danger);
            }
            SpecialEffect::Bleed { strength, duration } => {
                ctx.effects.apply(StatusEffectKind::Bleeding, duration, strength, ctx.now);
                ctx.events.say("You are bleeding!", Tone::Danger);
            }
            SpecialEffect::Drain { fraction } => {
                if let Some(enemy) = ctx.roster.get_mut(id) {
                    let healed = enemy.entity.heal((damage as f64 * fraction).round() as i32);
                    if healed > 0 {
                        ctx.events.say(format!("The {name} recovers {healed} health."), Tone::Warning);
                    }
                }
            }
            SpecialEffect::Weaken { amount, duration } => {
                ctx.player
                    .entity
                    .add_buff(Buff::new(-amount.max(0), 0, ctx.now + duration));
                ctx.events.say("Your strength ebbs away.", Tone::Danger);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CombatConfig;
    use crate::core::events::messages;
    use crate::enemies::{AiType, Enemy, SpecialAttack};
    use crate::entity::Entity;
    use crate::world::RoomGraph;
    use rand::rngs::mock::StepRng;
    use rand_chacha::ChaCha8Rng;

    struct Harness<R> {
        player: Player,
        effects: StatusEffectManager,
        roster: EnemyRoster,
        world: RoomGraph,
        env: Environment,
        loot: LootGenerator,
        catalog: ItemCatalog,
        config: EngineConfig,
        events: Vec<GameEvent>,
        rng: R,
        now: f64,
    }

    impl<R: Rng> Harness<R> {
        fn new(rng: R) -> Self {
            let mut world = RoomGraph::new();
            world.connect("arena", "north", "hall", "south");
            let config = EngineConfig::default();
            Self {
                player: Player::new("Hero", "arena"),
                effects: StatusEffectManager::new(config.effects.clone()),
                roster: EnemyRoster::new(),
                world,
                env: Environment::default(),
                loot: LootGenerator::builtin(config.loot.clone()),
                catalog: ItemCatalog::builtin(),
                config,
                events: Vec::new(),
                rng,
                now: 0.0,
            }
        }

        fn spawn(&mut self, name: &str, health: i32, attack: i32) -> EnemyId {
            let enemy = Enemy::new(EnemyId(0), Entity::new(name, health, attack, 0), AiType::Basic, "arena");
            self.roster.add(enemy)
        }

        fn ctx(&mut self) -> CombatContext<'_, R> {
            CombatContext {
                player: &mut self.player,
                effects: &mut self.effects,
                roster: &mut self.roster,
                world: &mut self.world,
                env: &self.env,
                loot: &self.loot,
                catalog: &self.catalog,
                config: &self.config,
                events: &mut self.events,
                rng: &mut self.rng,
                now: self.now,
            }
        }

        fn no_dodge_no_crit(&mut self) {
            self.config.combat = CombatConfig {
                player_dodge_chance: 0.0,
                crit_chance: 0.0,
                ..CombatConfig::default()
            };
        }
    }

    #[test]
    fn test_start_without_enemies() {
        let mut h = Harness::new(StepRng::new(0, 0));
        assert_eq!(CombatSession::start(&mut h.ctx()).unwrap_err(), CombatError::NoEnemies);
    }

    #[test]
    fn test_initiative_sorted_descending() {
        let mut h = Harness::new(ChaCha8Rng::seed_from_u64(8));
        for i in 0..5 {
            h.spawn(&format!("Rat {i}"), 10, 2);
        }
        let session = CombatSession::start(&mut h.ctx()).unwrap();
        let rolls: Vec<i32> = session.initiative().iter().map(|e| e.roll).collect();
        assert_eq!(rolls.len(), 6);
        assert!(rolls.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(session.engaged().len(), 5);
    }

    #[test]
    fn test_player_wins_initiative_ties() {
        let mut h = Harness::new(StepRng::new(0, 0));
        h.spawn("Rat", 10, 2);
        let session = CombatSession::start(&mut h.ctx()).unwrap();
        assert!(session.is_player_turn());
    }

    #[test]
    fn test_out_of_turn_commands_rejected() {
        let mut h = Harness::new(StepRng::new(0, 0));
        let id = h.spawn("Hawk", 10, 2);
        h.roster.get_mut(id).unwrap().initiative_bonus = 100;

        let mut session = CombatSession::start(&mut h.ctx()).unwrap();
        assert_eq!(session.current_actor(), Some(Participant::Enemy(id)));
        let err = session.process_turn(Some(PlayerAction::Attack(id)), &mut h.ctx()).unwrap_err();
        assert_eq!(err, CombatError::NotPlayersTurn);
        assert_eq!(h.roster.get(id).unwrap().entity.health, 10);
        assert_eq!(session.current_actor(), Some(Participant::Enemy(id)));

        session.process_turn(None, &mut h.ctx()).unwrap();
        assert!(session.is_player_turn());
        let err = session.process_turn(None, &mut h.ctx()).unwrap_err();
        assert_eq!(err, CombatError::AwaitingPlayerAction);
    }

    #[test]
    fn test_attack_on_enemy_outside_fight_rejected() {
        let mut h = Harness::new(StepRng::new(0, 0));
        h.spawn("Rat", 10, 2);
        let outsider = h
            .roster
            .add(Enemy::new(EnemyId(0), Entity::new("Bat", 5, 1, 0), AiType::Basic, "hall"));

        let mut session = CombatSession::start(&mut h.ctx()).unwrap();
        let err = session
            .process_turn(Some(PlayerAction::Attack(outsider)), &mut h.ctx())
            .unwrap_err();
        assert_eq!(err, CombatError::TargetNotInCombat(outsider));
        assert!(session.is_player_turn());
        assert_eq!(h.roster.get(outsider).unwrap().entity.health, 5);
    }

    #[test]
    fn test_killing_last_enemy_is_victory() {
        let mut h = Harness::new(StepRng::new(0, 0));
        let id = h.spawn("Slime", 3, 1);
        {
            let slime = h.roster.get_mut(id).unwrap();
            slime.experience = 150;
            slime.drop_table = Some("wolf".to_string());
        }

        let mut session = CombatSession::start(&mut h.ctx()).unwrap();
        let result = session.process_turn(Some(PlayerAction::Attack(id)), &mut h.ctx()).unwrap();
        assert_eq!(result, CombatResult::PlayerVictory);
        assert!(session.current_actor().is_none());

        let slime = h.roster.get(id).unwrap();
        assert!(!slime.is_alive());
        assert_eq!(slime.death_time, Some(0.0));
        assert_eq!(h.player.level(), 2);
        assert!(h.player.coins > 0);
        assert!(!h.world.items_in("arena").is_empty());

        let defeated = h.events.iter().find_map(|e| match e {
            GameEvent::EnemyDefeated { enemy_name, damage_dealt, experience, .. } => {
                Some((enemy_name.clone(), *damage_dealt, *experience))
            }
            _ => None,
        });
        // Totals count health actually lost, not the overkill.
        assert_eq!(defeated, Some(("Slime".to_string(), 3, 150)));
        assert!(h.events.contains(&GameEvent::LevelUp { level: 2 }));
        assert!(h.events.iter().any(|e| matches!(e, GameEvent::LootDropped { .. })));

        let err = session.process_turn(Some(PlayerAction::Flee), &mut h.ctx()).unwrap_err();
        assert_eq!(err, CombatError::SessionOver);
    }

    #[test]
    fn test_use_item_validation_and_effect() {
        let mut h = Harness::new(StepRng::new(0, 0));
        h.spawn("Rat", 10, 2);
        h.player.entity.health = 20;
        h.player.inventory.add("minor_healing_potion", 1);
        h.player.inventory.add("wolf_pelt", 1);

        let mut session = CombatSession::start(&mut h.ctx()).unwrap();
        for (item, expected) in [
            ("moonstone", CombatError::UnknownItem("moonstone".to_string())),
            ("antidote", CombatError::ItemNotInInventory("Antidote".to_string())),
            ("wolf_pelt", CombatError::ItemNotUsable("Wolf Pelt".to_string())),
        ] {
            let err = session
                .process_turn(Some(PlayerAction::UseItem(item.to_string())), &mut h.ctx())
                .unwrap_err();
            assert_eq!(err, expected);
        }
        assert!(session.is_player_turn());

        session
            .process_turn(Some(PlayerAction::UseItem("minor_healing_potion".to_string())), &mut h.ctx())
            .unwrap();
        assert_eq!(h.player.entity.health, 35);
        assert_eq!(h.player.inventory.count("minor_healing_potion"), 0);
        assert!(!session.is_player_turn());
    }

    #[test]
    fn test_skill_cooldown_counts_laps() {
        let mut h = Harness::new(StepRng::new(0, 0));
        h.spawn("Rat", 100, 0);

        let mut session = CombatSession::start(&mut h.ctx()).unwrap();
        session.act(PlayerAction::UseSkill(Skill::Focus), &mut h.ctx()).unwrap();
        assert_eq!(h.player.entity.attack_power(0.0), 8 + FOCUS_ATTACK_BONUS);
        assert_eq!(session.turn_count(), 1);
        assert_eq!(session.cooldown(Skill::Focus), FOCUS_COOLDOWN - 1);

        let err = session
            .process_turn(Some(PlayerAction::UseSkill(Skill::Focus)), &mut h.ctx())
            .unwrap_err();
        assert_eq!(
            err,
            CombatError::SkillOnCooldown {
                skill: "Focus",
                laps: FOCUS_COOLDOWN - 1
            }
        );

        for _ in 0..FOCUS_COOLDOWN - 1 {
            session.act(PlayerAction::UseSkill(Skill::SecondWind), &mut h.ctx()).ok();
            session.act(PlayerAction::Attack(EnemyId(1)), &mut h.ctx()).ok();
        }
        assert_eq!(session.cooldown(Skill::Focus), 0);
        assert!(session.act(PlayerAction::UseSkill(Skill::Focus), &mut h.ctx()).is_ok());
    }

    #[test]
    fn test_flee_without_exits_costs_turn() {
        let mut h = Harness::new(StepRng::new(0, 0));
        h.world.lock("arena", "hall");
        h.spawn("Rat", 10, 2);

        let mut session = CombatSession::start(&mut h.ctx()).unwrap();
        let result = session.process_turn(Some(PlayerAction::Flee), &mut h.ctx()).unwrap();
        assert_eq!(result, CombatResult::Ongoing);
        assert!(!session.is_player_turn());
        assert_eq!(h.player.current_room, "arena");
        assert!(messages(&h.events).contains(&"There's nowhere to run!"));
    }

    #[test]
    fn test_player_death_signals_game_over() {
        let mut h = Harness::new(StepRng::new(0, 0));
        h.no_dodge_no_crit();
        let id = h.spawn("Ogre", 50, 200);
        h.roster.get_mut(id).unwrap().initiative_bonus = 100;

        let mut session = CombatSession::start(&mut h.ctx()).unwrap();
        let result = session.run_until_player_turn(&mut h.ctx());
        assert_eq!(result, CombatResult::PlayerDefeat);
        assert_eq!(h.player.entity.health, 0);
        assert!(h.events.contains(&GameEvent::GameOver {
            cause: "Slain by the Ogre".to_string()
        }));
        assert_eq!(session.damage_taken_from(id), 50);
    }

    #[test]
    fn test_special_attack_applies_poison() {
        let mut h = Harness::new(StepRng::new(0, 0));
        h.no_dodge_no_crit();
        let id = h.spawn("Spider", 30, 4);
        {
            let spider = h.roster.get_mut(id).unwrap();
            spider.initiative_bonus = 100;
            spider.special_attacks.insert(
                "venom".to_string(),
                SpecialAttack::new(1.0, 1.0, "Fangs sink in!").with_effect(SpecialEffect::Poison {
                    strength: 2.0,
                    duration: 20.0,
                }),
            );
        }

        let mut session = CombatSession::start(&mut h.ctx()).unwrap();
        session.run_until_player_turn(&mut h.ctx());
        assert!(h.effects.is_active(StatusEffectKind::Poison));
        assert!(messages(&h.events).contains(&"Fangs sink in!"));
    }

    #[test]
    fn test_unknown_special_falls_back_to_plain_attack() {
        let mut h = Harness::new(StepRng::new(0, 0));
        h.no_dodge_no_crit();
        let id = h.spawn("Imp", 10, 5);
        let mut session = CombatSession::start(&mut h.ctx()).unwrap();

        session.enemy_attack(id, Some("hellfire"), &mut h.ctx());
        assert!(messages(&h.events).contains(&"The Imp attacks wildly!"));
        // 5 - 2 variance, minus 2 defense
        assert_eq!(h.player.entity.health, 49);
    }

    #[test]
    fn test_last_enemy_fleeing_ends_fight() {
        let mut h = Harness::new(StepRng::new(0, 0));
        let id = h.spawn("Goblin", 20, 2);
        {
            let goblin = h.roster.get_mut(id).unwrap();
            goblin.entity.health = 2;
            goblin.initiative_bonus = 100;
        }

        let mut session = CombatSession::start(&mut h.ctx()).unwrap();
        let result = session.run_until_player_turn(&mut h.ctx());
        assert_eq!(result, CombatResult::EnemyFled);
        let goblin = h.roster.get(id).unwrap();
        assert_eq!(goblin.current_room, "hall");
        assert!(goblin.is_fleeing);
    }

    #[test]
    fn test_poison_ticks_at_lap_end() {
        let mut h = Harness::new(StepRng::new(0, 0));
        h.spawn("Rat", 100, 0);
        h.effects.apply(StatusEffectKind::Poison, 30.0, 3.0, 0.0);

        let mut session = CombatSession::start(&mut h.ctx()).unwrap();
        h.now = 5.0;
        session.act(PlayerAction::UseSkill(Skill::Focus), &mut h.ctx()).unwrap();
        assert_eq!(session.turn_count(), 1);
        assert_eq!(h.player.entity.health, 47);
    }
}
