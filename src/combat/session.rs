//! Combat session: the turn state machine
//!
//! A session owns both characters, the coin set and the RNG for one combat.
//! Every command runs synchronously until the player has to decide again or
//! the combat ends. The enemy side never suspends: its selector is consulted
//! inline and its turn resolves within the same call.
//!
//! Rejected commands return an error and leave every piece of state as it was.

use crate::coins::CoinSet;
use crate::combat::ai::{GreedySelector, PatternSelector};
use crate::combat::character::Character;
use crate::combat::events::{CombatEvent, CombatEventLog};
use crate::combat::phase::{CombatPhase, CombatTurnState, StepOutcome};
use crate::combat::skill::{ActiveSkill, SkillCommand};
use crate::core::config::CombatConfig;
use crate::core::error::{CombatError, Result};
use crate::core::types::{PatternId, Role, SessionId, Side};
use crate::effects::resolver::EffectResolver;
use crate::patterns::catalog::{
    validate_patterns, DefaultStacking, EffectCatalog, PatternCatalog, PatternTable,
};
use crate::patterns::matcher::{determine, locate_indices};
use crate::patterns::pattern::Pattern;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Assembles a [`CombatSession`] from its collaborators
pub struct CombatSessionBuilder<C: Character> {
    config: CombatConfig,
    player: Option<C>,
    enemy: Option<C>,
    catalog: Option<Box<dyn PatternCatalog>>,
    effects: Option<Box<dyn EffectCatalog>>,
    ai: Option<Box<dyn PatternSelector>>,
}

impl<C: Character> Default for CombatSessionBuilder<C> {
    fn default() -> Self {
        Self {
            config: CombatConfig::default(),
            player: None,
            enemy: None,
            catalog: None,
            effects: None,
            ai: None,
        }
    }
}

impl<C: Character> CombatSessionBuilder<C> {
    pub fn config(mut self, config: CombatConfig) -> Self {
        self.config = config;
        self
    }

    pub fn player(mut self, player: C) -> Self {
        self.player = Some(player);
        self
    }

    pub fn enemy(mut self, enemy: C) -> Self {
        self.enemy = Some(enemy);
        self
    }

    pub fn catalog(mut self, catalog: impl PatternCatalog + 'static) -> Self {
        self.catalog = Some(Box::new(catalog));
        self
    }

    /// Stacking rules; defaults to [`DefaultStacking`]
    pub fn effects(mut self, effects: impl EffectCatalog + 'static) -> Self {
        self.effects = Some(Box::new(effects));
        self
    }

    /// Use one table as both pattern catalog and effect catalog
    pub fn pattern_table(self, table: PatternTable) -> Self {
        self.catalog(table.clone()).effects(table)
    }

    /// Enemy pattern selector; defaults to [`GreedySelector`]
    pub fn ai(mut self, ai: impl PatternSelector + 'static) -> Self {
        self.ai = Some(Box::new(ai));
        self
    }

    pub fn build(self) -> Result<CombatSession<C>> {
        self.config.validate()?;

        let player = self
            .player
            .ok_or_else(|| CombatError::config("no player character"))?;
        let enemy = self
            .enemy
            .ok_or_else(|| CombatError::config("no enemy character"))?;
        let catalog = self
            .catalog
            .ok_or_else(|| CombatError::config("no pattern catalog"))?;
        let effects = self.effects.unwrap_or_else(|| Box::new(DefaultStacking));
        let ai = self
            .ai
            .unwrap_or_else(|| Box::new(GreedySelector::default()));

        let rng = match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let coins = CoinSet::new(self.config.coin_count, self.config.swap_policy)?;

        Ok(CombatSession {
            id: SessionId::new(),
            config: self.config,
            state: CombatTurnState::default(),
            coins,
            rng,
            player,
            enemy,
            player_patterns: Vec::new(),
            enemy_patterns: Vec::new(),
            catalog,
            effects,
            ai,
            matched: Vec::new(),
            pending: None,
            skill_used_this_turn: false,
            winner: None,
            events: CombatEventLog::new(),
        })
    }
}

pub struct CombatSession<C: Character> {
    id: SessionId,
    config: CombatConfig,
    state: CombatTurnState,
    coins: CoinSet,
    rng: ChaCha8Rng,
    player: C,
    enemy: C,
    player_patterns: Vec<Pattern>,
    enemy_patterns: Vec<Pattern>,
    catalog: Box<dyn PatternCatalog>,
    effects: Box<dyn EffectCatalog>,
    ai: Box<dyn PatternSelector>,
    /// Patterns satisfied by the current coins for the active side
    matched: Vec<Pattern>,
    /// Pattern chosen for the execution phase
    pending: Option<Pattern>,
    skill_used_this_turn: bool,
    winner: Option<Side>,
    events: CombatEventLog,
}

impl<C: Character> CombatSession<C> {
    pub fn builder() -> CombatSessionBuilder<C> {
        CombatSessionBuilder::default()
    }

    // ===== LIFECYCLE =====

    /// Bind the catalogs and run until the player's first decision
    ///
    /// A `ConfigurationError` here leaves the session in `Init`, inactive.
    pub fn start(&mut self) -> Result<StepOutcome> {
        if self.state.phase != CombatPhase::Init {
            return Err(self.reject(CombatError::illegal("combat already started")));
        }

        let player_patterns = self.load_patterns(&self.config.player_role)?;
        let enemy_patterns = self.load_patterns(&self.config.enemy_role)?;
        self.player_patterns = player_patterns;
        self.enemy_patterns = enemy_patterns;

        self.state = CombatTurnState {
            turn_number: 1,
            active_side: Side::Player,
            phase: CombatPhase::CoinPhase,
            is_active: true,
        };

        tracing::info!(
            session = %self.id,
            player = self.player.name(),
            enemy = self.enemy.name(),
            coins = self.coins.len(),
            "Combat started"
        );
        self.events.push(CombatEvent::CombatStarted {
            player: self.player.name().to_string(),
            enemy: self.enemy.name().to_string(),
        });
        self.events.push(CombatEvent::TurnChanged {
            turn: 1,
            side: Side::Player,
        });

        Ok(self.advance())
    }

    /// End the combat from outside, as a win or loss for the player
    pub fn force_end(&mut self, player_won: bool) -> Result<StepOutcome> {
        match self.state.phase {
            CombatPhase::Init => Err(self.reject(CombatError::illegal("combat not started"))),
            CombatPhase::Ended => Err(self.reject(CombatError::illegal("combat already ended"))),
            _ => {
                tracing::info!(session = %self.id, player_won, "Combat force-ended");
                self.end(player_won);
                Ok(StepOutcome::Ended { player_won })
            }
        }
    }

    /// Dispose of the session and hand the characters back
    pub fn finish(self) -> (C, C) {
        (self.player, self.enemy)
    }

    // ===== PLAYER COMMANDS =====

    /// Execute one of the currently matched patterns
    pub fn submit_player_pattern(&mut self, id: &PatternId) -> Result<StepOutcome> {
        self.ensure_player_decision()?;

        let pattern = match self.matched.iter().find(|p| &p.id == id) {
            Some(p) => p.clone(),
            None => return Err(self.reject(CombatError::PatternNotAvailable(id.clone()))),
        };

        self.pending = Some(pattern);
        self.set_phase(CombatPhase::Execution);
        Ok(self.advance())
    }

    /// Decline to act this turn
    pub fn pass_turn(&mut self) -> Result<StepOutcome> {
        self.ensure_player_decision()?;
        self.events.push(CombatEvent::TurnPassed { side: Side::Player });
        self.set_phase(CombatPhase::ResolutionCheck);
        Ok(self.advance())
    }

    /// The skill the player could use right now, or why not
    pub fn request_active_skill(&self) -> Result<ActiveSkill> {
        if !self.state.awaiting_player() {
            return Err(CombatError::illegal(
                "skills can only be used during the player's decision",
            ));
        }
        if self.skill_used_this_turn {
            return Err(CombatError::illegal("skill already used this turn"));
        }
        let skill = self
            .player
            .active_skill()
            .ok_or_else(|| CombatError::illegal("player has no active skill"))?;
        if !self.player.is_active_skill_available() {
            return Err(CombatError::illegal(format!("{} is on cooldown", skill.kind)));
        }
        Ok(skill)
    }

    /// Use the player's skill and recompute the matched patterns
    ///
    /// Stays in the player's decision phase. Returns the new matched list.
    pub fn use_active_skill(&mut self, command: SkillCommand) -> Result<&[Pattern]> {
        let skill = self.request_active_skill().map_err(|e| self.reject(e))?;
        if command.kind() != skill.kind {
            return Err(self.reject(CombatError::illegal(format!(
                "equipped skill is {}, not {}",
                skill.kind,
                command.kind()
            ))));
        }

        let coins_before = self.coins.clone();
        let rng_before = self.rng.clone();

        if let Err(e) = command.apply(Side::Player, &mut self.coins, &mut self.rng) {
            self.coins = coins_before;
            self.rng = rng_before;
            return Err(self.reject(e));
        }

        if let Err(e) = self.player.use_active_skill() {
            self.coins = coins_before;
            self.rng = rng_before;
            return Err(self.reject(e));
        }

        self.skill_used_this_turn = true;
        let snapshot = self.coins.snapshot();
        tracing::debug!(
            session = %self.id,
            skill = %skill.kind,
            coins = %crate::combat::events::render_coins(&snapshot),
            "Active skill used"
        );
        self.events.push(CombatEvent::SkillUsed {
            kind: skill.kind,
            coins: snapshot,
        });

        self.refresh_matches();
        self.announce_player_decision();
        Ok(&self.matched)
    }

    /// Reinitialize the coin set to `count` coins and rethrow them
    ///
    /// Only legal during the player's decision; the matched list is recomputed.
    pub fn resize_coins(&mut self, count: usize) -> Result<&[Pattern]> {
        self.ensure_player_decision()?;
        if let Err(e) = self.coins.resize(count, &mut self.rng) {
            return Err(self.reject(e));
        }
        tracing::debug!(session = %self.id, count, "Coin set resized");
        self.refresh_matches();
        self.announce_player_decision();
        Ok(&self.matched)
    }

    // ===== QUERIES =====

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn turn_state(&self) -> &CombatTurnState {
        &self.state
    }

    pub fn phase(&self) -> CombatPhase {
        self.state.phase
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn coins(&self) -> &CoinSet {
        &self.coins
    }

    pub fn coin_snapshot(&self) -> Vec<bool> {
        self.coins.snapshot()
    }

    pub fn matched_patterns(&self) -> &[Pattern] {
        &self.matched
    }

    /// Patterns bound for `side` at start
    pub fn patterns_for(&self, side: Side) -> &[Pattern] {
        match side {
            Side::Player => &self.player_patterns,
            Side::Enemy => &self.enemy_patterns,
        }
    }

    /// Coin positions justifying a pattern of the active side, for highlighting
    pub fn locate_indices(&self, id: &PatternId) -> Result<Vec<usize>> {
        let pattern = self
            .patterns_for(self.state.active_side)
            .iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| CombatError::PatternNotAvailable(id.clone()))?;
        Ok(locate_indices(&self.coins.snapshot(), pattern))
    }

    pub fn player(&self) -> &C {
        &self.player
    }

    pub fn enemy(&self) -> &C {
        &self.enemy
    }

    pub fn skill_used_this_turn(&self) -> bool {
        self.skill_used_this_turn
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        self.events.drain()
    }

    // ===== STATE MACHINE =====

    /// Run phases until the player must decide or the combat ends
    fn advance(&mut self) -> StepOutcome {
        loop {
            match self.state.phase {
                CombatPhase::Init => {
                    // Not reachable from the public commands
                    return StepOutcome::Ended { player_won: false };
                }
                CombatPhase::CoinPhase => self.coin_phase(),
                CombatPhase::Decision(Side::Player) => return StepOutcome::AwaitingPlayer,
                CombatPhase::Decision(Side::Enemy) => self.enemy_decision(),
                CombatPhase::Execution => self.execution_phase(),
                CombatPhase::ResolutionCheck => self.resolution_check(),
                CombatPhase::NextTurn => self.next_turn(),
                CombatPhase::Ended => {
                    return StepOutcome::Ended {
                        player_won: self.winner == Some(Side::Player),
                    }
                }
            }
        }
    }

    fn coin_phase(&mut self) {
        let side = self.state.active_side;
        let thrown = self.coins.flip_for_turn(side, &mut self.rng);
        let snapshot = self.coins.snapshot();

        tracing::debug!(
            session = %self.id,
            turn = self.state.turn_number,
            side = %side,
            thrown,
            coins = %crate::combat::events::render_coins(&snapshot),
            "Coins flipped"
        );
        self.events.push(CombatEvent::CoinsFlipped {
            side,
            coins: snapshot,
            locked: self.coins.locked_indices(),
        });

        self.refresh_matches();
        self.set_phase(CombatPhase::Decision(side));

        if side == Side::Player {
            self.skill_used_this_turn = false;
            self.announce_player_decision();
        }
    }

    fn enemy_decision(&mut self) {
        let choice = self
            .ai
            .select_pattern(&self.enemy, &self.player, &self.matched);

        match choice {
            Some(id) => match self.matched.iter().find(|p| p.id == id) {
                Some(pattern) => {
                    self.pending = Some(pattern.clone());
                    self.set_phase(CombatPhase::Execution);
                }
                None => {
                    tracing::warn!(
                        session = %self.id,
                        pattern = %id,
                        "Enemy selector chose an unmatched pattern; passing"
                    );
                    self.events.push(CombatEvent::TurnPassed { side: Side::Enemy });
                    self.set_phase(CombatPhase::ResolutionCheck);
                }
            },
            None => {
                self.events.push(CombatEvent::TurnPassed { side: Side::Enemy });
                self.set_phase(CombatPhase::ResolutionCheck);
            }
        }
    }

    fn execution_phase(&mut self) {
        let side = self.state.active_side;
        let Some(pattern) = self.pending.take() else {
            self.set_phase(CombatPhase::ResolutionCheck);
            return;
        };

        tracing::debug!(
            session = %self.id,
            side = %side,
            pattern = %pattern.id,
            "Pattern executed"
        );
        self.events.push(CombatEvent::PatternExecuted {
            side,
            pattern: pattern.id.clone(),
            name: pattern.name.clone(),
        });

        let resolver = EffectResolver::new(self.effects.as_ref());
        match side {
            Side::Player => {
                resolver.resolve(&pattern, side, &mut self.player, &mut self.enemy, &mut self.events)
            }
            Side::Enemy => {
                resolver.resolve(&pattern, side, &mut self.enemy, &mut self.player, &mut self.events)
            }
        };

        self.set_phase(CombatPhase::ResolutionCheck);
    }

    fn resolution_check(&mut self) {
        if let Some(player_won) = self.defeat_check() {
            self.end(player_won);
        } else {
            self.set_phase(CombatPhase::NextTurn);
        }
    }

    fn next_turn(&mut self) {
        let released = self.coins.release_spent_locks();
        if released > 0 {
            tracing::debug!(session = %self.id, released, "Locks released");
        }

        match self.state.active_side {
            Side::Player => {
                self.state.active_side = Side::Enemy;
            }
            Side::Enemy => {
                self.state.active_side = Side::Player;
                self.state.turn_number += 1;
                self.turn_boundary_updates();

                if self.config.end_on_status_death {
                    if let Some(player_won) = self.defeat_check() {
                        self.end(player_won);
                        return;
                    }
                }
            }
        }

        tracing::debug!(
            session = %self.id,
            turn = self.state.turn_number,
            side = %self.state.active_side,
            "Turn changed"
        );
        self.events.push(CombatEvent::TurnChanged {
            turn: self.state.turn_number,
            side: self.state.active_side,
        });
        self.set_phase(CombatPhase::CoinPhase);
    }

    /// Status decay and cooldowns, once per full Player+Enemy pair
    fn turn_boundary_updates(&mut self) {
        let player_tick = self.player.update_status_effects();
        let enemy_tick = self.enemy.update_status_effects();
        self.player.update_skill_cooldown();
        self.enemy.update_skill_cooldown();

        for (side, tick) in [(Side::Player, player_tick), (Side::Enemy, enemy_tick)] {
            if !tick.is_empty() {
                self.events.push(CombatEvent::StatusTicked { side, tick });
            }
        }
    }

    /// `Some(player_won)` once either side is down. A double knockout is a loss.
    fn defeat_check(&self) -> Option<bool> {
        match (self.player.is_defeated(), self.enemy.is_defeated()) {
            (false, false) => None,
            (false, true) => Some(true),
            (true, _) => Some(false),
        }
    }

    fn end(&mut self, player_won: bool) {
        self.winner = Some(if player_won { Side::Player } else { Side::Enemy });
        self.state.is_active = false;
        self.pending = None;
        self.matched.clear();
        self.set_phase(CombatPhase::Ended);

        tracing::info!(
            session = %self.id,
            turn = self.state.turn_number,
            player_won,
            player_health = self.player.current_health(),
            enemy_health = self.enemy.current_health(),
            "Combat ended"
        );
        self.events.push(CombatEvent::CombatEnded { player_won });
    }

    // ===== HELPERS =====

    fn load_patterns(&self, role: &Role) -> Result<Vec<Pattern>> {
        let patterns = self.catalog.patterns_for(role);
        validate_patterns(role, &patterns).map_err(|e| self.reject(e))?;
        Ok(patterns)
    }

    fn refresh_matches(&mut self) {
        let snapshot = self.coins.snapshot();
        let catalog = match self.state.active_side {
            Side::Player => &self.player_patterns,
            Side::Enemy => &self.enemy_patterns,
        };
        self.matched = determine(&snapshot, catalog).into_iter().cloned().collect();
    }

    fn announce_player_decision(&mut self) {
        self.events.push(CombatEvent::PlayerDecisionReady {
            matched: self.matched.iter().map(|p| p.id.clone()).collect(),
            coins: self.coins.snapshot(),
        });
    }

    fn ensure_player_decision(&self) -> Result<()> {
        if self.state.awaiting_player() {
            Ok(())
        } else {
            Err(self.reject(CombatError::illegal(format!(
                "not the player's decision (phase {:?})",
                self.state.phase
            ))))
        }
    }

    fn set_phase(&mut self, phase: CombatPhase) {
        tracing::trace!(session = %self.id, from = ?self.state.phase, to = ?phase, "Phase");
        self.state.phase = phase;
    }

    /// Log a rejected command and hand the error back
    fn reject(&self, error: CombatError) -> CombatError {
        tracing::warn!(
            session = %self.id,
            kind = ?error.kind(),
            phase = ?self.state.phase,
            "{}",
            error
        );
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::fighter::Fighter;
    use crate::combat::skill::ActiveSkillKind;
    use crate::core::error::ErrorKind;
    use crate::core::types::CoinFace;
    use crate::patterns::pattern::PatternShape;

    /// Single-coin patterns so every flip matches exactly one of them
    fn coin_table() -> PatternTable {
        let patterns = vec![
            Pattern::attack("heads", PatternShape::AllSame, CoinFace::Heads, 0),
            Pattern::defense("tails", PatternShape::AllSame, CoinFace::Tails, 1),
        ];
        PatternTable::new()
            .with_role("knight", patterns.clone())
            .unwrap()
            .with_role("slime", patterns)
            .unwrap()
    }

    fn session(seed: u64) -> CombatSession<Fighter> {
        CombatSession::builder()
            .config(CombatConfig::default().with_seed(seed).with_coin_count(1))
            .player(Fighter::new("hero", "knight", 40, 5).with_skill(ActiveSkillKind::FlipOne, 1))
            .enemy(Fighter::new("slime", "slime", 40, 2))
            .pattern_table(coin_table())
            .build()
            .unwrap()
    }

    #[test]
    fn test_start_suspends_for_player() {
        let mut s = session(1);
        assert_eq!(s.phase(), CombatPhase::Init);
        assert!(!s.is_active());

        assert_eq!(s.start().unwrap(), StepOutcome::AwaitingPlayer);
        assert_eq!(s.phase(), CombatPhase::Decision(Side::Player));
        assert_eq!(s.turn_state().turn_number, 1);
        assert!(s.is_active());
        assert_eq!(s.matched_patterns().len(), 1);
    }

    #[test]
    fn test_start_twice_rejected() {
        let mut s = session(1);
        s.start().unwrap();
        assert_eq!(s.start().unwrap_err().kind(), ErrorKind::IllegalAction);
    }

    #[test]
    fn test_unknown_role_prevents_start() {
        let mut s: CombatSession<Fighter> = CombatSession::builder()
            .config(CombatConfig::default().with_roles("knight", "dragon"))
            .player(Fighter::new("hero", "knight", 40, 5))
            .enemy(Fighter::new("dragon", "dragon", 400, 50))
            .pattern_table(coin_table())
            .build()
            .unwrap();

        assert_eq!(s.start().unwrap_err().kind(), ErrorKind::ConfigurationError);
        assert_eq!(s.phase(), CombatPhase::Init);
        assert!(!s.is_active());
    }

    #[test]
    fn test_build_requires_catalog() {
        let result = CombatSession::<Fighter>::builder()
            .player(Fighter::new("hero", "knight", 40, 5))
            .enemy(Fighter::new("slime", "slime", 40, 2))
            .build();
        assert!(matches!(result, Err(CombatError::ConfigurationError(_))));
    }

    #[test]
    fn test_commands_before_start_rejected() {
        let mut s = session(1);
        let id = PatternId::new("heads");
        assert_eq!(
            s.submit_player_pattern(&id).unwrap_err().kind(),
            ErrorKind::IllegalAction
        );
        assert_eq!(s.pass_turn().unwrap_err().kind(), ErrorKind::IllegalAction);
        assert_eq!(s.force_end(true).unwrap_err().kind(), ErrorKind::IllegalAction);
    }

    #[test]
    fn test_pass_advances_one_turn() {
        let mut s = session(2);
        s.start().unwrap();
        s.drain_events();

        assert_eq!(s.pass_turn().unwrap(), StepOutcome::AwaitingPlayer);
        assert_eq!(s.turn_state().turn_number, 2);
        assert_eq!(s.turn_state().active_side, Side::Player);

        let events = s.drain_events();
        assert_eq!(events[0], CombatEvent::TurnPassed { side: Side::Player });
        assert!(events.contains(&CombatEvent::TurnChanged {
            turn: 1,
            side: Side::Enemy
        }));
        assert!(events.contains(&CombatEvent::TurnChanged {
            turn: 2,
            side: Side::Player
        }));
    }

    #[test]
    fn test_unmatched_pattern_rejected() {
        let mut s = session(3);
        s.start().unwrap();
        let before = *s.turn_state();
        let unmatched = if s.coin_snapshot()[0] { "tails" } else { "heads" };

        let err = s.submit_player_pattern(&PatternId::new(unmatched)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PatternNotAvailable);
        assert_eq!(*s.turn_state(), before);
    }

    #[test]
    fn test_skill_flips_coin_and_rematches() {
        let mut s = session(4);
        s.start().unwrap();
        let before = s.coin_snapshot()[0];
        let expected = if before { "tails" } else { "heads" };

        let matched = s.use_active_skill(SkillCommand::FlipOne { index: 0 }).unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, PatternId::new(expected));
        assert_eq!(s.coin_snapshot()[0], !before);
        assert_eq!(s.phase(), CombatPhase::Decision(Side::Player));
        assert!(s.skill_used_this_turn());
    }

    #[test]
    fn test_skill_once_per_turn() {
        let mut s = session(5);
        s.start().unwrap();
        s.use_active_skill(SkillCommand::FlipOne { index: 0 }).unwrap();
        let err = s.use_active_skill(SkillCommand::FlipOne { index: 0 }).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalAction);
    }

    #[test]
    fn test_skill_wrong_kind_rejected() {
        let mut s = session(6);
        s.start().unwrap();
        let before = s.coin_snapshot();
        let err = s.use_active_skill(SkillCommand::RethrowAll).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalAction);
        assert_eq!(s.coin_snapshot(), before);
        assert!(!s.skill_used_this_turn());
    }

    #[test]
    fn test_skill_bad_index_has_no_effect() {
        let mut s = session(6);
        s.start().unwrap();
        let err = s.use_active_skill(SkillCommand::FlipOne { index: 3 }).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert!(!s.skill_used_this_turn());
        assert!(s.player().is_active_skill_available());
    }

    #[test]
    fn test_force_end_stops_combat() {
        let mut s = session(7);
        s.start().unwrap();
        assert_eq!(
            s.force_end(false).unwrap(),
            StepOutcome::Ended { player_won: false }
        );
        assert!(!s.is_active());
        assert_eq!(s.winner(), Some(Side::Enemy));
        assert_eq!(s.pass_turn().unwrap_err().kind(), ErrorKind::IllegalAction);
    }

    #[test]
    fn test_locate_indices_for_active_side() {
        let mut s = session(8);
        s.start().unwrap();
        let matched = s.matched_patterns()[0].id.clone();
        assert_eq!(s.locate_indices(&matched).unwrap(), vec![0]);
        assert!(s.locate_indices(&PatternId::new("nope")).is_err());
    }

    #[test]
    fn test_resize_recomputes_matches() {
        let mut s = session(9);
        s.start().unwrap();
        s.resize_coins(4).unwrap();
        assert_eq!(s.coin_snapshot().len(), 4);
        let expected: Vec<PatternId> = determine(&s.coin_snapshot(), s.patterns_for(Side::Player))
            .into_iter()
            .map(|p| p.id.clone())
            .collect();
        let actual: Vec<PatternId> = s.matched_patterns().iter().map(|p| p.id.clone()).collect();
        assert_eq!(actual, expected);

        assert!(s.resize_coins(0).is_err());
        assert_eq!(s.coin_snapshot().len(), 4);
    }

    #[test]
    fn test_submitted_pattern_always_resolves() {
        let mut s = session(10);
        s.start().unwrap();
        s.drain_events();
        let id = s.matched_patterns()[0].id.clone();

        s.submit_player_pattern(&id).unwrap();
        let events = s.drain_events();
        let executed = events
            .iter()
            .position(|e| matches!(e, CombatEvent::PatternExecuted { side: Side::Player, .. }))
            .unwrap();
        assert!(matches!(
            events[executed + 1],
            CombatEvent::DamageApplied { target: Side::Enemy, amount: 5 }
                | CombatEvent::DefenseApplied { target: Side::Player, amount: 1 }
        ));
    }
}

