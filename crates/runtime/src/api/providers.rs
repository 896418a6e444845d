//! Asynchronous abstraction for sourcing player moves.
//!
//! Hosts plug in [`MoveProvider`] implementations so a battle can be driven
//! by remote players, scripted fixtures, or automated opponents.
use async_trait::async_trait;

use arena_core::{BattleSnapshot, MoveId, PlayerId};

use super::errors::Result;

/// Trait for choosing a move from the current battle state.
///
/// Different implementations can handle:
/// - Player input relayed from a transport
/// - Automated opponents
/// - Scripted/replayed moves
/// - Testing fixtures
#[async_trait]
pub trait MoveProvider: Send + Sync {
    /// Choose a move for `player`, who holds the turn.
    ///
    /// Returning `None` concedes the battle.
    async fn choose_move(
        &self,
        player: &PlayerId,
        state: &BattleSnapshot,
    ) -> Result<Option<MoveId>>;
}

/// A provider that always plays the same move.
/// Useful for testing or as a fallback.
pub struct FixedMoveProvider(pub MoveId);

#[async_trait]
impl MoveProvider for FixedMoveProvider {
    async fn choose_move(
        &self,
        _player: &PlayerId,
        _state: &BattleSnapshot,
    ) -> Result<Option<MoveId>> {
        Ok(Some(self.0.clone()))
    }
}
