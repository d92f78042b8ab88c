mod error;
mod ship_executor;

pub use error::ActionError;
pub use ship_executor::ShipActionExecutor;

use wyterm_shared::Action;

use crate::store::{ChangeSet, ReplicatedStateStore};

/// Runs a timer's actions against the canonical state.
///
/// Executors only reach the state through the store's choke point, so the
/// regions they touch come back as a `ChangeSet` for the tick's aggregate
/// broadcast.
pub trait ActionExecutor: Send {
    fn execute(
        &mut self,
        store: &mut ReplicatedStateStore,
        action: &Action,
        game_now_ms: i64,
    ) -> Result<ChangeSet, ActionError>;
}
