mod change_set;
mod command_code;
mod error;
mod mutation;
mod state_store;

pub use change_set::ChangeSet;
pub use command_code::{generate_command_code, CommandCode, COMMAND_CODES_KEY};
pub use error::StoreError;
pub use mutation::{CrewField, Mutation};
pub use state_store::ReplicatedStateStore;
