pub type UserId = String;
pub type SceneId = String;
pub type TokenId = String;
pub type TimerId = String;

/// Which side of the broadcast channel a process is on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// Sole writer of canonical state; runs the scheduler
    Authority,
    /// Holds a shadow copy, only ever overwritten from broadcasts
    Replica,
}

impl Role {
    pub fn invert(self) -> Self {
        match self {
            Role::Authority => Role::Replica,
            Role::Replica => Role::Authority,
        }
    }
}
