//! The shared, replicated slice of ship state.
//!
//! State is split into named regions. A region is the unit of persistence
//! (one key-value entry each) and the unit of wholesale replacement on
//! replicas (`StateDelta`), so applying the same region value twice, or an
//! older value after a newer one, is always well-defined: the last value
//! applied wins.

pub(crate) mod region;
pub(crate) mod replicated_state;
pub(crate) mod ship;
