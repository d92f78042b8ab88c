mod optimistic;
mod replica_reconciler;
mod token_buffer;

pub use replica_reconciler::ReplicaReconciler;
