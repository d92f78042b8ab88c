pub mod failing_store;
pub mod test_table;

pub use failing_store::FailingKeyValueStore;
pub use test_table::{init_logger, TestTable, SCENE};
