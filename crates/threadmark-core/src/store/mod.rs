pub mod root_store;

pub use root_store::RootStore;
