pub mod analyzer;
pub mod capture;
pub mod classifier;
pub mod config;
pub mod export;
pub mod model;
pub mod reconciler;
pub mod service;
pub mod session;
pub mod storage;
pub mod taxonomy;
pub mod utils;

pub use classifier::classify;
pub use export::export_list;
pub use model::{CategorySource, ShoppingItem};
pub use reconciler::{reconcile, Reconciliation, Signature};
pub use session::{ListObserver, ListSession};
pub use taxonomy::{StoreCategory, Taxonomy};
