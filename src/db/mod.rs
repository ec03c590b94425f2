pub mod memory;
pub mod postgres;
pub mod query;
pub mod store;

pub use memory::MemoryStore;
pub use postgres::{create_pool, PgStore};
pub use query::{MovieFilter, MovieSort, Similarity};
pub use store::{BoardStore, ListStore, MovieStore, ReviewStore, Store, TrailerStore, UserStore};
