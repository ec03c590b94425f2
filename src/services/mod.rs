pub mod auth;
pub mod notifier;
pub mod recommendations;

pub use auth::{Claims, TokenIssuer};
pub use notifier::{LogNotifier, Notifier, Recipients};
pub use recommendations::{PreferenceDefaults, Recommender};
