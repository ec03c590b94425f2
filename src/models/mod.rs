pub mod custom_list;
pub mod discussion;
pub mod movie;
pub mod review;
pub mod stats;
pub mod trailer;
pub mod user;

pub use custom_list::CustomList;
pub use discussion::{Board, Post};
pub use movie::{
    Article, Award, BoxOffice, BoxOfficeAwards, Credit, Movie, MovieSummary, NewsAndUpdates, ParentalGuidance,
    Person, Ratings, RelatedMovie, Sequel,
};
pub use review::{Comment, Like, Review, ReviewHighlight, ReviewView};
pub use stats::{CountBucket, DiscussionRow, EngagementRow};
pub use trailer::{Trailer, TrailerType};
pub use user::{Preferences, User};

use uuid::Uuid;

/// Generates a new entity id.
///
/// UUIDv7 strings are time-ordered, so they sort in creation order and can be
/// used directly as pagination cursors.
pub fn new_id() -> String {
    Uuid::now_v7().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_sort_in_creation_order() {
        let ids: Vec<String> = (0..50).map(|_| new_id()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
