pub mod item;
pub mod record;
pub mod request;
pub mod response;

pub use item::{ItemType, ListStatus, UnknownVariant};
pub use record::{Favorite, ListEntry};
pub use request::{AddFavoriteRequest, AddListEntryRequest, ListQuery, UpdateListEntryRequest};
pub use response::{
    ErrorBody, FavoriteCheck, HealthStatus, ListStats, RemovedFavorite, RemovedListEntry,
};
