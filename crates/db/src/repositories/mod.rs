//! Repositories: one per aggregate, each wrapping a shared connection pool.

mod category;
mod enquiry;
mod highlight;
mod listing;
mod listing_image;
mod user;

pub use category::CategoryRepository;
pub use enquiry::EnquiryRepository;
pub use highlight::HighlightRepository;
pub use listing::{
    ListingFilter, ListingRepository, ListingSort, build_search_condition, escape_like,
};
pub use listing_image::ListingImageRepository;
pub use user::UserRepository;
