//! Database entities.

#![allow(missing_docs)]

pub mod category;
pub mod enquiry;
pub mod highlight;
pub mod listing;
pub mod listing_highlight;
pub mod listing_image;
pub mod user;

pub use category::Entity as Category;
pub use enquiry::Entity as Enquiry;
pub use highlight::Entity as Highlight;
pub use listing::Entity as Listing;
pub use listing_highlight::Entity as ListingHighlight;
pub use listing_image::Entity as ListingImage;
pub use user::Entity as User;
