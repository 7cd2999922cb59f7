//! Business logic services.

#![allow(missing_docs)]

pub mod category;
pub mod email;
pub mod enquiry;
pub mod highlight;
pub mod listing;
pub mod listing_image;
pub mod listing_status;
pub mod moderation;
pub mod pagination;
pub mod user;

pub use category::{CategoryService, CreateCategoryInput, UpdateCategoryInput};
pub use email::{EmailDeliveryResult, EmailMessage, EmailService};
pub use enquiry::{EnquiryService, SubmitEnquiryInput};
pub use highlight::HighlightService;
pub use listing::{
    CreateListingInput, ListingContent, ListingDetail, ListingService, ListingSummary,
    SearchListingsInput, UpdateListingInput,
};
pub use listing_image::{AddImageInput, ListingImageService, MAX_IMAGES_PER_LISTING};
pub use listing_status::{allowed_transitions, can_transition, check_transition};
pub use moderation::{ModerationService, require_admin, require_broker};
pub use pagination::{MAX_PAGE_SIZE, Page, PageRequest};
pub use user::{RegisterBrokerInput, Session, UpdateProfileInput, UserService};

pub use bizlist_db::repositories::ListingSort;
