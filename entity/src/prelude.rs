pub use super::app_user::Entity as AppUser;
pub use super::booking::Entity as Booking;
pub use super::checkout_item_check::Entity as CheckoutItemCheck;
pub use super::checkout_report::Entity as CheckoutReport;
pub use super::guest::Entity as Guest;
pub use super::inventory_assignment::Entity as InventoryAssignment;
pub use super::inventory_item::Entity as InventoryItem;
pub use super::invitation::Entity as Invitation;
pub use super::media::Entity as Media;
pub use super::property::Entity as Property;
pub use super::unit::Entity as Unit;
