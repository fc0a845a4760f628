//! Entity definitions for Pulse
//!
//! This crate contains Sea-ORM entity definitions for the data field models.
//! `organizations`, `users` and `rooms` are owned by other parts of the
//! application; only the columns the data field tables reference are mapped.

pub mod data_field_rooms;
pub mod sea_orm_active_enums;
pub use data_field_rooms::Entity as DataFieldRooms;
pub mod data_fields;
pub use data_fields::Entity as DataFields;
pub mod organizations;
pub use organizations::Entity as Organizations;
pub mod rooms;
pub use rooms::Entity as Rooms;
pub mod users;
pub use users::Entity as Users;
