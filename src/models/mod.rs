pub mod application;
pub mod job;
pub mod notification;
pub mod page;
pub mod user;
