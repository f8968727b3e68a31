pub mod application_service;
pub mod authorization;
pub mod dispatch_service;
pub mod notification_service;
