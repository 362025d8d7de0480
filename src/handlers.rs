pub mod auth;
pub mod catalog;
pub mod projects;
pub mod rbac;
pub mod reports;
pub mod rooms;
