pub mod auth;
pub mod catalog;
pub mod ledger;
pub mod organization;
pub mod rbac;
pub mod report;
pub mod room;
