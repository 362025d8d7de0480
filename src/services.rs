pub mod auth;
pub mod catalog_service;
pub mod export;
pub mod ledger_service;
pub mod projection;
pub mod report_service;
pub mod room_plan;
pub mod room_service;
pub mod volume_ledger;
