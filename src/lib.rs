pub mod api;
pub mod cli;
pub mod core;
pub mod extract;
pub mod google;
pub mod scheduling;
