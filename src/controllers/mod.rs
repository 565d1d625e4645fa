pub mod auth_controllers;
pub mod poll_controllers;
