//! Administration client for the job board platform: blog publishing and
//! recruiter moderation over the platform's REST API.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod pages;
pub mod services;
pub mod store;
pub mod tui;
pub mod validation;
