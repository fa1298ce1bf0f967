//! HTTP service exposing site-metadata resolution, page-metadata synthesis,
//! and cache-tag revalidation endpoints.

pub mod app;
pub mod services;
