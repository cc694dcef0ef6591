//! UI layer: the form and QR display screens.

pub mod app;

pub use app::PreregistroApp;
