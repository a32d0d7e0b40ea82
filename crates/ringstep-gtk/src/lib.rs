pub mod app;
pub mod icon;
pub mod runtime;
pub mod scroll;
pub mod theme;
pub mod view;
