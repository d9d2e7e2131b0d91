pub mod animation;
pub mod host;
pub mod indicators;
pub mod loading;
pub mod progress_bar;
pub mod render;
pub mod screen;
