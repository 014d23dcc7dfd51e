pub mod actions;
pub mod duration;
pub mod mute_scheduler;
pub mod store;
