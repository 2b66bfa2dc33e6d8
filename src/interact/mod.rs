pub mod controller;
pub mod toolbar;
