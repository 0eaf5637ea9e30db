pub mod handlers;
pub mod models;
pub mod rules;
pub mod service;

pub use service::WeatherService;
