//! Bill impact engine: allocation, tariff, impact, trajectory and summary stages.

pub mod allocation;
pub mod constants;
pub mod impact;
pub mod profile;
pub mod summary;
pub mod tariff;
pub mod trajectory;
