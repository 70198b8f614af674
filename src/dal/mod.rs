pub mod restaurant_db;
pub mod seed;
