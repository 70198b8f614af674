mod health_check;
mod helpers;
mod restaurants;
mod search;
