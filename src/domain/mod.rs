pub mod rating;
pub mod restaurant;
pub mod search;
pub mod validation;

pub use rating::*;
pub use restaurant::*;
pub use search::*;
pub use validation::ValidationError;
