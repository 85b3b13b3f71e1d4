pub mod navbar;
pub mod star_rating;
