pub mod admin;
pub mod home;
pub mod login;
pub mod owner;
pub mod password;
pub mod register;
