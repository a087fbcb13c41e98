pub mod auth;
pub mod cloudinary;
pub mod forms;
pub mod health;
pub mod route;
pub mod search;
pub mod vista;
