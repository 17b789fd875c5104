pub mod errors;
pub mod db;
pub mod address_book;
