pub mod db;
pub mod email;
pub mod openai;
pub mod places;
pub mod security;
