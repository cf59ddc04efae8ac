pub mod errors;
pub mod db;
pub mod slug;
pub mod recipe;
pub mod ingredient;

#[cfg(test)]
mod tests;
