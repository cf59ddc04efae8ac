pub mod seaorm;

pub use seaorm::SeaOrmRecipeRepository;
