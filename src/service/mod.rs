use std::sync::Arc;

mod error;
pub mod generator;
mod quiz;
mod user;

pub use error::ServiceError;
pub use quiz::*;
pub use user::*;

use generator::QuestionGenerator;

use crate::storage::StorageManager;

#[derive(Clone)]
pub struct ServiceRegistry {
    pub quiz: QuizService,
    pub user: UserService,
}

impl ServiceRegistry {
    pub fn new(storage: StorageManager, generator: Arc<dyn QuestionGenerator>) -> Self {
        info!("Initializing service registry");

        let user = UserService::new(storage.clone());
        let quiz = QuizService::new(storage, user.clone(), generator);

        info!("Service registry initialized");

        Self { quiz, user }
    }
}
