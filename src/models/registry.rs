use super::model::{Model, ModelType};
use super::user::User;
use crate::utils::error::AppError;
use std::collections::HashMap;

/// Builds an empty model instance.
pub type ModelFactory = fn() -> Box<dyn Model>;

fn build<M: ModelType>() -> Box<dyn Model> {
    Box::new(M::default())
}

/// Maps model type tags to constructors for empty instances.
///
/// Filled once at startup and then shared read-only behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    factories: HashMap<&'static str, ModelFactory>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every model this service persists.
    pub fn with_defaults() -> Result<Self, AppError> {
        let mut registry = Self::new();
        registry.register::<User>()?;
        Ok(registry)
    }

    pub fn register<M: ModelType>(&mut self) -> Result<&mut Self, AppError> {
        self.register_factory(M::MODEL_TYPE, build::<M>)?;
        Ok(self)
    }

    pub fn register_factory(
        &mut self,
        model_type: &'static str,
        factory: ModelFactory,
    ) -> Result<(), AppError> {
        if self.factories.contains_key(model_type) {
            return Err(AppError::DuplicateModelType(model_type.to_string()));
        }
        self.factories.insert(model_type, factory);
        Ok(())
    }

    /// Fresh empty instance for `model_type`.
    pub fn create(&self, model_type: &str) -> Result<Box<dyn Model>, AppError> {
        self.factories
            .get(model_type)
            .map(|factory| factory())
            .ok_or_else(|| AppError::InvalidModelType(model_type.to_string()))
    }

    pub fn contains(&self, model_type: &str) -> bool {
        self.factories.contains_key(model_type)
    }

    pub fn model_types(&self) -> Vec<&'static str> {
        let mut types: Vec<_> = self.factories.keys().copied().collect();
        types.sort_unstable();
        types
    }
}
