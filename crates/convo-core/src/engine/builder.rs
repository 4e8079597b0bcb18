//! Builder para `Engine`.
//!
//! La configuración queda fija al llamar `build`; el engine no expone
//! mutadores.

use std::sync::Arc;

use super::{Clock, Engine, RandomSource, Services, UuidGenerator};
use crate::config::EngineConfig;
use crate::eval::{Evaluator, PassthroughEvaluator};

#[derive(Debug)]
pub struct EngineBuilder {
    config: EngineConfig,
    evaluator: Arc<dyn Evaluator>,
    services: Services,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self { config: EngineConfig::default(),
               evaluator: Arc::new(PassthroughEvaluator),
               services: Services::default() }
    }
}

impl EngineBuilder {
    #[inline]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn with_max_steps_per_sprint(mut self, max: usize) -> Self {
        self.config.max_steps_per_sprint = max;
        self
    }

    #[inline]
    pub fn with_max_resumes_per_session(mut self, max: usize) -> Self {
        self.config.max_resumes_per_session = max;
        self
    }

    #[inline]
    pub fn with_max_template_chars(mut self, max: usize) -> Self {
        self.config.max_template_chars = max;
        self
    }

    #[inline]
    pub fn with_max_field_chars(mut self, max: usize) -> Self {
        self.config.max_field_chars = max;
        self
    }

    #[inline]
    pub fn with_max_result_chars(mut self, max: usize) -> Self {
        self.config.max_result_chars = max;
        self
    }

    pub fn with_evaluator(mut self, evaluator: Arc<dyn Evaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn with_services(mut self, services: Services) -> Self {
        self.services = services;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.services.clock = clock;
        self
    }

    pub fn with_uuids(mut self, uuids: Arc<dyn UuidGenerator>) -> Self {
        self.services.uuids = uuids;
        self
    }

    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.services.random = random;
        self
    }

    pub fn build(self) -> Engine {
        Engine { config: self.config,
                 evaluator: self.evaluator,
                 services: self.services }
    }
}
