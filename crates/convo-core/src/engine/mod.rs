//! Engine: fábrica de sesiones y guardián de los límites globales.
//!
//! Un `Engine` no guarda estado por sesión; puede compartirse entre hilos y
//! procesar muchas sesiones independientes.

mod builder;
mod services;

use log::{info, warn};

pub use builder::EngineBuilder;
pub use services::{Clock, FixedClock, RandomSource, SeededUuids, Services, StdRandom, SystemClock, UuidGenerator,
                   V4Generator};

use crate::assets::{MissingAssetPolicy, SessionAssets};
use crate::config::EngineConfig;
use crate::errors::FlowError;
use crate::eval::Evaluator;
use crate::model::AssetReference;
use crate::runtime::{Session, Sprint, Trigger};

#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    evaluator: std::sync::Arc<dyn Evaluator>,
    services: Services,
}

impl Engine {
    #[inline]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &dyn Evaluator {
        self.evaluator.as_ref()
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Crea una sesión desde `trigger` y ejecuta el primer sprint.
    pub fn new_session(&self, assets: &dyn SessionAssets, trigger: Trigger) -> Result<(Session, Sprint), FlowError> {
        let flow = assets.flow(&trigger.flow.uuid)
                         .ok_or_else(|| FlowError::MissingAsset(AssetReference::Flow(trigger.flow.clone())))?;

        let mut session = Session::new(self.services.uuids.new_uuid(), trigger, flow.flow_type());
        info!("session {} starting flow {}", session.uuid, flow.uuid());
        let sprint = session.start(self, assets, flow)?;
        Ok((session, sprint))
    }

    /// Lee una sesión persistida, reconstruye los enlaces padre/hijo y
    /// comprueba que los flows de sus runs sigan existiendo.
    pub fn read_session(&self,
                        assets: &dyn SessionAssets,
                        data: &[u8],
                        policy: MissingAssetPolicy)
                        -> Result<(Session, Vec<AssetReference>), FlowError> {
        let mut session: Session = serde_json::from_slice(data)?;
        session.link_runs()?;

        let mut missing = Vec::new();
        for run in &session.runs {
            if assets.flow(&run.flow.uuid).is_none() {
                let reference = AssetReference::Flow(run.flow.clone());
                if !missing.contains(&reference) {
                    missing.push(reference);
                }
            }
        }

        match (policy, missing.first()) {
            (_, None) => Ok((session, missing)),
            (MissingAssetPolicy::Abort, Some(first)) => Err(FlowError::MissingAsset(first.clone())),
            (MissingAssetPolicy::Ignore, Some(_)) => {
                warn!("session {} references {} missing asset(s)", session.uuid, missing.len());
                Ok((session, Vec::new()))
            }
            (MissingAssetPolicy::Collect, Some(_)) => Ok((session, missing)),
        }
    }
}
