//! Serializable run configuration.
//!
//! ```
//! use cubical_potts::config::{ModelKind, SimulationConfig};
//!
//! let cfg = SimulationConfig {
//!     model: ModelKind::InvadedCluster,
//!     steps: 5,
//!     ..SimulationConfig::default()
//! };
//! let mut chain = cfg.build_chain().unwrap();
//! assert_eq!(chain.run().unwrap(), 6);
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::chain::acceptance::{Always, AnyAcceptance, Metropolis};
use crate::chain::schedules::ScheduleConfig;
use crate::chain::{Chain, statistics};
use crate::models::{
    AnyModel, Glauber, HomologicalPercolation, InvadedCluster, Model, SwendsenWang,
};
use crate::potts_error::PottsError;
use crate::topology::{CubicalComplex, LatticeOptions};

/// Which evolution rule to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    #[default]
    SwendsenWang,
    HomologicalPercolation,
    InvadedCluster,
    Glauber,
}

/// Which acceptance rule the chain applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AcceptanceKind {
    #[default]
    Always,
    Metropolis,
}

/// Everything needed to build and run one chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub lattice: LatticeOptions,
    /// Plaquette dimension; spins live one dimension lower.
    pub homology: usize,
    pub model: ModelKind,
    pub acceptance: AcceptanceKind,
    pub schedule: ScheduleConfig,
    pub steps: usize,
    pub seed: u64,
    /// Which essential class marks percolation (1 = first).
    pub essential_required: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            lattice: LatticeOptions::default(),
            homology: 1,
            model: ModelKind::default(),
            acceptance: AcceptanceKind::default(),
            schedule: ScheduleConfig::default(),
            steps: 100,
            seed: 42,
            essential_required: 1,
        }
    }
}

impl SimulationConfig {
    /// Build the complex this configuration describes.
    pub fn build_complex(&self) -> Result<Arc<CubicalComplex>, PottsError> {
        CubicalComplex::from_options(&self.lattice).map(Arc::new)
    }

    /// Build the model on a fresh complex.
    pub fn build_model(&self) -> Result<AnyModel, PottsError> {
        self.build_model_on(self.build_complex()?)
    }

    /// Build the model on an existing complex.
    pub fn build_model_on(&self, complex: Arc<CubicalComplex>) -> Result<AnyModel, PottsError> {
        let order = complex.field().order();
        let h = self.homology;
        let model = match self.model {
            ModelKind::SwendsenWang => {
                let schedule = self.schedule.build(self.steps, order, self.seed);
                SwendsenWang::with_schedule(complex, h, schedule, self.seed)?.into()
            }
            ModelKind::HomologicalPercolation => HomologicalPercolation::new(complex, h, self.seed)?
                .with_essential_required(self.essential_required)
                .into(),
            ModelKind::InvadedCluster => InvadedCluster::new(complex, h, self.seed)?
                .with_essential_required(self.essential_required)
                .into(),
            ModelKind::Glauber => Glauber::new(complex, h, self.seed)?.into(),
        };
        log::debug!("built {:?} model from configuration", self.model);
        Ok(model)
    }

    /// Acceptance rule; Metropolis draws from a stream independent of the model.
    pub fn build_acceptance(&self, order: u32) -> AnyAcceptance {
        match self.acceptance {
            AcceptanceKind::Always => AnyAcceptance::Always(Always),
            AcceptanceKind::Metropolis => {
                let schedule = self.schedule.build(self.steps, order, self.seed);
                AnyAcceptance::Metropolis(Metropolis::with_schedule(
                    schedule,
                    self.seed.wrapping_add(1),
                ))
            }
        }
    }

    /// Chain with the statistics relevant to the configured rule.
    pub fn build_chain(&self) -> Result<Chain<AnyModel, AnyAcceptance>, PottsError> {
        self.build_chain_on(self.build_complex()?)
    }

    /// Like [`SimulationConfig::build_chain`] on an existing complex.
    pub fn build_chain_on(
        &self,
        complex: Arc<CubicalComplex>,
    ) -> Result<Chain<AnyModel, AnyAcceptance>, PottsError> {
        let model = self.build_model_on(complex)?;
        let acceptance = self.build_acceptance(model.field().order());
        let chain = Chain::new(model, self.steps)
            .with_acceptance(acceptance)
            .with_statistic("satisfied_fraction", statistics::satisfied_fraction())
            .with_statistic("occupied_fraction", statistics::occupied_fraction());
        Ok(match self.model {
            ModelKind::SwendsenWang => {
                chain.with_statistic("inclusion_fraction", statistics::inclusion_fraction())
            }
            ModelKind::HomologicalPercolation | ModelKind::InvadedCluster => chain
                .with_statistic("birth_time", statistics::birth_time())
                .with_statistic("essential_count", statistics::essential_count())
                .with_statistic("wilson_loop", statistics::wilson_loop(self.seed)),
            ModelKind::Glauber => chain,
        })
    }
}
