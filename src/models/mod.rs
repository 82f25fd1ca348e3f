//! Potts-model evolution rules on a shared cubical complex.
//!
//! Every rule implements [`Model`]: it owns its cocycle (the spins, one per
//! cell of dimension `homology - 1`), proposes a replacement each step and
//! commits whatever the chain accepted. [`AnyModel`] dispatches to the four
//! rules at runtime.
//!
//! | rule | proposal |
//! |---|---|
//! | [`SwendsenWang`] | keep each satisfied plaquette with `p = 1 - e^T`, resample |
//! | [`HomologicalPercolation`] | uniform insertion until an essential class is born |
//! | [`InvadedCluster`] | satisfied plaquettes first until an essential class is born |
//! | [`Glauber`] | add a random nonzero value to one spin |

use std::sync::Arc;

use rand::Rng;

use crate::arithmetic::{FieldElement, FiniteField};
use crate::potts_error::PottsError;
use crate::topology::{BoundaryMatrix, CubicalComplex};

pub mod glauber;
pub mod invaded_cluster;
pub mod percolation;
pub mod swendsen_wang;

pub use glauber::Glauber;
pub use invaded_cluster::InvadedCluster;
pub use percolation::HomologicalPercolation;
pub use swendsen_wang::SwendsenWang;

/// Percolation details attached to states produced by the percolation rules.
#[derive(Clone, Debug, PartialEq)]
pub struct PercolationRecord {
    /// Filtration position of the essential birth.
    pub birth: Option<usize>,
    /// Local index of the plaquette whose insertion percolated.
    pub birth_cell: Option<usize>,
    /// Number of cells in the filtration.
    pub filtration_length: usize,
    /// Per plaquette: opened an essential class.
    pub essential: Vec<bool>,
    /// Per plaquette: satisfied by the cocycle the move started from.
    pub satisfied: Vec<bool>,
}

impl PercolationRecord {
    /// Number of essential plaquette classes in the filtration.
    pub fn essential_count(&self) -> usize {
        self.essential.iter().filter(|&&e| e).count()
    }
}

/// What a chain emits: a cocycle and the plaquettes the move occupied.
#[derive(Clone, Debug, PartialEq)]
pub struct State {
    /// One spin per cell of dimension `homology - 1`.
    pub cocycle: Vec<FieldElement>,
    /// Local plaquette indices occupied by the move.
    pub occupied: Vec<usize>,
    /// Plaquettes the move could have occupied.
    pub candidates: usize,
    pub percolation: Option<PercolationRecord>,
}

impl State {
    /// A state with nothing occupied.
    pub fn from_cocycle(cocycle: Vec<FieldElement>) -> Self {
        Self {
            cocycle,
            occupied: Vec::new(),
            candidates: 0,
            percolation: None,
        }
    }
}

/// Proposal/assign contract shared by every evolution rule.
pub trait Model {
    /// Short kebab-case name.
    fn name(&self) -> &'static str;

    fn complex(&self) -> &Arc<CubicalComplex>;

    /// Dimension `h` of the plaquettes; spins live on `(h-1)`-cells.
    fn homology(&self) -> usize;

    /// Boundary from plaquettes to spin cells.
    fn boundary(&self) -> &BoundaryMatrix;

    fn field(&self) -> &FiniteField {
        self.complex().field()
    }

    /// The state the chain starts from.
    fn initial(&mut self) -> State;

    /// Propose the state for `step`.
    fn proposal(&mut self, step: usize) -> Result<State, PottsError>;

    /// Commit an accepted state and refresh caches.
    fn assign(&mut self, state: &State);

    /// The last committed state.
    fn state(&self) -> &State;

    /// Per plaquette: satisfied by the committed cocycle.
    fn satisfied(&self) -> &[bool];

    /// `-(number of satisfied plaquettes)` of the committed cocycle.
    fn energy(&self) -> f64 {
        -(self.satisfied().iter().filter(|&&s| s).count() as f64)
    }

    /// Energy an arbitrary cocycle would have.
    fn energy_of(&self, cocycle: &[FieldElement]) -> Result<f64, PottsError> {
        let satisfied = self.boundary().satisfied(self.field(), cocycle)?;
        Ok(-(satisfied.into_iter().filter(|&s| s).count() as f64))
    }
}

/// Spin bookkeeping shared by the concrete rules.
#[derive(Clone, Debug)]
pub(crate) struct Spins {
    pub(crate) complex: Arc<CubicalComplex>,
    pub(crate) homology: usize,
    pub(crate) boundary: BoundaryMatrix,
    pub(crate) initial: Vec<FieldElement>,
    pub(crate) state: State,
    pub(crate) satisfied: Vec<bool>,
}

impl Spins {
    /// Uniformly random initial cocycle.
    pub(crate) fn new<R: Rng + ?Sized>(
        complex: Arc<CubicalComplex>,
        homology: usize,
        rng: &mut R,
    ) -> Result<Self, PottsError> {
        if homology == 0 || homology > complex.dimension() {
            return Err(PottsError::InvalidHomology {
                homology,
                dimension: complex.dimension(),
            });
        }
        let boundary = complex.boundary(homology);
        let initial = complex
            .field()
            .random_vector(complex.count(homology - 1), rng);
        let satisfied = boundary.satisfied(complex.field(), &initial)?;
        log::debug!(
            "spins on {} {}-cells, {} plaquettes ({} satisfied)",
            initial.len(),
            homology - 1,
            satisfied.len(),
            satisfied.iter().filter(|&&s| s).count()
        );
        Ok(Self {
            complex,
            homology,
            boundary,
            state: State::from_cocycle(initial.clone()),
            initial,
            satisfied,
        })
    }

    /// Replace the initial cocycle.
    pub(crate) fn set_initial(&mut self, cocycle: Vec<FieldElement>) -> Result<(), PottsError> {
        let order = self.complex.field().order();
        if cocycle.iter().any(|&x| x >= order) {
            log::warn!("initial cocycle has entries outside the field; reducing");
        }
        let cocycle: Vec<FieldElement> = cocycle.into_iter().map(|x| x % order).collect();
        let satisfied = self.boundary.satisfied(self.complex.field(), &cocycle)?;
        self.state = State::from_cocycle(cocycle.clone());
        self.initial = cocycle;
        self.satisfied = satisfied;
        Ok(())
    }

    pub(crate) fn initial_state(&self) -> State {
        State::from_cocycle(self.initial.clone())
    }

    /// Commit `state`; a cocycle of the wrong length leaves the committed
    /// state and its cache untouched.
    pub(crate) fn assign(&mut self, state: &State) {
        match self.boundary.satisfied(self.complex.field(), &state.cocycle) {
            Ok(satisfied) => {
                self.satisfied = satisfied;
                self.state = state.clone();
            }
            Err(e) => log::warn!("refusing a cocycle that does not fit the complex: {e}"),
        }
    }

    /// Local indices of the satisfied plaquettes.
    pub(crate) fn satisfied_plaquettes(&self) -> Vec<usize> {
        self.satisfied
            .iter()
            .enumerate()
            .filter_map(|(i, &s)| s.then_some(i))
            .collect()
    }
}

/// Any of the four rules, chosen at runtime.
pub enum AnyModel {
    SwendsenWang(SwendsenWang),
    HomologicalPercolation(HomologicalPercolation),
    InvadedCluster(InvadedCluster),
    Glauber(Glauber),
}

macro_rules! dispatch {
    ($self:expr, $m:ident => $body:expr) => {
        match $self {
            AnyModel::SwendsenWang($m) => $body,
            AnyModel::HomologicalPercolation($m) => $body,
            AnyModel::InvadedCluster($m) => $body,
            AnyModel::Glauber($m) => $body,
        }
    };
}

impl Model for AnyModel {
    fn name(&self) -> &'static str {
        dispatch!(self, m => m.name())
    }

    fn complex(&self) -> &Arc<CubicalComplex> {
        dispatch!(self, m => m.complex())
    }

    fn homology(&self) -> usize {
        dispatch!(self, m => m.homology())
    }

    fn boundary(&self) -> &BoundaryMatrix {
        dispatch!(self, m => m.boundary())
    }

    fn initial(&mut self) -> State {
        dispatch!(self, m => m.initial())
    }

    fn proposal(&mut self, step: usize) -> Result<State, PottsError> {
        dispatch!(self, m => m.proposal(step))
    }

    fn assign(&mut self, state: &State) {
        dispatch!(self, m => m.assign(state))
    }

    fn state(&self) -> &State {
        dispatch!(self, m => m.state())
    }

    fn satisfied(&self) -> &[bool] {
        dispatch!(self, m => m.satisfied())
    }
}

impl std::fmt::Debug for AnyModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnyModel")
            .field("rule", &self.name())
            .field("homology", &self.homology())
            .finish_non_exhaustive()
    }
}

impl From<SwendsenWang> for AnyModel {
    fn from(m: SwendsenWang) -> Self {
        AnyModel::SwendsenWang(m)
    }
}

impl From<HomologicalPercolation> for AnyModel {
    fn from(m: HomologicalPercolation) -> Self {
        AnyModel::HomologicalPercolation(m)
    }
}

impl From<InvadedCluster> for AnyModel {
    fn from(m: InvadedCluster) -> Self {
        AnyModel::InvadedCluster(m)
    }
}

impl From<Glauber> for AnyModel {
    fn from(m: Glauber) -> Self {
        AnyModel::Glauber(m)
    }
}

static_assertions::assert_impl_all!(AnyModel: Send);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::schedules::Constant;

    fn torus() -> Arc<CubicalComplex> {
        Arc::new(CubicalComplex::build(&[2, 2], 3, None, true).unwrap())
    }

    #[test]
    fn energy_counts_satisfied_plaquettes() {
        let mut m = Glauber::new(torus(), 1, 7).unwrap();
        m.assign(&State::from_cocycle(vec![2; 9]));
        assert_eq!(m.energy(), -18.0);
        let mut spins = vec![0; 9];
        spins[4] = 1;
        // vertex 4 has four incident edges
        assert_eq!(m.energy_of(&spins).unwrap(), -14.0);
        assert!(m.energy_of(&[0; 3]).is_err());
    }

    #[test]
    fn any_model_dispatches() {
        let m: AnyModel = SwendsenWang::new(torus(), 1, Constant(-1.0), 1).unwrap().into();
        assert_eq!(m.name(), "swendsen-wang");
        assert_eq!(m.homology(), 1);
        assert_eq!(m.state().cocycle.len(), 9);
        assert_eq!(m.satisfied().len(), 18);
    }

    #[test]
    fn homology_outside_the_complex_is_rejected() {
        assert!(matches!(
            Glauber::new(torus(), 3, 0),
            Err(PottsError::InvalidHomology { homology: 3, dimension: 2 })
        ));
    }

    #[test]
    fn misfit_cocycles_are_not_committed() {
        let mut m = Glauber::new(torus(), 1, 7).unwrap();
        let good = State::from_cocycle(vec![1; 9]);
        m.assign(&good);
        m.assign(&State::from_cocycle(vec![1, 2]));
        assert_eq!(m.state(), &good);
        assert_eq!(m.satisfied().len(), 18);
        assert_eq!(m.energy(), m.energy_of(&m.state().cocycle).unwrap());
        assert!(m.proposal(1).is_ok());
    }

    #[test]
    fn initial_cocycle_can_be_fixed() {
        let m = Glauber::new(torus(), 1, 0)
            .unwrap()
            .with_initial(vec![1; 9])
            .unwrap();
        assert_eq!(m.state().cocycle, vec![1; 9]);
        assert!(Glauber::new(torus(), 1, 0).unwrap().with_initial(vec![1; 4]).is_err());
    }
}
