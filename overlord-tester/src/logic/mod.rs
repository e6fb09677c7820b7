pub mod content;
pub mod playability;
pub mod policy;
pub mod reports;
pub mod seeds;
pub mod simulation;

pub use content::TesterContent;
pub use playability::{
    PlayabilityAggregate, PlayabilityRecord, aggregate_playability, run_playability_analysis,
};
pub use policy::GameplayStrategy;
pub use seeds::{resolve_seed_inputs, split_csv};
