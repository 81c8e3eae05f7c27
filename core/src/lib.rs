pub mod actor;
pub mod arena;
pub mod choreo;
pub mod config;
pub mod hooks;
pub mod ids;
pub mod scheduler;
pub mod scripts;

// Re-exports for convenience
pub use actor::{
    ActorCommand, ActorHandle, ActorMachine, ActorScript, ActorState, ActorStatus, Flow,
    HealthTrigger, Lifecycle, StateOf,
};
pub use arena::{Arena, HookEvent, HookLog};
pub use choreo::{Choreographer, Ctx, Delivery, Directory};
pub use config::{ConfigError, load_encounter_config, load_encounter_dir};
pub use hooks::{EngineHooks, NoopHooks, Target};
pub use ids::{EffectId, EntityId, LineId, PointId};
pub use scheduler::{EventQueue, PhaseMask, PhaseSet};
pub use scripts::ScriptKind;
pub use skirmish_types::{DelayRange, EncounterConfig, PurgePolicy, SchedulerConfig};
