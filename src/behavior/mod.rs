pub mod context;
pub mod machine;

pub use context::PetState;
pub use machine::BehaviorStateMachine;
