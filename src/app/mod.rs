// Application layer - Use case interactors

pub mod container;
pub mod inspect_interactor;

// Re-export interactors
pub use inspect_interactor::{InspectInteractor, InspectRequest, InspectResponse, ReportFormat};
