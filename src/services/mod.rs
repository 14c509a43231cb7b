pub mod hint_service;
pub mod selection_service;
pub mod structure_service;

pub use hint_service::HintService;
pub use selection_service::SelectionService;
pub use structure_service::{StructureService, Ticket};
