//! Leads module - domain models, normalizer, services, and traits.

mod leads_model;
mod leads_normalizer;
mod leads_service;
mod leads_traits;



pub use leads_model::{Environment, Lead, NewLead, DEFAULT_LEAD_NAME, ENVIRONMENT_KEY};
pub use leads_normalizer::normalize;
pub use leads_service::LeadService;
pub use leads_traits::{LeadRepositoryTrait, LeadServiceTrait};
