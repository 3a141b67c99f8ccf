mod repository;

pub use repository::LeadRepository;
