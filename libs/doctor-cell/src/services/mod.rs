pub mod lookup;

pub use lookup::DoctorLookupService;
