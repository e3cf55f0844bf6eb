pub mod lifecycle;

pub use lifecycle::ConsultationLifecycleService;
