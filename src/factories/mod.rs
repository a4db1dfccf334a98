pub mod service_factory;
