pub mod controller;
pub mod decision;
pub mod router;
pub mod service;
