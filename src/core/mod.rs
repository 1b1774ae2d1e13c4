pub mod controller;
pub mod gpu_context;
pub mod input_adapter;
pub mod uniform;

pub use controller::*;
pub use gpu_context::GpuContext;
pub use input_adapter::WinitController;
pub use uniform::*;
