//! GPU device + surface management.
//!
//! [`Gpu`] borrows the window it renders into and owns everything else:
//! instance, adapter, device, queue, the configured surface and the depth
//! buffer that tracks its size.

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
