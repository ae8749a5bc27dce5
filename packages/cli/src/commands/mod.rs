pub mod apply;
pub mod init;
pub mod inspect;
pub mod new;
pub mod normalize;
pub mod templates;

pub use apply::{apply, ApplyArgs};
pub use init::{init, InitArgs};
pub use inspect::{inspect, InspectArgs};
pub use new::{new_funnel, NewArgs};
pub use normalize::{normalize, NormalizeArgs};
pub use templates::{templates, TemplatesArgs};
