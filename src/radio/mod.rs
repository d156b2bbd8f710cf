pub mod bits;
pub mod channel;
pub mod config;
pub mod dirty;
pub mod error;
pub mod features;
pub mod helpers;
pub mod image;
pub mod layout;
pub mod policy;
pub mod progress;
pub mod protocol;
pub mod session;
pub mod slice;
pub mod special;
pub mod tables;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use channel::{Channel, Field};
pub use config::{LinkConfig, LinkConfigBuilder};
pub use dirty::DirtyBlocks;
pub use error::{RadioError, Result, Violation};
pub use features::RadioFeatures;
pub use image::MemoryImage;
pub use layout::Frontmatter;
pub use policy::{AllowAllBlocks, ProtectTrailingBlocks, UploadPolicy};
pub use progress::{NoProgress, ProgressSink, Status};
pub use protocol::{Link, LinkState};
pub use session::Thd72;
pub use slice::{ROSlice, RWSlice};
pub use special::{Location, SlotKind};
pub use tables::{CrossMode, Duplex, Mode, Skip, ToneMode};
pub use transport::{NullTransport, Transport};

pub mod prelude {
    pub use super::{
        AllowAllBlocks, Channel, CrossMode, Duplex, Field, Frontmatter, Link, LinkConfig,
        Location, MemoryImage, Mode, NoProgress, NullTransport, ProgressSink, ProtectTrailingBlocks,
        RadioError, RadioFeatures, Skip, Status, Thd72, ToneMode, Transport, UploadPolicy,
    };
}
