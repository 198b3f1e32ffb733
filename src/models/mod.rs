// Domain models shared by the collector, poll loop and renderer

mod container;
mod snapshot;

pub use container::{ContainerRecord, ListedContainer, SHORT_ID_LEN};
pub use snapshot::PollSnapshot;
