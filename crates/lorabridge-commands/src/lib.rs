//! MAC commands and cloud-to-device messages.
//!
//! Provides:
//! - MAC command identifiers, variants and their wire encoding
//! - MAC command lists carried by a single frame
//! - The cloud-to-device message contract consumed by the downlink scheduler
//! - Delivery outcome tracking for queued downlinks

pub mod downlink;
pub mod error;
pub mod holder;
pub mod mac;
pub mod outcome;

// Re-exports
pub use mac::{Cid, Direction, MacCommand, Operation};

pub use holder::MacCommandHolder;

pub use downlink::{CloudToDeviceMessage, CloudToDeviceRequest, DirectCloudToDeviceMessage};

pub use outcome::{DownlinkDisposition, DownlinkOutcome, TrackedCloudToDeviceMessage};

pub use error::{DownlinkError, MacCommandError};
