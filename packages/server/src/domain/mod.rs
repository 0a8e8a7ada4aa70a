//! Domain layer of the device-control hub.

pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::{DEFAULT_DEVICE_CAPACITY, Device, DeviceRegistry};
pub use error::{DomainError, MessagePushError, RepositoryError};
pub use event::{
    ControlEvent, DeviceEntry, DeviceListEvent, Envelope, MessageKind, StatusEvent,
};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::DeviceRepository;
pub use value_object::{Action, ConnectionId, DeviceId, SwitchState, Timestamp};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
#[cfg(test)]
pub use repository::MockDeviceRepository;
