mod device;

pub use device::InMemoryDeviceRepository;
