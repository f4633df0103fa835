/// AddressResolver - buffer device addresses across capability tiers

use ash::vk;

use crate::dispatch::BufferAddressDispatch;
use crate::gpuav_debug;

/// Device capabilities relevant to buffer device addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceCapabilities {
    /// Device API version (`vk::make_api_version` encoding)
    pub api_version: u32,
    /// VK_EXT_buffer_device_address enabled
    pub ext_buffer_device_address: bool,
    /// VK_KHR_buffer_device_address enabled
    pub khr_buffer_device_address: bool,
}

/// Which entry point answers address queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressTier {
    Core,
    Ext,
    Khr,
}

/// Resolves buffer device addresses through the first available tier
///
/// Core (1.2+) is preferred, then the EXT entry point, then KHR.
#[derive(Debug, Clone, Copy)]
pub struct AddressResolver {
    capabilities: DeviceCapabilities,
}

impl AddressResolver {
    pub fn new(capabilities: DeviceCapabilities) -> Self {
        Self { capabilities }
    }

    pub fn capabilities(&self) -> &DeviceCapabilities {
        &self.capabilities
    }

    /// Tier used for this device, `None` if addresses are unavailable
    pub fn tier(&self) -> Option<AddressTier> {
        if self.capabilities.api_version >= vk::API_VERSION_1_2 {
            Some(AddressTier::Core)
        } else if self.capabilities.ext_buffer_device_address {
            Some(AddressTier::Ext)
        } else if self.capabilities.khr_buffer_device_address {
            Some(AddressTier::Khr)
        } else {
            None
        }
    }

    /// Device address of `buffer`
    ///
    /// Returns 0 when no tier is available. Callers must treat 0 as
    /// "address-based diagnostics unavailable", never as a buffer address.
    pub fn resolve<D: BufferAddressDispatch + ?Sized>(&self, dispatch: &D, buffer: vk::Buffer) -> vk::DeviceAddress {
        match self.tier() {
            Some(AddressTier::Core) => dispatch.get_buffer_device_address(buffer),
            Some(AddressTier::Ext) => dispatch.get_buffer_device_address_ext(buffer),
            Some(AddressTier::Khr) => dispatch.get_buffer_device_address_khr(buffer),
            None => {
                gpuav_debug!("gpuav::AddressResolver", "buffer device address unsupported for {:?}", buffer);
                0
            }
        }
    }
}

#[cfg(test)]
#[path = "address_resolver_tests.rs"]
mod tests;
