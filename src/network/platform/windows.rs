//! Windows provider using `GetAdaptersAddresses`.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use ipnet::IpNet;
use windows::Win32::Foundation::WIN32_ERROR;
use windows::Win32::NetworkManagement::IpHelper::{
    GAA_FLAG_INCLUDE_GATEWAYS, GAA_FLAG_INCLUDE_PREFIX, GAA_FLAG_SKIP_ANYCAST,
    GAA_FLAG_SKIP_MULTICAST, GET_ADAPTERS_ADDRESSES_FLAGS, GetAdaptersAddresses,
    IF_TYPE_SOFTWARE_LOOPBACK, IP_ADAPTER_ADDRESSES_LH,
};
use windows::Win32::NetworkManagement::Ndis::IfOperStatusUp;
use windows::Win32::Networking::WinSock::{
    AF_INET, AF_INET6, AF_UNSPEC, SOCKADDR_IN, SOCKADDR_IN6, SOCKET_ADDRESS,
};

use crate::network::{LinkProperties, NetworkInfoProvider, ProviderError, RawInterface, RawRoute};

/// Interface type for PPP (Point-to-Point Protocol) adapters.
/// Value from Windows SDK `iptypes.h` - not exported by the `windows` crate.
const IF_TYPE_PPP: u32 = 23;

/// Interface type for tunnel adapters (VPN, etc.).
/// Value from Windows SDK `iptypes.h` - not exported by the `windows` crate.
const IF_TYPE_TUNNEL: u32 = 131;

/// Adapter flag: multicast disabled. Value from `iptypes.h`.
const IP_ADAPTER_NO_MULTICAST: u32 = 0x0010;

/// Buffer size hint for `GetAdaptersAddresses`.
/// The API will tell us the actual required size if this is insufficient.
const INITIAL_BUFFER_SIZE: u32 = 16384;

/// Windows implementation of [`NetworkInfoProvider`].
///
/// Both provider calls walk the same `GetAdaptersAddresses` list. Routes are
/// derived from the adapter's on-link prefixes plus one default route per
/// gateway address.
#[derive(Debug, Clone, Default)]
pub struct WindowsProvider {
    _private: (),
}

impl WindowsProvider {
    /// Creates a new Windows provider.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl NetworkInfoProvider for WindowsProvider {
    fn list_interfaces(&self) -> Result<Vec<RawInterface>, ProviderError> {
        walk_adapters(parse_interface)
    }

    fn list_link_properties(&self) -> Result<Vec<LinkProperties>, ProviderError> {
        walk_adapters(parse_link)
    }
}

/// Calls `GetAdaptersAddresses` and maps every adapter in the returned list.
fn walk_adapters<T>(
    mut parse: impl FnMut(&IP_ADAPTER_ADDRESSES_LH) -> Option<T>,
) -> Result<Vec<T>, ProviderError> {
    let raw_adapters = get_adapter_addresses()?;

    let mut items = Vec::new();
    // SAFETY: GetAdaptersAddresses returns a properly aligned buffer for IP_ADAPTER_ADDRESSES_LH.
    #[allow(clippy::cast_ptr_alignment)]
    let mut current = raw_adapters.as_ptr().cast::<IP_ADAPTER_ADDRESSES_LH>();

    // SAFETY: the linked list is valid as long as `raw_adapters` is alive.
    while !current.is_null() {
        let adapter = unsafe { &*current };
        if let Some(item) = parse(adapter) {
            items.push(item);
        }
        current = adapter.Next;
    }

    Ok(items)
}

/// Calls `GetAdaptersAddresses` and returns the raw buffer containing adapter data.
///
/// Retries once with the size the API reports when the first buffer is too small.
fn get_adapter_addresses() -> Result<Vec<u8>, ProviderError> {
    let flags = GAA_FLAG_SKIP_ANYCAST
        | GAA_FLAG_SKIP_MULTICAST
        | GAA_FLAG_INCLUDE_PREFIX
        | GAA_FLAG_INCLUDE_GATEWAYS;
    let family = u32::from(AF_UNSPEC.0);

    let mut buffer: Vec<u8> = vec![0u8; INITIAL_BUFFER_SIZE as usize];
    let mut size = INITIAL_BUFFER_SIZE;

    // SAFETY: We provide a valid buffer and size.
    let result = unsafe {
        GetAdaptersAddresses(
            family,
            flags,
            None,
            Some(buffer.as_mut_ptr().cast()),
            &raw mut size,
        )
    };

    handle_api_result(result, &mut buffer, &mut size, flags, family)?;

    Ok(buffer)
}

/// Handles the result of `GetAdaptersAddresses`, retrying with a larger buffer.
#[cfg(not(tarpaulin_include))]
fn handle_api_result(
    result: u32,
    buffer: &mut Vec<u8>,
    size: &mut u32,
    flags: GET_ADAPTERS_ADDRESSES_FLAGS,
    family: u32,
) -> Result<(), ProviderError> {
    use windows::Win32::Foundation::{ERROR_ACCESS_DENIED, ERROR_BUFFER_OVERFLOW, NO_ERROR};

    let result = if result == ERROR_BUFFER_OVERFLOW.0 {
        buffer.resize(*size as usize, 0);

        // SAFETY: Same as above, but with correctly sized buffer
        unsafe {
            GetAdaptersAddresses(
                family,
                flags,
                None,
                Some(buffer.as_mut_ptr().cast()),
                &raw mut *size,
            )
        }
    } else {
        result
    };

    if result == ERROR_ACCESS_DENIED.0 {
        return Err(ProviderError::PermissionDenied {
            context: "GetAdaptersAddresses".to_string(),
        });
    }
    if result != NO_ERROR.0 {
        return Err(windows::core::Error::from(WIN32_ERROR(result)).into());
    }

    Ok(())
}

/// Friendly name of the adapter; `None` if it cannot be read.
fn friendly_name(adapter: &IP_ADAPTER_ADDRESSES_LH) -> Option<String> {
    unsafe { adapter.FriendlyName.to_string().ok() }
}

fn parse_interface(adapter: &IP_ADAPTER_ADDRESSES_LH) -> Option<RawInterface> {
    let name = friendly_name(adapter)?;
    let display_name = unsafe { adapter.Description.to_string() }.unwrap_or_else(|_| name.clone());

    // SAFETY: Flags is the plain u32 view of the flags union.
    let flags = unsafe { adapter.Anonymous2.Flags };

    let mut addresses = Vec::new();
    let mut unicast = adapter.FirstUnicastAddress;
    // SAFETY: linked list owned by the adapter buffer.
    while !unicast.is_null() {
        let entry = unsafe { &*unicast };
        if let Some(addr) = socket_address_to_ip(&entry.Address) {
            addresses.push(addr);
        }
        unicast = entry.Next;
    }

    Some(RawInterface {
        name,
        display_name,
        is_up: adapter.OperStatus == IfOperStatusUp,
        is_loopback: adapter.IfType == IF_TYPE_SOFTWARE_LOOPBACK,
        is_virtual: is_virtual_type(adapter.IfType),
        supports_multicast: flags & IP_ADAPTER_NO_MULTICAST == 0,
        addresses,
    })
}

fn parse_link(adapter: &IP_ADAPTER_ADDRESSES_LH) -> Option<LinkProperties> {
    let mut link = LinkProperties::new(friendly_name(adapter)?, adapter.Mtu);

    let mut dns = adapter.FirstDnsServerAddress;
    // SAFETY: linked list owned by the adapter buffer.
    while !dns.is_null() {
        let entry = unsafe { &*dns };
        if let Some(addr) = socket_address_to_ip(&entry.Address) {
            link.dns_servers.push(addr);
        }
        dns = entry.Next;
    }

    let mut prefix = adapter.FirstPrefix;
    // SAFETY: linked list owned by the adapter buffer.
    while !prefix.is_null() {
        let entry = unsafe { &*prefix };
        let network = socket_address_to_ip(&entry.Address)
            .and_then(|addr| u8::try_from(entry.PrefixLength).ok().map(|len| (addr, len)))
            .and_then(|(addr, len)| IpNet::new(addr, len).ok());
        if let Some(network) = network {
            link.routes.push(RawRoute::on_link(network));
        }
        prefix = entry.Next;
    }

    let mut gateway = adapter.FirstGatewayAddress;
    // SAFETY: linked list owned by the adapter buffer.
    while !gateway.is_null() {
        let entry = unsafe { &*gateway };
        if let Some(addr) = socket_address_to_ip(&entry.Address) {
            link.routes.push(RawRoute::default_via(default_prefix(addr), addr));
        }
        gateway = entry.Next;
    }

    Some(link)
}

/// `0.0.0.0/0` or `::/0` matching the family of `gateway`.
fn default_prefix(gateway: IpAddr) -> Option<IpNet> {
    let unspecified = match gateway {
        IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
    };
    IpNet::new(unspecified, 0).ok()
}

/// Tunnel and PPP adapters count as virtual.
const fn is_virtual_type(if_type: u32) -> bool {
    matches!(if_type, IF_TYPE_TUNNEL | IF_TYPE_PPP)
}

/// Converts a `SOCKET_ADDRESS` to an [`IpAddr`].
///
/// # Safety Note
///
/// The pointer casts to `SOCKADDR_IN` and `SOCKADDR_IN6` are allowed despite alignment
/// concerns because Windows guarantees proper alignment of these structures when returned
/// from the networking APIs.
#[allow(clippy::cast_ptr_alignment)]
fn socket_address_to_ip(address: &SOCKET_ADDRESS) -> Option<IpAddr> {
    // SAFETY: lpSockaddr is either null or points into the adapter buffer.
    let sockaddr = unsafe { address.lpSockaddr.as_ref() }?;

    match sockaddr.sa_family {
        f if f == AF_INET => {
            // SAFETY: We verified the family is AF_INET, so this is a valid cast.
            let sockaddr_in = unsafe { &*(std::ptr::from_ref(sockaddr).cast::<SOCKADDR_IN>()) };
            // SAFETY: sin_addr contains the IPv4 address bytes in network order.
            let octets = unsafe { sockaddr_in.sin_addr.S_un.S_un_b };
            Some(IpAddr::V4(Ipv4Addr::new(
                octets.s_b1,
                octets.s_b2,
                octets.s_b3,
                octets.s_b4,
            )))
        }
        f if f == AF_INET6 => {
            // SAFETY: We verified the family is AF_INET6, so this is a valid cast.
            let sockaddr_in6 = unsafe { &*(std::ptr::from_ref(sockaddr).cast::<SOCKADDR_IN6>()) };
            // SAFETY: the union holds the 16 address bytes.
            let octets = unsafe { sockaddr_in6.sin6_addr.u.Byte };
            Some(IpAddr::V6(Ipv6Addr::from(octets)))
        }
        _ => None,
    }
}
