use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of network interface a path runs over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceKind {
    /// A virtual or otherwise unknown interface type
    #[default]
    Other,
    /// A Wi-Fi link
    Wifi,
    /// A cellular link
    Cellular,
    /// A wired Ethernet link
    WiredEthernet,
    /// The loopback interface
    Loopback,
}

impl InterfaceKind {
    /// Order in which a path's interfaces are tested; the first one the path uses wins.
    pub const PRECEDENCE: [InterfaceKind; 5] = [
        InterfaceKind::Wifi,
        InterfaceKind::Cellular,
        InterfaceKind::WiredEthernet,
        InterfaceKind::Loopback,
        InterfaceKind::Other,
    ];

    /// Pick the interface kind for a path, given a predicate telling which kinds it uses
    pub fn resolve<F>(uses: F) -> Self
    where
        F: Fn(InterfaceKind) -> bool,
    {
        Self::PRECEDENCE
            .into_iter()
            .find(|kind| uses(*kind))
            .unwrap_or(InterfaceKind::Other)
    }
}

/// Immutable snapshot of the device's connectivity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectivityState {
    /// The current path is usable
    pub active: bool,
    /// The path runs over an interface the system considers expensive (cellular, hotspot)
    pub expensive: bool,
    /// The user restricted data usage on this path
    pub constrained: bool,
    /// Interface the path runs over
    pub interface: InterfaceKind,
}

impl ConnectivityState {
    /// Create a new snapshot
    pub fn new(active: bool, expensive: bool, constrained: bool, interface: InterfaceKind) -> Self {
        Self {
            active,
            expensive,
            constrained,
            interface,
        }
    }

    /// An active, unmetered snapshot on the given interface
    pub fn online(interface: InterfaceKind) -> Self {
        Self::new(true, false, false, interface)
    }

    /// A snapshot with no usable path
    pub fn offline() -> Self {
        Self::default()
    }
}

/// Which kinds of path requests are allowed to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAccess {
    pub allow_expensive: bool,
    pub allow_constrained: bool,
}

impl Default for NetworkAccess {
    fn default() -> Self {
        Self {
            allow_expensive: true,
            allow_constrained: true,
        }
    }
}

impl NetworkAccess {
    /// Refuse expensive and constrained paths
    pub fn restricted() -> Self {
        Self {
            allow_expensive: false,
            allow_constrained: false,
        }
    }

    /// Name of the path property that rules out `state`, if any
    pub fn denial(&self, state: &ConnectivityState) -> Option<&'static str> {
        if state.expensive && !self.allow_expensive {
            Some("expensive")
        } else if state.constrained && !self.allow_constrained {
            Some("constrained")
        } else {
            None
        }
    }

    pub fn permits(&self, state: &ConnectivityState) -> bool {
        self.denial(state).is_none()
    }
}

/// HTTP response as returned by a transport, before any decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    pub url: String,
}

impl RawResponse {
    /// Create a new raw response
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>, url: String) -> Self {
        Self {
            status,
            headers,
            body,
            url,
        }
    }

    /// Check if the response indicates success (2xx status code)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Look up a header case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_access_permits_every_path() {
        let metered = ConnectivityState::new(true, true, true, InterfaceKind::Cellular);
        assert!(NetworkAccess::default().permits(&metered));
    }

    #[test]
    fn test_restricted_access_names_the_denial() {
        let access = NetworkAccess::restricted();
        let cellular = ConnectivityState::new(true, true, false, InterfaceKind::Cellular);
        let low_data = ConnectivityState::new(true, false, true, InterfaceKind::Wifi);

        assert_eq!(access.denial(&cellular), Some("expensive"));
        assert_eq!(access.denial(&low_data), Some("constrained"));
        assert!(access.permits(&ConnectivityState::online(InterfaceKind::Wifi)));
    }

    #[test]
    fn test_access_flags_are_independent() {
        let access = NetworkAccess {
            allow_expensive: true,
            allow_constrained: false,
        };
        assert!(access.permits(&ConnectivityState::new(true, true, false, InterfaceKind::Cellular)));
        assert!(!access.permits(&ConnectivityState::new(true, true, true, InterfaceKind::Cellular)));
    }

    #[test]
    fn test_wifi_wins_over_other() {
        let uses = [InterfaceKind::Other, InterfaceKind::Wifi];
        assert_eq!(InterfaceKind::resolve(|k| uses.contains(&k)), InterfaceKind::Wifi);
    }

    #[test]
    fn test_precedence_is_fixed() {
        let uses = [InterfaceKind::Loopback, InterfaceKind::WiredEthernet, InterfaceKind::Cellular];
        assert_eq!(InterfaceKind::resolve(|k| uses.contains(&k)), InterfaceKind::Cellular);

        let uses = [InterfaceKind::Loopback, InterfaceKind::WiredEthernet];
        assert_eq!(InterfaceKind::resolve(|k| uses.contains(&k)), InterfaceKind::WiredEthernet);
    }

    #[test]
    fn test_no_interface_resolves_to_other() {
        assert_eq!(InterfaceKind::resolve(|_| false), InterfaceKind::Other);
    }

    #[test]
    fn test_default_state_is_offline() {
        let state = ConnectivityState::default();
        assert!(!state.active);
        assert_eq!(state, ConnectivityState::offline());
        assert_eq!(state.interface, InterfaceKind::Other);
    }

    #[test]
    fn test_raw_response_success_range() {
        for status in [200, 201, 204, 299] {
            assert!(RawResponse::new(status, HashMap::new(), vec![], String::new()).is_success());
        }
        for status in [199, 300, 404, 500] {
            assert!(!RawResponse::new(status, HashMap::new(), vec![], String::new()).is_success());
        }
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        let response = RawResponse::new(200, headers, vec![], String::new());
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.header("Accept"), None);
    }
}
