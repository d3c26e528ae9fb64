//! Shared helpers for command handlers.

use netseg_core::{Action, Protocol};

use crate::cli::{ActionArg, ProtocolArg};

pub fn map_protocol(p: ProtocolArg) -> Protocol {
    match p {
        ProtocolArg::Tcp => Protocol::Tcp,
        ProtocolArg::Udp => Protocol::Udp,
        ProtocolArg::Icmp => Protocol::Icmp,
        ProtocolArg::Any => Protocol::Any,
    }
}

pub fn map_action(a: ActionArg) -> Action {
    match a {
        ActionArg::Allow => Action::Allow,
        ActionArg::Deny => Action::Deny,
    }
}

pub fn map_protocols(protocols: &[ProtocolArg]) -> Vec<Protocol> {
    protocols.iter().copied().map(map_protocol).collect()
}

/// `-` for absent optional text.
pub fn or_dash(value: Option<&str>) -> String {
    value.map_or_else(|| "-".into(), ToOwned::to_owned)
}
