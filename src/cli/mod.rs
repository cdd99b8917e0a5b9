pub(crate) mod command;
pub(crate) mod reply;
pub(crate) mod run;
pub(crate) mod send;
pub(crate) mod ui;

use std::net::Ipv4Addr;

use crate::config::NodeConfig;
use crate::net::detect_local_ipv4;

pub use self::command::{
    Args, Command, ConfigArgs, LogLevel, OutputKind, RunArgs, SelfTestArgs, SendArgs,
};

/// Address the node reports in discovery replies.
async fn node_address(config: &NodeConfig) -> Ipv4Addr {
    match (config.use_dhcp(), config.local_ip()) {
        (false, Some(ip)) => ip,
        (true, _) | (false, None) => detect_local_ipv4().await,
    }
}
