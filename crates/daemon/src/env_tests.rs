// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

use super::*;

fn cli(args: &[&str]) -> Cli {
    let mut full = vec!["exostreamd"];
    full.extend_from_slice(args);
    Cli::parse_from(full)
}

#[test]
fn socket_flag_overrides_default() {
    let config = Config::from_cli(cli(&["--socket", "/tmp/custom.sock"])).expect("config");
    assert_eq!(config.socket_path, PathBuf::from("/tmp/custom.sock"));
}

#[test]
fn network_port_defaults_when_absent() {
    let config = Config::from_cli(cli(&[])).expect("config");
    assert_eq!(config.network_port, DEFAULT_NETWORK_PORT);
    assert!(!config.network_control);
}

#[test]
fn network_control_flag_enables_tcp() {
    let config = Config::from_cli(cli(&["--network-control", "--network-port", "9999"])).expect("config");
    assert!(config.network_control);
    assert_eq!(config.network_port, 9999);
}

#[test]
fn verbose_flag_is_carried_through() {
    let config = Config::from_cli(cli(&["--verbose"])).expect("config");
    assert!(config.verbose);
}
