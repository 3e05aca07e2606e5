// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use cosmic_codescan::Config;

#[test]
fn test_config_default() {
    // Test that default config can be created
    let config = Config::default();

    // Decoded links must not launch without an explicit opt-in
    assert!(
        !config.open_links_automatically,
        "Links should not open automatically by default"
    );
}
