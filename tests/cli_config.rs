//! Configuration tests - CLI parsing and validation

use clap::Parser;
use explorer_params::config::{from_args, CliArgs, Command, PrefsAction};
use explorer_params::Endpoint;

#[test]
fn encode_command_parses_fields() {
    let args = CliArgs::try_parse_from([
        "explorer-params",
        "--prefs-path",
        "/tmp/p.json",
        "encode",
        "account",
        "accountName=alice",
        "page=2",
    ])
    .unwrap();
    let (cfg, command) = from_args(args).unwrap();
    assert_eq!(cfg.prefs_path.to_str(), Some("/tmp/p.json"));
    assert_eq!(
        command,
        Command::Encode {
            route: "account".to_string(),
            fields: vec!["accountName=alice".to_string(), "page=2".to_string()],
        }
    );
}

#[test]
fn prefs_set_parses_endpoint() {
    let args = CliArgs::try_parse_from([
        "explorer-params",
        "prefs",
        "set",
        "rpc",
        "https://node.example.com",
    ])
    .unwrap();
    let (_, command) = from_args(args).unwrap();
    assert_eq!(
        command,
        Command::Prefs {
            action: PrefsAction::Set {
                endpoint: Endpoint::Rpc,
                url: "https://node.example.com".to_string(),
            }
        }
    );
}

#[test]
fn unknown_endpoint_is_a_parse_error() {
    let result = CliArgs::try_parse_from(["explorer-params", "prefs", "reset", "db"]);
    assert!(result.is_err());
}

#[test]
fn invalid_fallback_url_fails_validation() {
    let args = CliArgs::try_parse_from([
        "explorer-params",
        "--api-url",
        "ftp://example.com",
        "routes",
    ])
    .unwrap();
    assert!(from_args(args).is_err());
}

#[test]
fn explicit_fallbacks_are_used() {
    let args = CliArgs::try_parse_from([
        "explorer-params",
        "--api-url",
        "http://localhost:3000",
        "--rpc-url",
        "ws://localhost:8090",
        "--debug",
        "sync",
        "routes",
    ])
    .unwrap();
    let (cfg, command) = from_args(args).unwrap();
    assert_eq!(cfg.endpoints.api, "http://localhost:3000");
    assert_eq!(cfg.endpoints.rpc, "ws://localhost:8090");
    assert_eq!(cfg.debug, "sync");
    assert_eq!(command, Command::Routes);
}
