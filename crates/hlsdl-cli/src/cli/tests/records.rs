//! Tests for the records subcommands.

use super::{parse, parse_err};
use crate::cli::{CliCommand, RecordsCommand};
use hlsdl_core::capture::ResourceKind;
use std::path::Path;

fn records(args: &[&str]) -> RecordsCommand {
    let mut full = vec!["hlsdl", "records"];
    full.extend_from_slice(args);
    match parse(&full) {
        CliCommand::Records { command } => command,
        _ => panic!("expected Records"),
    }
}

#[test]
fn cli_parse_records_list_plain() {
    match records(&["list", "capture.har"]) {
        RecordsCommand::List { file, kinds, tab } => {
            assert_eq!(file, Path::new("capture.har"));
            assert!(kinds.is_empty());
            assert!(tab.is_none());
        }
        _ => panic!("expected List"),
    }
}

#[test]
fn cli_parse_records_list_filters() {
    match records(&["list", "log.jsonl", "--kind", "media,data", "--kind", "image", "--tab", "7"]) {
        RecordsCommand::List { kinds, tab, .. } => {
            assert_eq!(kinds, vec![ResourceKind::Media, ResourceKind::Data, ResourceKind::Image]);
            assert_eq!(tab, Some(7));
        }
        _ => panic!("expected List"),
    }
}

#[test]
fn cli_parse_records_list_negative_tab() {
    match records(&["list", "capture.har", "--tab", "-1"]) {
        RecordsCommand::List { tab, .. } => assert_eq!(tab, Some(-1)),
        _ => panic!("expected List"),
    }
}

#[test]
fn cli_parse_records_list_unknown_kind_fails() {
    parse_err(&["hlsdl", "records", "list", "capture.har", "--kind", "font"]);
}

#[test]
fn cli_parse_records_show_and_curl() {
    match records(&["show", "capture.har", "12", "--body"]) {
        RecordsCommand::Show { file, id, body } => {
            assert_eq!(file, Path::new("capture.har"));
            assert_eq!(id, "12");
            assert!(body);
        }
        _ => panic!("expected Show"),
    }
    match records(&["curl", "capture.har", "3"]) {
        RecordsCommand::Curl { id, .. } => assert_eq!(id, "3"),
        _ => panic!("expected Curl"),
    }
}

#[test]
fn cli_parse_records_download() {
    match records(&["download", "capture.har", "4"]) {
        RecordsCommand::Download {
            id,
            allow_cookies,
            opts,
            ..
        } => {
            assert_eq!(id, "4");
            assert!(!allow_cookies);
            assert!(!opts.best);
        }
        _ => panic!("expected Download"),
    }
    match records(&["download", "capture.har", "4", "--allow-cookies", "--best", "-j", "2"]) {
        RecordsCommand::Download {
            allow_cookies,
            opts,
            ..
        } => {
            assert!(allow_cookies);
            assert!(opts.best);
            assert_eq!(opts.jobs, Some(2));
        }
        _ => panic!("expected Download with flags"),
    }
}
