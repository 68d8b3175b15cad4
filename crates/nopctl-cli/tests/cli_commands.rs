//! End-to-end command tests over the recording transport.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::rc::Rc;

use nopctl_cli::run_for_test;
use nopctl_client::{
    FunctionEntry, FunctionList, RecordingTransport, TransportCall, TransportError,
};

fn list(entries: &[(&str, bool)]) -> FunctionList {
    FunctionList {
        functions: entries
            .iter()
            .map(|(name, active)| FunctionEntry {
                name: (*name).to_owned(),
                active: *active,
            })
            .collect(),
    }
}

#[test]
fn list_prints_matching_functions_in_sorted_order() {
    let transport = RecordingTransport::new().with_response(list(&[
        ("schedule", false),
        ("do_fork", true),
        ("do_exit", false),
    ]));
    let output = run_for_test(&["list"], Box::new(transport));

    assert_eq!(output.exit_code, 0);
    assert_eq!(
        output.stdout,
        "do_exit (nopped)\ndo_fork (active)\nschedule (nopped)\n"
    );
    assert_eq!(output.stderr, "");
}

#[test]
fn list_applies_the_filter_before_printing() {
    let transport = RecordingTransport::new().with_response(list(&[
        ("do_fork", true),
        ("do_exit", false),
        ("schedule", true),
    ]));
    let output = run_for_test(&["list", "-f", "active:do_"], Box::new(transport));

    assert_eq!(output.exit_code, 0);
    assert_eq!(output.stdout, "do_fork (active)\n");
}

#[test]
fn list_rejects_a_malformed_filter_before_touching_the_network() {
    let transport = Rc::new(RecordingTransport::new());
    let output = run_for_test(
        &["list", "-f", "active:nopped:"],
        Box::new(Rc::clone(&transport)),
    );

    assert_eq!(output.exit_code, 1);
    assert!(output.stderr.contains("Invalid filter"));
    assert_eq!(transport.call_count(), 0);
}

#[test]
fn unreachable_server_reports_a_connection_hint() {
    let transport = RecordingTransport::new()
        .with_error(TransportError::Request("connection refused".to_owned()));
    let output = run_for_test(&["list", "-p", "9000"], Box::new(transport));

    assert_eq!(output.exit_code, 1);
    assert!(output
        .stderr
        .contains("is the instrumentation server started on port 9000?"));
}

#[test]
fn out_of_range_port_is_rejected_by_the_cache() {
    let output = run_for_test(
        &["list", "-p", "70000"],
        Box::new(RecordingTransport::new()),
    );
    assert_eq!(output.exit_code, 1);
    assert!(output.stderr.contains("outside 0-65535"));
}

#[test]
fn activate_puts_the_full_updated_table() {
    let transport = Rc::new(
        RecordingTransport::new()
            .with_response(list(&[("do_fork", false), ("schedule", false)]))
            .with_response(list(&[("do_fork", true), ("schedule", false)])),
    );
    let output = run_for_test(
        &["activate", "do_fork"],
        Box::new(Rc::clone(&transport)),
    );

    assert_eq!(output.exit_code, 0);
    assert_eq!(output.stderr, "");
    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[1],
        TransportCall::Put {
            url: "http://127.0.0.1:8000/instrumentation".to_owned(),
            body: list(&[("do_fork", true), ("schedule", false)]),
        }
    );
}

#[test]
fn deactivate_flips_the_named_functions_off() {
    let transport = Rc::new(
        RecordingTransport::new()
            .with_response(list(&[("do_fork", true)]))
            .with_response(list(&[("do_fork", false)])),
    );
    let output = run_for_test(
        &["deactivate", "do_fork"],
        Box::new(Rc::clone(&transport)),
    );

    assert_eq!(output.exit_code, 0);
    assert_eq!(
        transport.calls()[1],
        TransportCall::Put {
            url: "http://127.0.0.1:8000/instrumentation".to_owned(),
            body: list(&[("do_fork", false)]),
        }
    );
}

#[test]
fn activating_an_unknown_function_changes_nothing() {
    let transport = Rc::new(
        RecordingTransport::new().with_response(list(&[("do_fork", false)])),
    );
    let output = run_for_test(
        &["activate", "unknown_fn"],
        Box::new(Rc::clone(&transport)),
    );

    assert_eq!(output.exit_code, 1);
    assert!(output.stderr.contains("Function not in list"));
    // Only the connect-time GET went out; no PUT was attempted.
    assert_eq!(transport.call_count(), 1);
}

#[test]
fn unknown_commands_print_usage_and_exit_2() {
    let output = run_for_test(&["frobnicate"], Box::new(RecordingTransport::new()));
    assert_eq!(output.exit_code, 2);
    assert!(output.stderr.contains("Usage: nopctl"));
}

#[test]
fn help_prints_usage_on_stdout() {
    let output = run_for_test(&["--help"], Box::new(RecordingTransport::new()));
    assert_eq!(output.exit_code, 0);
    assert!(output.stdout.contains("Usage: nopctl"));
    assert!(output.stdout.contains("deactivate"));
}
