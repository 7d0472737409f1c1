use super::Cli;
use clap::error::ErrorKind;
use clap::Parser;

#[test]
fn no_subcommand_parses_with_command_none() {
    let cli = Cli::try_parse_from(["aio"]).unwrap();
    assert!(cli.command.is_none());
}

#[test]
fn version_flag_is_recognized() {
    let err = Cli::try_parse_from(["aio", "--version"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayVersion);
}

#[test]
fn task_show_requires_an_id() {
    let err = Cli::try_parse_from(["aio", "task", "show"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
}

#[test]
fn task_show_parses_with_an_id() {
    let cli = Cli::try_parse_from(["aio", "task", "show", "abc123"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(super::Command::Task(super::TaskCommand::Show { task_id })) if task_id == "abc123"
    ));
}

#[test]
fn stop_parses_with_no_session_id() {
    let cli = Cli::try_parse_from(["aio", "stop"]).unwrap();
    assert!(matches!(cli.command, Some(super::Command::Stop { session_id: None })));
}

#[test]
fn stop_parses_with_a_session_id() {
    let cli = Cli::try_parse_from(["aio", "stop", "some-session"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(super::Command::Stop { session_id: Some(id) }) if id == "some-session"
    ));
}

#[test]
fn worker_list_parses() {
    let cli = Cli::try_parse_from(["aio", "worker", "list"]).unwrap();
    assert!(matches!(cli.command, Some(super::Command::Worker(super::WorkerCommand::List))));
}
