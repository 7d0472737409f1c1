use crate::prelude::*;

#[test]
fn help_lists_the_top_level_subcommands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("start")
        .stdout_has("stop")
        .stdout_has("status")
        .stdout_has("clean");
}

#[test]
fn version_flag_prints_a_version_and_exits_zero() {
    cli().args(&["--version"]).passes().stdout_has("aio");
}

#[test]
fn unknown_subcommand_fails_with_a_usage_error() {
    cli().args(&["bogus-command"]).fails().stderr_has("error");
}
