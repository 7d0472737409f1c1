use crate::prelude::*;

#[test]
fn task_list_is_empty_on_a_freshly_started_daemon() {
    let project = Project::empty();
    project.git_init();
    project.aio().args(&["start"]).passes();

    let socket = project.state_path().join("aio.sock");
    assert!(wait_for(SPEC_WAIT_MAX_MS, || socket.exists()));

    project.aio().args(&["task", "list"]).passes().stdout_has("no tasks");
}

#[test]
fn worker_list_is_empty_on_a_freshly_started_daemon() {
    let project = Project::empty();
    project.git_init();
    project.aio().args(&["start"]).passes();

    let socket = project.state_path().join("aio.sock");
    assert!(wait_for(SPEC_WAIT_MAX_MS, || socket.exists()));

    project.aio().args(&["worker", "list"]).passes().stdout_has("no active workers");
}

#[test]
fn task_show_reports_an_error_for_an_unknown_id() {
    let project = Project::empty();
    project.git_init();
    project.aio().args(&["start"]).passes();

    let socket = project.state_path().join("aio.sock");
    assert!(wait_for(SPEC_WAIT_MAX_MS, || socket.exists()));

    project.aio().args(&["task", "show", "nonexistent"]).fails().stderr_has("no such task");
}
