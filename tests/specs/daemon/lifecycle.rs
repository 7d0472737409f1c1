use crate::prelude::*;

#[test]
fn status_reports_not_running_before_anything_starts() {
    let project = Project::empty();
    project.git_init();
    project.aio().args(&["status"]).passes().stdout_has("daemon: not running");
}

#[test]
fn start_then_status_reports_the_daemon_running() {
    let project = Project::empty();
    project.git_init();

    project.aio().args(&["start"]).passes().stdout_has("ready");

    let socket = project.state_path().join("aio.sock");
    assert!(wait_for(SPEC_WAIT_MAX_MS, || socket.exists()), "socket never appeared at {}", socket.display());

    project.aio().args(&["status"]).passes().stdout_has("daemon: running");
}

#[test]
fn stop_tears_down_a_running_daemon() {
    let project = Project::empty();
    project.git_init();
    project.aio().args(&["start"]).passes();

    let socket = project.state_path().join("aio.sock");
    assert!(wait_for(SPEC_WAIT_MAX_MS, || socket.exists()));

    project.aio().args(&["stop"]).passes().stdout_has("stop requested");
    assert!(wait_for(SPEC_WAIT_MAX_MS, || !socket.exists()), "socket should be removed after stop");
}

#[test]
fn clean_refuses_while_the_daemon_is_still_running() {
    let project = Project::empty();
    project.git_init();
    project.aio().args(&["start"]).passes();

    let socket = project.state_path().join("aio.sock");
    assert!(wait_for(SPEC_WAIT_MAX_MS, || socket.exists()));

    project.aio().args(&["clean"]).fails().stderr_has("refusing to clean");
}

#[test]
fn clean_removes_the_state_dir_once_the_daemon_is_stopped() {
    let project = Project::empty();
    project.git_init();
    project.aio().args(&["start"]).passes();

    let socket = project.state_path().join("aio.sock");
    assert!(wait_for(SPEC_WAIT_MAX_MS, || socket.exists()));

    project.aio().args(&["stop"]).passes();
    assert!(wait_for(SPEC_WAIT_MAX_MS, || !socket.exists()));

    project.aio().args(&["clean"]).passes().stdout_has("removed");
    assert!(!project.state_path().exists());
}
