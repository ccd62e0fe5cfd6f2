// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn app_home_prefers_explicit_override() {
    std::env::set_var("DATA_EXTRACT_UI_HOME", "/tmp/dx-app-home-test");
    let config = Config::resolve();
    assert_eq!(config.app_home, PathBuf::from("/tmp/dx-app-home-test"));
    std::env::remove_var("DATA_EXTRACT_UI_HOME");
}

#[test]
#[serial]
fn work_dir_prefers_explicit_override() {
    std::env::set_var("DATA_EXTRACT_WORK_DIR", "/tmp/dx-work-dir-test");
    let config = Config::resolve();
    assert_eq!(config.work_dir, PathBuf::from("/tmp/dx-work-dir-test"));
    std::env::remove_var("DATA_EXTRACT_WORK_DIR");
}

#[test]
#[serial]
fn db_path_and_session_dir_are_derived_from_app_home_and_work_dir() {
    std::env::set_var("DATA_EXTRACT_UI_HOME", "/tmp/dx-app-home-test2");
    std::env::set_var("DATA_EXTRACT_WORK_DIR", "/tmp/dx-work-dir-test2");
    let config = Config::resolve();
    assert_eq!(config.db_path(), PathBuf::from("/tmp/dx-app-home-test2/data-extract.sqlite3"));
    assert_eq!(config.session_dir(), PathBuf::from("/tmp/dx-work-dir-test2/.data-extract-session"));
    std::env::remove_var("DATA_EXTRACT_UI_HOME");
    std::env::remove_var("DATA_EXTRACT_WORK_DIR");
}

#[test]
#[serial]
fn queue_tunables_fall_back_to_defaults() {
    std::env::remove_var("DATA_EXTRACT_QUEUE_BACKLOG");
    std::env::remove_var("DATA_EXTRACT_QUEUE_WORKERS");
    let config = Config::resolve();
    assert_eq!(config.queue_max_backlog, 64);
    assert_eq!(config.queue_worker_count, 2);
}
