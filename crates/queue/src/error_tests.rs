// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn queue_full_maps_to_queue_full_kind() {
    let err = QueueError::QueueFull { max_backlog: 4 };
    assert_eq!(err.kind(), ErrorKind::QueueFull);
    assert!(err.to_string().contains('4'));
}
